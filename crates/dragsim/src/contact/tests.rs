use super::*;
use nalgebra::{vector, Matrix3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::kinematics::rotation;

/// Reference scenario: pusher directly behind the object center.
/// mu1=0.3, mu2=0.2, Ow=9.8, Hw=5.0, r_o=0.07, r_h=0.01, c_o=c_p=1, delta=0.5.
fn reference_setup() -> (ContactSolver, PusherState, ObjectState) {
    let params = FrictionParams {
        mu_ground: 0.3,
        mu_contact: 0.2,
        weight_force: 9.8,
        c_o: 1.0,
        c_p: 1.0,
        delta: 0.5,
    };
    let geometry = ContactGeometry {
        eq_radius_object: 0.07,
        eq_radius_pusher: 0.01,
    };
    let solver = ContactSolver::new(params, geometry).unwrap();
    let pusher = PusherState {
        pose: vector![-0.05, 0.0, 0.0],
        velocity: vector![0.05, 0.0, 0.0],
        normal_force: 5.0,
    };
    let object = ObjectState {
        pose: vector![0.0, 0.0, 0.0],
    };
    (solver, pusher, object)
}

/// Hand-built decomposition with identity charts; `b = diag(lambda)` and
/// `a_dot = I` keep the pencil relation `B·Φ = A_dot·Φ·Λ` consistent.
fn crafted_decomposition(lambda: Vector3<f64>) -> Decomposition {
    Decomposition {
        lambda,
        phi: Matrix3::identity(),
        g: Matrix3::identity(),
        g_inv: Matrix3::identity(),
        b: Matrix3::from_diagonal(&lambda),
        a_dot_inv: Matrix3::identity(),
        pusher_theta: 0.0,
        object_theta: 0.0,
    }
}

#[test]
fn limit_surfaces_are_symmetric_positive_definite() {
    let (solver, pusher, object) = reference_setup();
    let q_rel = rotation(-object.pose.z) * (pusher.pose - object.pose);
    let (a, b) = limit_surfaces(
        solver.params(),
        solver.geometry(),
        pusher.normal_force,
        q_rel,
    )
    .unwrap();
    assert!((a - a.transpose()).norm() < 1e-12);
    assert!((b - b.transpose()).norm() < 1e-12);
    assert!(a.cholesky().is_some(), "A must be positive-definite");
    assert!(b.cholesky().is_some(), "B must be positive-definite");
}

#[test]
fn limit_surface_a_matches_closed_form_entries() {
    let (solver, pusher, object) = reference_setup();
    let q_rel = rotation(-object.pose.z) * (pusher.pose - object.pose);
    let (a, _) = limit_surfaces(
        solver.params(),
        solver.geometry(),
        pusher.normal_force,
        q_rel,
    )
    .unwrap();
    // Translational coefficient 1/(mu1*(Ow+Hw))^2 survives the shift on the
    // x-row; the rotational coefficient is untouched by it.
    let ground_bound = 0.3 * (9.8 + 5.0);
    assert!((a[(0, 0)] - 1.0 / (ground_bound * ground_bound)).abs() < 1e-15);
    let rot_bound = 0.07 * ground_bound;
    assert!((a[(2, 2)] - 1.0 / (rot_bound * rot_bound)).abs() < 1e-12);
    // Pressure-center shift couples y and omega: A[1,2] = s*|x_rel| * A[2,2].
    let s = 1.0 - (5.0f64 / 9.8 + 1.0).powf(-0.5);
    assert!((a[(1, 2)] - s * 0.05 * a[(2, 2)]).abs() < 1e-12);
    assert!((a[(0, 1)]).abs() < 1e-15);
    assert!((a[(0, 2)]).abs() < 1e-15);
}

#[test]
fn zero_normal_force_is_a_domain_error() {
    let (solver, mut pusher, object) = reference_setup();
    pusher.normal_force = 0.0;
    assert!(matches!(
        solver.update(&pusher, &object),
        Err(DragError::Domain { .. })
    ));
}

#[test]
fn invalid_friction_parameters_are_rejected_up_front() {
    let (solver, _, _) = reference_setup();
    let geometry = *solver.geometry();
    let mut params = *solver.params();
    params.mu_ground = 1.3;
    assert!(matches!(
        ContactSolver::new(params, geometry),
        Err(DragError::Domain { .. })
    ));
    params.mu_ground = 0.3;
    params.weight_force = -9.8;
    assert!(matches!(
        ContactSolver::new(params, geometry),
        Err(DragError::Domain { .. })
    ));
}

#[test]
fn reference_scenario_eigenvalues_match_golden_values() {
    let (solver, pusher, object) = reference_setup();
    let decomposition = solver.update(&pusher, &object).unwrap();
    let lambda = decomposition.lambda;
    assert!(lambda[0] <= lambda[1] && lambda[1] <= lambda[2]);
    assert!(lambda.iter().all(|&l| l > 1.0));
    // The x-translation coordinate decouples exactly for this pose:
    // lambda = (mu1*(Ow+Hw))^2 / (mu2*Hw)^2 with mu2*Hw = 1.
    let decoupled = (0.3f64 * 14.8).powi(2);
    assert!((lambda[1] - decoupled).abs() < 1e-9);
    // Remaining pair from the coupled (y, omega) block.
    assert!(lambda[0] > 14.6 && lambda[0] < 14.76);
    assert!(lambda[2] > 1285.0 && lambda[2] < 1310.0);
}

#[test]
fn reference_scenario_slips_and_object_stays_put() {
    let (solver, pusher, object) = reference_setup();
    let decomposition = solver.update(&pusher, &object).unwrap();
    let (velocity, mode) = decomposition.object_velocity(pusher.velocity).unwrap();
    assert_eq!(mode, ContactMode::Slipping);
    assert_eq!(velocity, Vector3::zeros());
    assert!(velocity.norm() <= pusher.velocity.norm());
    // Zero commanded velocity with every eigenvalue above 1 sticks.
    assert_eq!(decomposition.classify(Vector3::zeros()), ContactMode::Sticking);
}

#[test]
fn sticking_resolution_round_trips_through_the_jacobian() {
    let (solver, pusher, object) = reference_setup();
    let decomposition = solver.update(&pusher, &object).unwrap();
    for q_h_dot in [
        vector![0.05, 0.0, 0.0],
        vector![-0.02, 0.04, 0.1],
        vector![0.0, -0.03, -0.2],
    ] {
        let world = decomposition
            .resolve(ContactMode::Sticking, q_h_dot)
            .unwrap();
        let v_o = rotation(object.pose.z).transpose() * world;
        let v_h = rotation(pusher.pose.z).transpose() * q_h_dot;
        assert!((decomposition.g * v_o - v_h).norm() < 1e-10);
    }
}

#[test]
fn slipping_resolution_is_always_zero() {
    let (solver, pusher, object) = reference_setup();
    let decomposition = solver.update(&pusher, &object).unwrap();
    for q_h_dot in [
        vector![0.05, 0.0, 0.0],
        vector![-1.0, 2.0, 3.0],
        vector![0.0, 0.0, 0.0],
    ] {
        let world = decomposition
            .resolve(ContactMode::Slipping, q_h_dot)
            .unwrap();
        assert_eq!(world, Vector3::zeros());
    }
}

#[test]
fn zero_velocity_branch_covers_all_three_regimes() {
    let zero = Vector3::zeros();
    let sticking = crafted_decomposition(vector![1.5, 2.0, 3.0]);
    assert_eq!(sticking.classify(zero), ContactMode::Sticking);
    let slipping = crafted_decomposition(vector![0.2, 0.5, 0.9]);
    assert_eq!(slipping.classify(zero), ContactMode::Slipping);
    let pivoting = crafted_decomposition(vector![0.5, 1.5, 3.0]);
    assert_eq!(pivoting.classify(zero), ContactMode::Pivoting);
}

#[test]
fn pivoting_root_matches_the_analytic_solution() {
    // lambda = (0.5, 1, 2) with command (1, 0, 0.8): the load-balance
    // equation reduces to 0.8*(0.5a+1) = sqrt(0.5)*(2a+1).
    let decomposition = crafted_decomposition(vector![0.5, 1.0, 2.0]);
    let q_h_dot = vector![1.0, 0.0, 0.8];
    assert_eq!(decomposition.classify(q_h_dot), ContactMode::Pivoting);

    let half_sqrt = 0.5f64.sqrt();
    let alpha = (0.8 - half_sqrt) / (2.0 * half_sqrt - 0.4);
    let expected = vector![
        1.0 / (1.0 + 0.5 * alpha),
        0.0,
        0.8 / (1.0 + 2.0 * alpha)
    ];
    let world = decomposition
        .resolve(ContactMode::Pivoting, q_h_dot)
        .unwrap();
    assert!((world - expected).norm() < 1e-9);
}

#[test]
fn unbracketed_pivoting_root_is_signalled_not_raised() {
    // Tiny lambda keeps the negative term essentially undecayed across the
    // whole bracket, so the equation stays positive on [0, 100].
    let decomposition = crafted_decomposition(vector![1e-4, 2.0, 3.0]);
    let q_h_dot = vector![0.001, 1.0, 0.0];
    assert_eq!(decomposition.classify(q_h_dot), ContactMode::Pivoting);
    assert_eq!(
        decomposition.resolve(ContactMode::Pivoting, q_h_dot),
        Err(DragError::RootNotFound {
            bracket: ALPHA_BRACKET
        })
    );
    // The sweep over the same decomposition completes without raising.
    let _ = decomposition.sticky_candidates(0.01);
}

#[test]
fn session_retains_previous_velocity_on_missing_bracket() {
    let (solver, _, _) = reference_setup();
    let mut session = DragSession::new(solver);

    // Seed the cache with a successful nonzero sticking resolution.
    let rigid = crafted_decomposition(vector![0.3, 0.5, 0.7]);
    let seed_command = vector![0.02, -0.01, 0.1];
    let (seeded, mode) = session.resolve_with(&rigid, seed_command).unwrap();
    assert_eq!(mode, ContactMode::Sticking);
    assert_eq!(session.last_velocity(), seeded);
    assert!(seeded.norm() > 0.0);

    // The unbracketed pivoting case returns the cached value unchanged.
    let stuck = crafted_decomposition(vector![1e-4, 2.0, 3.0]);
    let (velocity, mode) = session
        .resolve_with(&stuck, vector![0.001, 1.0, 0.0])
        .unwrap();
    assert_eq!(mode, ContactMode::Pivoting);
    assert_eq!(velocity, seeded);
    assert_eq!(session.last_velocity(), seeded);
}

#[test]
fn session_caches_last_velocity_and_absorbs_no_fatal_errors() {
    let (solver, pusher, object) = reference_setup();
    let mut session = DragSession::new(solver);
    assert_eq!(session.last_velocity(), Vector3::zeros());
    let (velocity, mode) = session.step(&pusher, &object).unwrap();
    assert_eq!(mode, ContactMode::Slipping);
    assert_eq!(session.last_velocity(), velocity);

    let mut dead = pusher;
    dead.normal_force = -1.0;
    assert!(matches!(
        session.step(&dead, &object),
        Err(DragError::Domain { .. })
    ));
}

#[test]
fn rigid_coupling_retains_every_direction() {
    // All eigenvalues below 1 stick everywhere; G set to the planner's -90
    // degree convention makes the corrected velocity track the command
    // exactly, so every swept direction passes the slip gate, all distinct.
    let mut decomposition = crafted_decomposition(vector![0.3, 0.5, 0.7]);
    decomposition.g = rotation(-std::f64::consts::FRAC_PI_2);
    decomposition.g_inv = rotation(std::f64::consts::FRAC_PI_2);
    let candidates = decomposition.sticky_candidates(0.05);
    assert_eq!(candidates.len(), DIRECTION_COUNT);
    for c in &candidates {
        assert!((c.xy().norm() - 0.05).abs() < 1e-12);
        assert!(c.z.abs() < 1e-12);
    }
}

#[test]
fn slipping_sweep_deduplicates_to_a_single_zero_candidate() {
    let decomposition = crafted_decomposition(vector![2.0, 3.0, 4.0]);
    // Below the slip tolerance the zero twist passes in every direction and
    // collapses to one entry.
    let slow = decomposition.sticky_candidates(0.01);
    assert_eq!(slow, vec![Vector3::zeros()]);
    // Above it, nothing passes.
    assert!(decomposition.sticky_candidates(0.05).is_empty());
}

#[test]
fn reference_scenario_sweep_matches_slipping_prediction() {
    let (solver, pusher, object) = reference_setup();
    let decomposition = solver.update(&pusher, &object).unwrap();
    // Every eigenvalue exceeds 1, so each direction slips and the object
    // never tracks a 0.05 m/s command.
    assert!(decomposition.sticky_candidates(0.05).is_empty());
    assert_eq!(
        decomposition.sticky_candidates(0.01),
        vec![Vector3::zeros()]
    );
}

#[test]
fn randomized_sweep_keeps_classification_total_and_resolution_consistent() {
    let (solver, _, _) = reference_setup();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let object = ObjectState {
            pose: vector![
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-3.0..3.0)
            ],
        };
        let offset = vector![rng.gen_range(-0.06..0.06), rng.gen_range(-0.06..0.06), 0.0];
        let pusher = PusherState {
            pose: object.pose + rotation(object.pose.z) * offset,
            velocity: vector![
                rng.gen_range(-0.1..0.1),
                rng.gen_range(-0.1..0.1),
                rng.gen_range(-0.5..0.5)
            ],
            normal_force: rng.gen_range(0.5..50.0),
        };
        let decomposition = solver.update(&pusher, &object).unwrap();
        assert!(decomposition.lambda.iter().all(|&l| l > 0.0));

        let mode = decomposition.classify(pusher.velocity);
        assert_eq!(mode, decomposition.classify(pusher.velocity));
        match decomposition.resolve(mode, pusher.velocity) {
            Ok(world) => {
                assert!(world.iter().all(|v| v.is_finite()));
                let v_o = rotation(object.pose.z).transpose() * world;
                let v_h = rotation(pusher.pose.z).transpose() * pusher.velocity;
                match mode {
                    ContactMode::Sticking => {
                        assert!((decomposition.g * v_o - v_h).norm() < 1e-8)
                    }
                    ContactMode::Slipping => assert_eq!(world, Vector3::zeros()),
                    ContactMode::Pivoting => {}
                }
            }
            // A pivoting bracket without sign change is a legitimate
            // boundary outcome; anything else is a bug.
            Err(err) => assert!(matches!(err, DragError::RootNotFound { .. })),
        }
    }
}
