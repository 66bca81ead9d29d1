//! Generalized eigendecomposition for SPD pencils.
//!
//! Solves `B·Φ = A·Φ·Λ` for symmetric positive-definite `A`, `B` by
//! reducing to an ordinary symmetric problem through the Cholesky factor of
//! `A`: with `A = L·Lᵀ`, the matrix `M = L⁻¹·B·L⁻ᵀ` is symmetric and shares
//! the pencil's eigenvalues; eigenvectors map back as `Φ = L⁻ᵀ·Y`.
//!
//! The returned basis satisfies `Φᵀ·A·Φ = I` and `Φᵀ·B·Φ = Λ`, and the
//! eigenvalues are sorted ascending for determinism.

use nalgebra::{Matrix3, SymmetricEigen, Vector3};

use super::types::DragError;

/// Solve the SPD pencil `(B, A)`. Eigenvalues of an SPD pencil are real and
/// strictly positive; a non-positive result or a failed Cholesky factor is
/// reported as `DragError::Numerical` (a configuration bug, not a transient
/// condition).
pub fn generalized_eigh(
    b: &Matrix3<f64>,
    a: &Matrix3<f64>,
) -> Result<(Vector3<f64>, Matrix3<f64>), DragError> {
    let chol = a
        .cholesky()
        .ok_or_else(|| DragError::numerical("pencil matrix A_dot is not positive-definite"))?;
    let l = chol.l();
    let l_inv = l
        .try_inverse()
        .ok_or_else(|| DragError::numerical("Cholesky factor of A_dot is singular"))?;

    let mut m = l_inv * b * l_inv.transpose();
    // Symmetrize against roundoff before the symmetric solver.
    m = (m + m.transpose()) * 0.5;
    let eig = SymmetricEigen::new(m);

    for i in 0..3 {
        let ev = eig.eigenvalues[i];
        if !(ev > 0.0) || !ev.is_finite() {
            return Err(DragError::numerical(format!(
                "pencil eigenvalue {ev} is not strictly positive; B is not positive-definite"
            )));
        }
    }

    let phi_unsorted = l_inv.transpose() * eig.eigenvectors;

    // Ascending eigenvalue order, columns permuted to match.
    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| {
        eig.eigenvalues[i]
            .partial_cmp(&eig.eigenvalues[j])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut lambda = Vector3::zeros();
    let mut phi = Matrix3::zeros();
    for (dst, &src) in order.iter().enumerate() {
        lambda[dst] = eig.eigenvalues[src];
        phi.set_column(dst, &phi_unsorted.column(src));
    }
    Ok((lambda, phi))
}
