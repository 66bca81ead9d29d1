//! Bracketed scalar root-finding (Brent's method).
//!
//! Used by the pivoting-mode resolver to recover the load-redistribution
//! parameter. The bracket must carry a sign change; absence of one is a
//! legitimate outcome at boundary configurations and is reported as `None`
//! rather than an error.

/// Root-finder configuration (tolerances and iteration budget).
#[derive(Clone, Copy, Debug)]
pub struct RootCfg {
    /// Absolute width tolerance on the bracket.
    pub xtol: f64,
    /// Relative width tolerance on the bracket.
    pub rtol: f64,
    /// Iteration budget; the search is a bounded computation.
    pub max_iter: usize,
}

impl Default for RootCfg {
    fn default() -> Self {
        Self {
            xtol: 2e-12,
            rtol: 4.0 * f64::EPSILON,
            max_iter: 100,
        }
    }
}

/// Find a root of `f` in `[a, b]` via Brent's method: inverse quadratic or
/// secant steps with a bisection fallback.
///
/// Returns `None` if `f(a)` and `f(b)` do not straddle zero, or if either
/// endpoint evaluates non-finite. An exact zero at an endpoint is returned
/// directly.
pub fn brent<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, cfg: RootCfg) -> Option<f64> {
    let mut xa = a;
    let mut xb = b;
    let mut fa = f(xa);
    let mut fb = f(xb);
    if !fa.is_finite() || !fb.is_finite() {
        return None;
    }
    if fa == 0.0 {
        return Some(xa);
    }
    if fb == 0.0 {
        return Some(xb);
    }
    if fa.signum() == fb.signum() {
        return None;
    }

    // xc carries the previous iterate so that [xb, xc] always brackets.
    let mut xc = xa;
    let mut fc = fa;
    let mut d = xb - xa;
    let mut e = d;

    for _ in 0..cfg.max_iter {
        if fb.signum() == fc.signum() {
            xc = xa;
            fc = fa;
            d = xb - xa;
            e = d;
        }
        if fc.abs() < fb.abs() {
            xa = xb;
            xb = xc;
            xc = xa;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 0.5 * cfg.rtol * xb.abs() + 0.5 * cfg.xtol;
        let xm = 0.5 * (xc - xb);
        if xm.abs() <= tol || fb == 0.0 {
            return Some(xb);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if xa == xc {
                // Secant step.
                (2.0 * xm * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation.
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (xb - xa) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        xa = xb;
        fa = fb;
        if d.abs() > tol {
            xb += d;
        } else {
            xb += if xm > 0.0 { tol } else { -tol };
        }
        fb = f(xb);
        if !fb.is_finite() {
            return None;
        }
    }
    Some(xb)
}
