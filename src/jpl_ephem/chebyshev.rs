//! Chebyshev series evaluation.
//!
//! Positions use the first-kind recurrence `T0 = 1, T1 = x, Tn = 2x T(n-1) - T(n-2)`.
//! Velocities use the derivative of the same basis,
//! `U0 = 0, U1 = 1, U2 = 4x, Un = 2x U(n-1) + 2 T(n-1) - U(n-2)`, where `Un = dTn/dx`.
//! Both sums run from the highest degree down to limit rounding accumulation.
use smallvec::SmallVec;

/// Basis values stay on the stack up to this degree; DE files use at most 18 coefficients.
type Basis = SmallVec<[f64; 32]>;

/// Values of `T0..T(n-1)` at `x`.
pub fn chebyshev_t(x: f64, n: usize) -> Basis {
    let mut t = Basis::from_elem(0.0, n);
    if n > 0 {
        t[0] = 1.0;
    }
    if n > 1 {
        t[1] = x;
    }
    for i in 2..n {
        t[i] = 2.0 * x * t[i - 1] - t[i - 2];
    }
    t
}

/// Values of the derivatives `dT0/dx..dT(n-1)/dx` at `x`, given `t = chebyshev_t(x, n)`.
pub fn chebyshev_u(x: f64, t: &[f64]) -> Basis {
    let n = t.len();
    let mut u = Basis::from_elem(0.0, n);
    if n > 1 {
        u[1] = 1.0;
    }
    if n > 2 {
        u[2] = 4.0 * x;
    }
    for i in 3..n {
        u[i] = 2.0 * x * u[i - 1] + 2.0 * t[i - 1] - u[i - 2];
    }
    u
}

/// Sum `coeffs[i] * basis[i]`, highest degree first.
fn sum_descending(coeffs: &[f64], basis: &[f64]) -> f64 {
    coeffs
        .iter()
        .zip(basis.iter())
        .rev()
        .fold(0.0, |acc, (c, b)| acc + c * b)
}

/// Evaluate a Chebyshev series and its derivative at `x`.
///
/// Arguments
/// -----------------
/// * `x`: normalized time in `[-1, 1]`.
/// * `coeffs`: coefficients of one component, degree 0 first.
///
/// Return
/// ----------
/// * `(value, d value / dx)`. The derivative is with respect to the normalized
///   time; the caller scales it to a rate per day.
pub fn evaluate(x: f64, coeffs: &[f64]) -> (f64, f64) {
    let t = chebyshev_t(x, coeffs.len());
    let u = chebyshev_u(x, &t);
    (sum_descending(coeffs, &t), sum_descending(coeffs, &u))
}
