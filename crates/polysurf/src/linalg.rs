use nalgebra as na;

use crate::{Dmat, Dvec, Error};

/// condition numbers above this are reported as ill-conditioned
pub const COND_TOL: f64 = 1e16;

/// estimate the 2-norm condition number of `mat` from its singular values.
/// returns infinity for an exactly singular matrix
pub fn condition(mat: &Dmat) -> f64 {
    if mat.is_empty() {
        return 1.0;
    }
    let svd = na::linalg::SVD::new(mat.clone(), false, false);
    let s = &svd.singular_values;
    let (max, min) = (s.max(), s.min());
    if min == 0.0 { f64::INFINITY } else { max / min }
}

/// log a warning if `mat` is ill-conditioned. `what` names the matrix for the
/// message. returns whether the warning was triggered
pub(crate) fn check_condition(mat: &Dmat, what: &str, quiet: bool) -> bool {
    let cond = condition(mat);
    let bad = !cond.is_finite() || cond > COND_TOL;
    if bad && !quiet {
        log::warn!(
            "{what} is singular or near-singular with condition number \
             {cond:.4e}, continuing"
        );
    }
    bad
}

/// try to invert `mat` using the Cholesky decomposition but fall back to LU
/// decomposition if it fails. Ill-conditioning is only a warning, but an
/// inverse that is missing or contains non-finite values is an error
pub fn invert(mat: &Dmat, what: &str, quiet: bool) -> Result<Dmat, Error> {
    check_condition(mat, what, quiet);
    let inv = match na::Cholesky::new(mat.clone()) {
        Some(chol) => chol.inverse(),
        None => {
            log::debug!("Cholesky decomposition of {what} failed, trying LU");
            na::LU::new(mat.clone())
                .try_inverse()
                .ok_or_else(|| Error::NonFinite(format!("inverse of {what}")))?
        }
    };
    finite(inv.as_slice(), what)?;
    Ok(inv)
}

/// Solve the [ordinary least
/// squares](https://en.wikipedia.org/wiki/Ordinary_least_squares) problem β =
/// (XᵀX)⁻¹Xᵀy for β. First try to solve the equations using the Cholesky
/// decomposition using forward and backward substitution as described
/// [here](https://en.wikipedia.org/wiki/Numerical_methods_for_linear_least_squares#Inverting_the_matrix_of_the_normal_equations).
/// If the Cholesky decomposition fails, fall back on the LU decomposition and
/// inverting XᵀX directly.
pub fn solve_least_squares(
    x: &Dmat,
    y: &Dvec,
    quiet: bool,
) -> Result<Dvec, Error> {
    const WHAT: &str = "normal equations matrix";
    let xt = x.transpose();
    let xtx = &xt * x;
    check_condition(&xtx, WHAT, quiet);
    let beta = match na::Cholesky::new(xtx.clone()) {
        Some(chol) => chol.solve(&(&xt * y)),
        None => {
            log::debug!("Cholesky decomposition of {WHAT} failed, trying LU");
            let inv = na::LU::new(xtx)
                .try_inverse()
                .ok_or_else(|| Error::NonFinite(format!("inverse of {WHAT}")))?;
            inv * xt * y
        }
    };
    finite(beta.as_slice(), "least-squares coefficients")?;
    Ok(beta)
}

fn finite(vals: &[f64], what: &str) -> Result<(), Error> {
    if vals.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::NonFinite(what.to_owned()))
    }
}
