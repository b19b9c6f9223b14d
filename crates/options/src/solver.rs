//! Bracketed root finding (Brent's method).

use thiserror::Error;

/// Absolute x tolerance.
pub const XTOL: f64 = 2e-12;
/// Relative x tolerance (4 * f64::EPSILON).
pub const RTOL: f64 = 4.0 * f64::EPSILON;
pub const MAX_ITER: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolveError {
    #[error("f(a) and f(b) must have opposite signs (f(a)={fa}, f(b)={fb})")]
    NoSignChange { fa: f64, fb: f64 },

    #[error("function returned a non-finite value")]
    NonFinite,

    #[error("failed to converge after {0} iterations")]
    MaxIterations(usize),
}

/// Find a root of `f` in `[a, b]` with Brent's method.
///
/// Requires `f(a)` and `f(b)` to differ in sign (or one of them to be zero).
/// Combines bisection, secant and inverse quadratic interpolation.
pub fn brent<F>(mut f: F, a: f64, b: f64) -> Result<f64, SolveError>
where
    F: FnMut(f64) -> f64,
{
    let (mut xpre, mut xcur) = (a, b);
    let (mut fpre, mut fcur) = (f(xpre), f(xcur));
    if !fpre.is_finite() || !fcur.is_finite() {
        return Err(SolveError::NonFinite);
    }
    if fpre == 0.0 {
        return Ok(xpre);
    }
    if fcur == 0.0 {
        return Ok(xcur);
    }
    if fpre.signum() == fcur.signum() {
        return Err(SolveError::NoSignChange { fa: fpre, fb: fcur });
    }

    let (mut xblk, mut fblk) = (0.0, 0.0);
    let (mut spre, mut scur) = (0.0, 0.0);

    for _ in 0..MAX_ITER {
        if fpre != 0.0 && fcur != 0.0 && fpre.signum() != fcur.signum() {
            xblk = xpre;
            fblk = fpre;
            spre = xcur - xpre;
            scur = spre;
        }
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;

            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }

        let delta = (XTOL + RTOL * xcur.abs()) / 2.0;
        let sbis = (xblk - xcur) / 2.0;
        if fcur == 0.0 || sbis.abs() < delta {
            return Ok(xcur);
        }

        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // secant
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // inverse quadratic interpolation
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };

            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                spre = scur;
                scur = stry;
            } else {
                spre = sbis;
                scur = sbis;
            }
        } else {
            spre = sbis;
            scur = sbis;
        }

        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else {
            xcur += if sbis > 0.0 { delta } else { -delta };
        }

        fcur = f(xcur);
        if !fcur.is_finite() {
            return Err(SolveError::NonFinite);
        }
    }

    Err(SolveError::MaxIterations(MAX_ITER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_square_root_of_two() {
        let root = brent(|x| x * x - 2.0, 0.0, 2.0).unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10, "root={root}");
    }

    #[test]
    fn finds_root_of_cubic_with_reversed_bracket() {
        let root = brent(|x| x * x * x - x - 1.0, 2.0, 1.0).unwrap();
        assert!((root - 1.324_717_957_244_746).abs() < 1e-10, "root={root}");
    }

    #[test]
    fn endpoint_root_is_returned_directly() {
        assert_eq!(brent(|x| x - 1.0, 1.0, 3.0), Ok(1.0));
        assert_eq!(brent(|x| x - 3.0, 1.0, 3.0), Ok(3.0));
    }

    #[test]
    fn same_sign_endpoints_are_rejected() {
        let err = brent(|x| x * x + 1.0, -1.0, 1.0).unwrap_err();
        assert!(matches!(err, SolveError::NoSignChange { .. }));
    }

    #[test]
    fn nan_is_rejected() {
        assert_eq!(brent(|_| f64::NAN, 0.0, 1.0), Err(SolveError::NonFinite));
    }

    #[test]
    fn identical_inputs_give_identical_roots() {
        let f = |x: f64| x.exp() - 3.0;
        assert_eq!(brent(f, 0.0, 2.0), brent(f, 0.0, 2.0));
    }
}
