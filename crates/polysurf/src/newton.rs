use crate::{Config, Dvec, Error, Surface, config::MAXIT, linalg::invert};

/// fixed damping applied to every Newton-Raphson step
pub const DAMPING: f64 = 0.5;

/// an update with every component at or below this magnitude is converged
pub const TOLERANCE: f64 = 1.1e-8;

/// Damped [Newton's optimization
/// method](https://en.wikipedia.org/wiki/Newton%27s_method_in_optimization)
/// for finding a root of the gradient of a [Surface].
#[derive(Clone, Copy, Debug)]
pub struct Newton {
    maxit: usize,
    quiet: bool,
    debug: bool,
}

impl Default for Newton {
    fn default() -> Self {
        Self {
            maxit: MAXIT,
            quiet: false,
            debug: false,
        }
    }
}

impl From<&Config> for Newton {
    fn from(config: &Config) -> Self {
        Self {
            maxit: config.maxit,
            quiet: config.quiet,
            debug: config.debug,
        }
    }
}

impl Newton {
    pub fn new(maxit: usize) -> Self {
        Self {
            maxit,
            ..Self::default()
        }
    }

    /// find the stationary point of `surface`, starting from the origin
    pub fn solve(&self, surface: &Surface) -> Result<Dvec, Error> {
        let mut x = Dvec::zeros(surface.nvbl());
        for iter in 0..self.maxit {
            let grad = surface.grad(&x);
            let hess = surface.hess(&x);
            let inv = invert(&hess, "Hessian", self.quiet)?;
            let delta = DAMPING * inv * grad;
            if delta.iter().any(|d| !d.is_finite()) {
                return Err(Error::NonFinite("Newton-Raphson update".into()));
            }
            if delta.iter().all(|d| d.abs() <= TOLERANCE) {
                return Ok(x);
            }
            if self.debug {
                log::info!(
                    "iteration {:5} update vector, max |δ| = {:+10.5e}: {:12.8}",
                    iter + 1,
                    delta.amax(),
                    delta.transpose(),
                );
            }
            x -= delta;
        }
        Err(Error::TooManyIterations(self.maxit))
    }
}
