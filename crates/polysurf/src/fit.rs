use serde::Serialize;

use crate::{
    Config, Dmat, Dvec, Error, Exponents, exponents::ipow,
    linalg::solve_least_squares,
};

/// Least-squares fitter for the coefficients of a polynomial
#[derive(Clone, Copy, Debug, Default)]
pub struct Fitter {
    quiet: bool,
}

impl From<&Config> for Fitter {
    fn from(config: &Config) -> Self {
        Self {
            quiet: config.quiet,
        }
    }
}

/// The result of [Fitter::fit]: the coefficient for each term and the design
/// matrix they were fit against.
#[derive(Clone, Debug)]
pub struct Fit {
    pub coeffs: Dvec,
    pub design: Dmat,
}

/// Computed against observed energies for each data point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Residuals {
    pub computed: Dvec,
    pub observed: Dvec,
    /// sum of squared residuals
    pub sum: f64,
}

impl Residuals {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// `computed - observed` for point `i`
    pub fn residual(&self, i: usize) -> f64 {
        self.computed[i] - self.observed[i]
    }
}

/// build the `ndisps × nunk` matrix whose `(i, k)` element is the `k`th term
/// of the polynomial evaluated at the `i`th displacement, without its
/// coefficient
pub fn design_matrix(disps: &Dmat, exponents: &Exponents) -> Dmat {
    let (ndisps, ncols) = disps.shape();
    let nunk = exponents.nunk();
    let mut x = Dmat::repeat(ndisps, nunk, 1.0);
    for i in 0..ndisps {
        let row = disps.row(i);
        for k in 0..nunk {
            let xik = &mut x[(i, k)];
            for j in 0..ncols {
                let ejk = exponents[(j, k)];
                if ejk != 0 {
                    *xik *= ipow(row[j], ejk);
                }
            }
        }
    }
    x
}

impl Fitter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// determine the [ordinary least
    /// squares](https://en.wikipedia.org/wiki/Ordinary_least_squares) solution
    /// to the [polynomial
    /// regression](https://en.wikipedia.org/wiki/Polynomial_regression) problem
    /// described by `disps`, `energies`, and `exponents`, and return the
    /// solution vector along with the design matrix. The latter is for
    /// checking the residuals.
    pub fn fit(
        &self,
        disps: &Dmat,
        energies: &Dvec,
        exponents: &Exponents,
    ) -> Result<Fit, Error> {
        if disps.ncols() != exponents.nvbl() {
            return Err(Error::Shape(format!(
                "{} displacement columns for {} variables",
                disps.ncols(),
                exponents.nvbl()
            )));
        }
        if disps.nrows() != energies.len() {
            return Err(Error::Shape(format!(
                "{} displacements for {} energies",
                disps.nrows(),
                energies.len()
            )));
        }
        let design = design_matrix(disps, exponents);
        let coeffs = solve_least_squares(&design, energies, self.quiet)?;
        Ok(Fit { coeffs, design })
    }
}

impl Fit {
    /// evaluate the fitted function at every data point and compare it to
    /// `energies`
    pub fn residuals(&self, energies: &Dvec) -> Residuals {
        let computed = &self.design * &self.coeffs;
        let sum = computed
            .iter()
            .zip(energies.iter())
            .map(|(comp, obsv)| (comp - obsv) * (comp - obsv))
            .sum();
        Residuals {
            computed,
            observed: energies.clone(),
            sum,
        }
    }
}
