use crate::{Dvec, Error, Exponents, THR};

/// A polynomial described by one coefficient per column of `exponents`.
#[derive(Clone, Debug)]
pub struct Surface<'a> {
    pub exponents: &'a Exponents,
    pub coeffs: Dvec,
}

impl<'a> Surface<'a> {
    pub fn new(exponents: &'a Exponents, coeffs: Dvec) -> Result<Self, Error> {
        if exponents.nunk() != coeffs.len() {
            return Err(Error::Shape(format!(
                "{} coefficients for {} terms",
                coeffs.len(),
                exponents.nunk()
            )));
        }
        Ok(Self { exponents, coeffs })
    }

    /// number of variables
    pub fn nvbl(&self) -> usize {
        self.exponents.nvbl()
    }

    /// evaluate the function at the point `x`. Terms with a negligible
    /// coefficient are skipped entirely, and zero exponents are skipped
    /// rather than evaluated as `x^0`
    pub fn eval(&self, x: &Dvec) -> f64 {
        let mut sum = 0.0;
        for (k, c) in self.coeffs.iter().enumerate() {
            if c.abs() < THR {
                continue;
            }
            let mut prod = *c;
            for (j, xj) in x.iter().enumerate() {
                let ejk = self.exponents[(j, k)];
                if ejk != 0 {
                    prod *= xj.powi(ejk);
                }
            }
            sum += prod;
        }
        sum
    }
}
