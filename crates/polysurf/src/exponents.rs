use std::ops::Index;

use nalgebra as na;
use serde::Serialize;

use crate::Error;

/// highest power allowed for a single variable, and for a whole term
pub const MAX_DEGREE: i32 = 4;

/// The `nvbl × nunk` table of exponents describing the polynomial. Column `j`
/// is one monomial term, and row `i` gives the power of variable `i` in each
/// term. Every entry is in `0..=4`, and so is the total degree of every term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Exponents(
    /// i32 for compatibility with `f64::powi`
    na::DMatrix<i32>,
);

impl Exponents {
    pub fn new(exps: na::DMatrix<i32>) -> Result<Self, Error> {
        let (nvbl, nunk) = exps.shape();
        for term in 0..nunk {
            let mut degree = 0;
            for var in 0..nvbl {
                let value = exps[(var, term)];
                if !(0..=MAX_DEGREE).contains(&value) {
                    return Err(Error::Exponent {
                        var,
                        term,
                        value: value as i64,
                    });
                }
                degree += value as usize;
            }
            if degree > MAX_DEGREE as usize {
                return Err(Error::Degree { term, degree });
            }
        }
        Ok(Self(exps))
    }

    /// build the table from `nvbl` rows of exponents, one row per variable
    pub fn from_row_slice(
        nvbl: usize,
        nunk: usize,
        data: &[i32],
    ) -> Result<Self, Error> {
        if nvbl * nunk != data.len() {
            return Err(Error::Shape(format!(
                "{} exponents cannot fill a {nvbl}×{nunk} table",
                data.len()
            )));
        }
        Self::new(na::DMatrix::from_row_slice(nvbl, nunk, data))
    }

    /// build the table from one slice of per-variable powers per term
    pub fn from_terms(nvbl: usize, terms: &[&[i32]]) -> Result<Self, Error> {
        let mut data = Vec::with_capacity(nvbl * terms.len());
        for (j, term) in terms.iter().enumerate() {
            if term.len() != nvbl {
                return Err(Error::Shape(format!(
                    "term {} has {} powers for {nvbl} variables",
                    j + 1,
                    term.len()
                )));
            }
            data.extend_from_slice(term);
        }
        Self::new(na::DMatrix::from_column_slice(nvbl, terms.len(), &data))
    }

    /// number of variables
    pub fn nvbl(&self) -> usize {
        self.0.nrows()
    }

    /// number of unknowns, or terms in the polynomial
    pub fn nunk(&self) -> usize {
        self.0.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }

    pub fn as_matrix(&self) -> &na::DMatrix<i32> {
        &self.0
    }
}

impl Index<(usize, usize)> for Exponents {
    type Output = i32;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

/// `x` raised to an already-validated exponent by repeated multiplication
#[inline]
pub(crate) fn ipow(x: f64, e: i32) -> f64 {
    match e {
        0 => 1.0,
        1 => x,
        2 => x * x,
        3 => x * x * x,
        4 => x * x * x * x,
        _ => unreachable!("exponent {e} outside of 0..=4"),
    }
}
