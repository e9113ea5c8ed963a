//! Fit a polynomial potential energy surface to a table of displacements and
//! energies, find and characterize its stationary point, and compute the
//! force constants there.

use std::fmt::{Debug, Display};

use nalgebra as na;
use serde::{Deserialize, Serialize};

pub mod classify;
pub mod config;
pub mod deriv;
pub mod error;
pub mod exponents;
pub mod fc;
pub mod fit;
pub mod input;
pub mod linalg;
pub mod newton;
pub mod report;
pub mod run;
pub mod surface;

pub use classify::{Characterization, StatKind};
pub use config::Config;
pub use error::Error;
pub use exponents::Exponents;
pub use fc::Fc;
pub use fit::{Fit, Fitter, Residuals};
pub use newton::Newton;
pub use run::{Pass, Runner};
pub use surface::Surface;


/// threshold for considering a coefficient, or a term of the gradient or
/// Hessian, to be zero
pub const THR: f64 = 1e-10;

pub type Dmat = na::DMatrix<f64>;
pub type Dvec = na::DVector<f64>;

/// A reference geometry and energy subtracted from a [Dataset] before fitting.
/// A stationary point returned by a pass, combined with its energy, is the
/// "long line" used as the bias of the next pass.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Bias {
    pub disp: Dvec,
    pub energy: f64,
}

impl Bias {
    /// the zero bias for `nvbl` variables
    pub fn zeros(nvbl: usize) -> Self {
        Self {
            disp: Dvec::zeros(nvbl),
            energy: 0.0,
        }
    }

    /// the coordinates followed by the energy
    pub fn long_line(&self) -> Vec<f64> {
        let mut ret: Vec<f64> = self.disp.iter().copied().collect();
        ret.push(self.energy);
        ret
    }
}

impl Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for d in &self.disp {
            write!(f, "{d:20.12}")?;
        }
        write!(f, "{:20.12}", self.energy)
    }
}

/// The displacements and energies to fit and the exponents describing the
/// polynomial to fit them with.
#[derive(Clone)]
pub struct Dataset {
    /// one row per data point, one column per variable
    pub disps: Dmat,
    pub energies: Dvec,
    pub exponents: Exponents,
    /// the initial guess at the stationary point. When present, the data is
    /// already considered to be centered on a stationary point
    pub bias: Option<Bias>,
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "disps:\n{:12.8}", self.disps)?;
        write!(f, "energies:\n{:20.12}", self.energies)?;
        write!(f, "exponents:\n{:5}", self.exponents.as_matrix())?;
        write!(f, "bias:\n{:?}", self.bias)
    }
}

impl Dataset {
    pub fn new(
        disps: Dmat,
        energies: Dvec,
        exponents: Exponents,
        bias: Option<Bias>,
    ) -> Result<Self, Error> {
        let (ndisps, nvbl) = disps.shape();
        if ndisps != energies.len() {
            return Err(Error::Shape(format!(
                "{ndisps} displacements for {} energies",
                energies.len()
            )));
        }
        if nvbl != exponents.nvbl() {
            return Err(Error::Shape(format!(
                "{nvbl} displacement columns for {} variables",
                exponents.nvbl()
            )));
        }
        if let Some(b) = &bias {
            check_bias(b, nvbl)?;
        }
        Ok(Self {
            disps,
            energies,
            exponents,
            bias,
        })
    }

    pub fn nvbl(&self) -> usize {
        self.disps.ncols()
    }

    /// whether the input is already centered on a stationary point, in which
    /// case the fit is not repeated
    pub fn is_stationary(&self) -> bool {
        self.bias.is_some()
    }

    /// return a copy of `self` with `bias` subtracted from every displacement
    /// and energy
    pub fn bias(&self, bias: &Bias) -> Result<Self, Error> {
        check_bias(bias, self.nvbl())?;
        let mut disps = self.disps.clone();
        for mut row in disps.row_iter_mut() {
            for (d, b) in row.iter_mut().zip(bias.disp.iter()) {
                *d -= b;
            }
        }
        let energies = self.energies.add_scalar(-bias.energy);
        Ok(Self {
            disps,
            energies,
            ..self.clone()
        })
    }
}

fn check_bias(bias: &Bias, nvbl: usize) -> Result<(), Error> {
    if bias.disp.len() != nvbl {
        return Err(Error::Shape(format!(
            "bias has {} coordinates for {nvbl} variables",
            bias.disp.len()
        )));
    }
    Ok(())
}

impl Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "!INPUT
TITLE
from polysurf
INDEPENDENT VARIABLES"
        )?;
        let (rows, cols) = self.disps.shape();
        writeln!(f, "{cols:4}")?;
        writeln!(
            f,
            "DATA POINTS
{:5}{:5}",
            rows, -2
        )?;
        writeln!(f, "({cols}F12.8,f20.12)")?;
        for row in 0..rows {
            for col in 0..cols {
                write!(f, "{:12.8}", self.disps[(row, col)])?;
            }
            writeln!(f, "{:20.12}", self.energies[row])?;
        }
        writeln!(f, "UNKNOWNS")?;
        let (rows, cols) = self.exponents.shape();
        writeln!(f, "{cols:4}")?;
        writeln!(f, "FUNCTION")?;
        for row in 0..rows {
            for col in 0..cols {
                if col > 0 && col % 16 == 0 {
                    writeln!(f)?;
                }
                write!(f, "{:5}", self.exponents[(row, col)])?;
            }
            writeln!(f)?;
        }
        if let Some(bias) = &self.bias {
            writeln!(f, "STATIONARY POINT")?;
            writeln!(f, "{bias}")?;
        }
        writeln!(
            f,
            "END OF DATA
!FIT
!STATIONARY POINT
!END"
        )
    }
}
