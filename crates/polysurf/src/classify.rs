use std::fmt::Display;

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{Dmat, Dvec, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    Max,
    Min,
    Stat,
}

impl StatKind {
    /// the spaced-out banner used in the text report
    pub fn banner(&self) -> &'static str {
        match self {
            StatKind::Max => "M A X I M U M",
            StatKind::Min => "M I N I M U M",
            StatKind::Stat => "S T A T I O N A R Y  P O I N T",
        }
    }
}

impl Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StatKind::Max => "maximum",
                StatKind::Min => "minimum",
                StatKind::Stat => "saddle point",
            }
        )
    }
}

/// The kind of a stationary point, along with the eigenvalues of the Hessian
/// there in ascending order. Column `i` of `evecs` belongs to `evals[i]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Characterization {
    pub kind: StatKind,
    pub evals: Dvec,
    pub evecs: Dmat,
}

/// classify a point from the signs of the Hessian eigenvalues there. any zero
/// eigenvalue makes the point a general stationary point
pub fn kind(evals: &Dvec) -> StatKind {
    if evals.iter().all(|&v| v < 0.0) {
        StatKind::Max
    } else if evals.iter().all(|&v| v > 0.0) {
        StatKind::Min
    } else {
        StatKind::Stat
    }
}

/// eigen-decompose the symmetric matrix `hess`, sorting the eigenpairs by
/// ascending eigenvalue
pub fn characterize(hess: &Dmat) -> Characterization {
    let n = hess.nrows();
    let eig = na::SymmetricEigen::new(hess.clone());
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
    let evals = Dvec::from_iterator(n, order.iter().map(|&i| eig.eigenvalues[i]));
    let mut evecs = Dmat::zeros(n, n);
    for (col, &i) in order.iter().enumerate() {
        evecs.set_column(col, &eig.eigenvectors.column(i));
    }
    Characterization {
        kind: kind(&evals),
        evals,
        evecs,
    }
}

impl Surface<'_> {
    /// characterize the stationary point `x` by the eigenvalues of the Hessian
    /// there
    pub fn characterize(&self, x: &Dvec) -> Characterization {
        characterize(&self.hess(x))
    }
}
