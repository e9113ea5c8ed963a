//! Force constants derived from the fitted coefficients, and the fixed-width
//! force-constant file they are written to.

use std::{
    fmt::Display,
    io::{BufRead, BufReader, Read, Write},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Dvec, Error, Exponents};

/// conversion factor for force constants written out in fort.9903
pub const FAC: f64 = 4.359813653e0;

/// factor turning a coefficient into a derivative, indexed by exponent
const FACTORIAL: [f64; 5] = [1.0, 1.0, 2.0, 6.0, 24.0];

/// A scaled derivative with respect to the 1-based coordinates in `coord`.
/// Unused slots are zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fc {
    pub coord: [usize; 4],
    pub val: f64,
}

impl Fc {
    pub fn new(coord: [usize; 4], val: f64) -> Self {
        Self { coord, val }
    }
}

/// convert each coefficient into a force constant. The coordinate indices of
/// each term are filled starting with the last variable.
pub fn force_constants(coeffs: &Dvec, exponents: &Exponents) -> Vec<Fc> {
    let (nvbl, nunk) = exponents.shape();
    let mut ret = Vec::with_capacity(nunk);
    for i in 0..nunk {
        let mut fact = 1.0;
        let mut coord = [0; 4];
        let mut slot = 0;
        for j in (0..nvbl).rev() {
            let e = exponents[(j, i)] as usize;
            fact *= FACTORIAL[e];
            coord[slot..slot + e].fill(j + 1);
            slot += e;
        }
        ret.push(Fc::new(coord, coeffs[i] * fact * FAC));
    }
    ret
}

impl FromStr for Fc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |msg: &str| Error::Parse {
            line: 0,
            msg: format!("{msg} in force constant `{s}`"),
        };
        let fields: Vec<_> = s.split_whitespace().collect();
        let [a, b, c, d, val] = fields[..] else {
            return Err(err("expected 5 fields"));
        };
        let mut coord = [0; 4];
        for (slot, f) in coord.iter_mut().zip([a, b, c, d]) {
            *slot = f.parse().map_err(|_| err("bad coordinate index"))?;
        }
        let val = val.parse().map_err(|_| err("bad value"))?;
        Ok(Fc { coord, val })
    }
}

impl Display for Fc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.coord;
        write!(f, "{a:5}{b:5}{c:5}{d:5}{:20.12}", self.val)
    }
}

#[cfg(test)]
impl approx::AbsDiffEq for Fc {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        1e-12
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let ret = self.coord == other.coord
            && self.val.abs_diff_eq(&other.val, epsilon);
        if !ret {
            eprintln!("{self} != {other}, diff = {:.6e}", self.val - other.val);
        }
        ret
    }
}

/// write `fcs` in the fort.9903 format: a blank line followed by one force
/// constant per line
pub fn write_fcs<W: Write>(w: &mut W, fcs: &[Fc]) -> std::io::Result<()> {
    writeln!(w)?;
    for fc in fcs {
        writeln!(w, "{fc}")?;
    }
    Ok(())
}

pub fn write_fcs_file(
    filename: impl AsRef<Path>,
    fcs: &[Fc],
) -> Result<(), Error> {
    let filename = filename.as_ref();
    let io = |e: std::io::Error| {
        Error::Io(filename.display().to_string(), e.kind())
    };
    let mut f = std::fs::File::create(filename).map_err(io)?;
    write_fcs(&mut f, fcs).map_err(io)
}

/// read force constants written by [write_fcs], skipping blank lines
pub fn read_fcs(r: impl Read) -> Result<Vec<Fc>, Error> {
    let mut ret = Vec::new();
    for (i, line) in BufReader::new(r).lines().enumerate() {
        let line =
            line.map_err(|e| Error::Io("force constants".into(), e.kind()))?;
        if line.trim().is_empty() {
            continue;
        }
        let fc = line.parse::<Fc>().map_err(|e| match e {
            Error::Parse { msg, .. } => Error::Parse { line: i + 1, msg },
            e => e,
        })?;
        ret.push(fc);
    }
    Ok(ret)
}
