use std::{error, fmt::Display};

/// Fatal failures of a fitting run. Recoverable degeneracy is only logged and
/// never shows up here.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// an exponent outside of 0..=4
    Exponent { var: usize, term: usize, value: i64 },

    /// a term whose total degree exceeds 4
    Degree { term: usize, degree: usize },

    /// inconsistent dimensions between the pieces of a data set
    Shape(String),

    /// a matrix inversion or fit that produced infinite or undefined values
    NonFinite(String),

    /// Newton-Raphson failed to converge in the given number of iterations
    TooManyIterations(usize),

    /// malformed input file, with a 1-based line number
    Parse { line: usize, msg: String },

    Io(String, std::io::ErrorKind),

    /// malformed configuration file
    Config(String),
}

impl Error {
    /// Returns `true` for the errors caused by a bad exponent table.
    ///
    /// [`Exponent`]: Error::Exponent
    /// [`Degree`]: Error::Degree
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Exponent { .. } | Self::Degree { .. })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Exponent { var, term, value } => write!(
                f,
                "exponent {value} of variable {} in term {} is outside 0..=4",
                var + 1,
                term + 1
            ),
            Error::Degree { term, degree } => write!(
                f,
                "term {} has total degree {degree}, more than 4",
                term + 1
            ),
            Error::Shape(s) => write!(f, "shape mismatch: {s}"),
            Error::NonFinite(s) => write!(f, "non-finite result in {s}"),
            Error::TooManyIterations(n) => {
                write!(f, "too many Newton-Raphson iterations ({n})")
            }
            Error::Parse { line, msg } => {
                write!(f, "parse error on line {line}: {msg}")
            }
            Error::Io(s, kind) => write!(f, "{s}: {kind}"),
            Error::Config(s) => write!(f, "bad configuration: {s}"),
        }
    }
}

impl error::Error for Error {}
