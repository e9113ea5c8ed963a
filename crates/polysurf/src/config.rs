//! Settings threaded into the fitter and the Newton-Raphson solver

use std::{fs::read_to_string, path::Path};

use serde::{Deserialize, Serialize};

use crate::Error;

/// default cap on Newton-Raphson iterations
pub const MAXIT: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The maximum number of Newton-Raphson iterations before giving up on
    /// finding the stationary point.
    pub maxit: usize,

    /// Don't report recoverable warnings like an ill-conditioned matrix.
    pub quiet: bool,

    /// Log the update vector of every Newton-Raphson iteration.
    pub debug: bool,

    /// Only run the first pass, even if the input was not already at a
    /// stationary point.
    pub once: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maxit: MAXIT,
            quiet: false,
            debug: false,
            once: false,
        }
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }
}

impl Config {
    pub fn load(filename: impl AsRef<Path>) -> Result<Self, Error> {
        let filename = filename.as_ref();
        let contents = read_to_string(filename).map_err(|e| {
            Error::Io(filename.display().to_string(), e.kind())
        })?;
        contents.parse()
    }
}
