//! Loading a [Dataset] from the line-oriented input format.

use std::{
    io::{BufRead, BufReader, Read},
    path::Path,
    sync::LazyLock,
};

use regex::Regex;

use crate::{Bias, Dataset, Dmat, Dvec, Error, Exponents};

/// matches a format line like `(3F12.8,f20.12)` and captures the number of
/// displacement fields
static START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\((\d+)f[0-9.]+,f[0-9.]+\)\s*$").unwrap()
});

#[derive(Clone, Copy, PartialEq)]
enum State {
    Disp,
    Unks,
    Exps,
    Stat,
    None,
}

fn floats(line: &str, lineno: usize) -> Result<Vec<f64>, Error> {
    line.split_whitespace()
        .map(|s| {
            s.parse::<f64>().map_err(|_| Error::Parse {
                line: lineno,
                msg: format!("failed to parse `{s}` as a float"),
            })
        })
        .collect()
}

impl Dataset {
    pub fn load_file(filename: impl AsRef<Path>) -> Result<Self, Error> {
        let filename = filename.as_ref();
        let f = std::fs::File::open(filename).map_err(|e| {
            Error::Io(filename.display().to_string(), e.kind())
        })?;
        Self::load(f)
    }

    /// Load a [Dataset] from `r`. Everything before a line like
    /// `(3F12.8,f20.12)` is ignored, as is every line starting with `!`. The
    /// format line gives the number of displacements on each of the following
    /// lines, which are followed by an energy. After `UNKNOWNS` comes the
    /// number of terms, and after `FUNCTION` the exponents, one row of terms
    /// per variable. A `STATIONARY POINT` line is followed by the bias
    /// coordinates and energy.
    pub fn load(r: impl Read) -> Result<Self, Error> {
        let mut state = State::None;
        let mut ndisp_fields = None;
        let mut disps = Vec::new();
        let mut energies = Vec::new();
        let mut nunk = None;
        let mut exponents = Vec::new();
        let mut bias = None;
        let mut lineno = 0;
        for line in BufReader::new(r).lines() {
            lineno += 1;
            let line =
                line.map_err(|e| Error::Io("input".to_owned(), e.kind()))?;
            if line.starts_with('!') || line.trim().is_empty() {
                continue;
            }
            if let Some(caps) = START.captures(&line) {
                let n: usize = caps[1].parse().map_err(|_| Error::Parse {
                    line: lineno,
                    msg: "bad displacement count".to_owned(),
                })?;
                if let Some(prev) = ndisp_fields.filter(|&prev| prev != n) {
                    return Err(Error::Parse {
                        line: lineno,
                        msg: format!(
                            "format line gives {n} displacements, but an \
                             earlier one gave {prev}"
                        ),
                    });
                }
                ndisp_fields = Some(n);
                state = State::Disp;
            } else if line.contains("UNKNOWNS") {
                state = State::Unks;
            } else if line.contains("FUNCTION") {
                state = State::Exps;
            } else if line.contains("END OF DATA") {
                state = State::None;
            } else if line.contains("STATIONARY POINT") {
                state = State::Stat;
            } else {
                match state {
                    State::Disp => {
                        let f = floats(&line, lineno)?;
                        let n = ndisp_fields.unwrap_or_default();
                        if f.len() != n + 1 {
                            return Err(Error::Parse {
                                line: lineno,
                                msg: format!(
                                    "expected {} displacements and an \
                                     energy, found {} fields",
                                    n,
                                    f.len()
                                ),
                            });
                        }
                        disps.extend_from_slice(&f[..n]);
                        energies.push(f[n]);
                    }
                    State::Unks => {
                        let n = line.trim().parse().map_err(|_| {
                            Error::Parse {
                                line: lineno,
                                msg: "bad number of unknowns".to_owned(),
                            }
                        })?;
                        nunk = Some(n);
                        state = State::None;
                    }
                    State::Exps => {
                        for s in line.split_whitespace() {
                            let e = s.parse::<i32>().map_err(|_| {
                                Error::Parse {
                                    line: lineno,
                                    msg: format!("bad exponent `{s}`"),
                                }
                            })?;
                            exponents.push(e);
                        }
                    }
                    State::Stat => {
                        let f = floats(&line, lineno)?;
                        let Some((&energy, disp)) = f.split_last() else {
                            unreachable!("blank lines are skipped");
                        };
                        bias = Some(Bias {
                            disp: Dvec::from_column_slice(disp),
                            energy,
                        });
                        state = State::None;
                    }
                    State::None => {}
                }
            }
        }
        let missing = |what: &str| Error::Parse {
            line: lineno,
            msg: format!("missing {what}"),
        };
        let nvbl = ndisp_fields.ok_or_else(|| missing("data format line"))?;
        let nunk = nunk.ok_or_else(|| missing("number of unknowns"))?;
        let exponents = Exponents::from_row_slice(nvbl, nunk, &exponents)?;
        if disps.len() != energies.len() * nvbl {
            return Err(Error::Shape(format!(
                "{} displacements for {} points in {nvbl} variables",
                disps.len(),
                energies.len()
            )));
        }
        Self::new(
            Dmat::from_row_slice(energies.len(), nvbl, &disps),
            Dvec::from(energies),
            exponents,
            bias,
        )
    }
}
