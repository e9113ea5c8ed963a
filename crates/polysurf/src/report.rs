use std::io::{self, Write};

use crate::{Bias, Pass, Residuals};

/// write the initial guess at the stationary point
pub fn write_bias<W: Write>(w: &mut W, bias: &Bias) -> io::Result<()> {
    writeln!(
        w,
        "INITIAL GUESS AT STATIONARY POINT IS {:20.12}",
        bias.energy
    )?;
    for d in &bias.disp {
        write!(w, "{d:12.8}")?;
    }
    writeln!(w)
}

/// write the computed and observed energies and the residual for each point,
/// followed by the sum of squared residuals
pub fn write_residuals<W: Write>(
    w: &mut W,
    residuals: &Residuals,
) -> io::Result<()> {
    writeln!(
        w,
        "{:>5}{:>20}{:>20}{:>20}",
        "POINT", "COMPUTED", "OBSERVED", "RESIDUAL"
    )?;
    for i in 0..residuals.len() {
        writeln!(
            w,
            "{:5}{:20.12}{:20.12}{:20.8e}",
            i + 1,
            residuals.computed[i],
            residuals.observed[i],
            residuals.residual(i),
        )?;
    }
    writeln!(
        w,
        "WEIGHTED SUM OF SQUARED RESIDUALS IS {:17.8e}",
        residuals.sum
    )
}

/// write the full report for a single pass
pub fn write_pass<W: Write>(w: &mut W, pass: &Pass) -> io::Result<()> {
    write_bias(w, &pass.bias)?;
    write_residuals(w, &pass.residuals)?;
    let c = &pass.characterization;
    writeln!(w, "\n{}", c.kind.banner())?;
    let stat = &pass.stationary;
    writeln!(w, "WHERE ENERGY IS {:20.12}", stat.energy)?;
    let mut at = "AT";
    for x in &stat.disp {
        writeln!(w, "{at:>12}{x:18.10}")?;
        at = "";
    }
    writeln!(w, "{stat}")?;
    writeln!(w, "EIGENVALUE(S) OF HESSIAN, STARTING WITH LOWEST\n")?;
    for (i, v) in c.evals.iter().enumerate() {
        writeln!(w, "EIGENVALUE {:5}{v:20.10e}", i + 1)?;
        for e in c.evecs.column(i).iter() {
            write!(w, "{e:16.8}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}
