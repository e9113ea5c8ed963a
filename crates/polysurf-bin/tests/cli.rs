use std::{fs::read_to_string, path::Path};

use assert_cmd::Command;
use polysurf::{Dataset, Dmat, Dvec, Exponents, fc::FAC, fc::read_fcs};
use tempfile::tempdir;
use test_case::test_case;

/// a quadratic surface with its minimum of 1.5 at (0.2, -0.1), sampled on a
/// 5×5 grid and fit with every term up to degree 2
fn input() -> Dataset {
    let pts = [-0.5, -0.25, 0.0, 0.25, 0.5];
    let mut disps = Vec::new();
    let mut energies = Vec::new();
    for x in pts {
        for y in pts {
            let (u, v) = (x - 0.2, y + 0.1);
            disps.extend([x, y]);
            energies.push(1.5 + u * u + 0.5 * v * v + 0.25 * u * v);
        }
    }
    #[rustfmt::skip]
    let exponents = Exponents::from_row_slice(2, 6, &[
        0, 1, 0, 2, 1, 0,
        0, 0, 1, 0, 1, 2,
    ])
    .unwrap();
    Dataset::new(
        Dmat::from_row_slice(energies.len(), 2, &disps),
        Dvec::from(energies),
        exponents,
        None,
    )
    .unwrap()
}

fn run(dir: &Path, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::cargo_bin("polysurf").unwrap();
    cmd.arg("anpass.in").args(args).current_dir(dir).output().unwrap()
}

#[test]
fn two_passes() -> std::io::Result<()> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("anpass.in"), input().to_string())?;
    let output = run(dir.path(), &[]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stationary point is a minimum"), "{stdout}");

    for file in ["anpass.out", "anpass2.in", "anpass2.out", "fort.9903"] {
        assert!(dir.path().join(file).exists(), "missing {file}");
    }

    let out = read_to_string(dir.path().join("anpass.out"))?;
    assert!(out.contains("M I N I M U M"));
    assert!(out.contains("WHERE ENERGY IS"));
    assert!(out.contains("WEIGHTED SUM OF SQUARED RESIDUALS IS"));

    // the second input is the first with the stationary point added
    let second = Dataset::load_file(dir.path().join("anpass2.in")).unwrap();
    assert!(second.is_stationary());
    let bias = second.bias.unwrap();
    assert!((bias.disp[0] - 0.2).abs() < 1e-7);
    assert!((bias.disp[1] + 0.1).abs() < 1e-7);
    assert!((bias.energy - 1.5).abs() < 1e-10);

    let fcs = read_fcs(std::fs::File::open(dir.path().join("fort.9903"))?)
        .unwrap();
    assert_eq!(fcs.len(), 6);
    let fc = |coord: [usize; 4]| {
        fcs.iter().find(|fc| fc.coord == coord).unwrap().val
    };
    assert!((fc([1, 1, 0, 0]) - 2.0 * FAC).abs() < 1e-8);
    assert!((fc([2, 2, 0, 0]) - 1.0 * FAC).abs() < 1e-8);
    assert!((fc([2, 1, 0, 0]) - 0.25 * FAC).abs() < 1e-8);
    Ok(())
}

#[test_case(&["--once"], &["anpass.out", "fort.9903"], &["anpass2.in", "anpass2.out"] ; "once")]
#[test_case(&["-q"], &["fort.9903", "anpass2.in"], &["anpass.out", "anpass2.out"] ; "quiet")]
#[test_case(&["first.out", "--json", "passes.json"], &["first.out", "passes.json"], &["anpass.out"] ; "named outputs")]
fn outputs(args: &[&str], want: &[&str], not_want: &[&str]) -> std::io::Result<()> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("anpass.in"), input().to_string())?;
    let output = run(dir.path(), args);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    for file in want {
        assert!(dir.path().join(file).exists(), "missing {file}");
    }
    for file in not_want {
        assert!(!dir.path().join(file).exists(), "unexpected {file}");
    }
    Ok(())
}

#[test]
fn config_file() -> std::io::Result<()> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("anpass.in"), input().to_string())?;
    std::fs::write(dir.path().join("polysurf.toml"), "maxit = 2\n")?;
    let output = run(dir.path(), &["-c", "polysurf.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too many Newton-Raphson iterations"), "{stderr}");
    Ok(())
}

#[test]
fn bad_exponent() -> std::io::Result<()> {
    let dir = tempdir()?;
    let input = input().to_string().replace(
        "    0    1    0    2    1    0\n",
        "    0    1    0    5    1    0\n",
    );
    std::fs::write(dir.path().join("anpass.in"), input)?;
    let output = run(dir.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load anpass.in"), "{stderr}");
    assert!(stderr.contains("outside 0..=4"), "{stderr}");
    Ok(())
}
