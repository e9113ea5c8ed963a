use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use polysurf::{
    Config, Dataset, Pass, Runner,
    fc::write_fcs_file,
    report::write_pass,
};

/// fit a polynomial to a potential energy surface, find its stationary point,
/// and compute the force constants there
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// input file
    #[arg(value_parser)]
    infile: String,

    /// output file for the first pass. Defaults to the input file name with
    /// its `.in` extension replaced by `.out`
    #[arg(value_parser)]
    outfile: Option<String>,

    /// TOML file with default settings. Flags given on the command line take
    /// precedence
    #[arg(short, long)]
    config: Option<String>,

    /// print nothing and don't write the report files
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// log every Newton-Raphson iteration
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// only run one pass, don't refit at the stationary point
    #[arg(long, default_value_t = false)]
    once: bool,

    /// maximum number of Newton-Raphson iterations
    #[arg(short, long)]
    maxit: Option<usize>,

    /// also write the results of every pass to this file as JSON
    #[arg(long)]
    json: Option<String>,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(f) => Config::load(f)
                .with_context(|| format!("failed to load config from {f}"))?,
            None => Config::default(),
        };
        config.quiet |= self.quiet;
        config.debug |= self.debug;
        config.once |= self.once;
        if let Some(maxit) = self.maxit {
            config.maxit = maxit;
        }
        Ok(config)
    }

    fn outfile(&self) -> PathBuf {
        if let Some(out) = &self.outfile {
            return PathBuf::from(out);
        }
        let infile = Path::new(&self.infile);
        match infile.extension() {
            Some(ext) if ext == "in" => infile.with_extension("out"),
            _ => {
                let mut out = infile.as_os_str().to_owned();
                out.push(".out");
                PathBuf::from(out)
            }
        }
    }
}

fn init_logger(config: &Config) {
    let level = if config.quiet {
        "off"
    } else if config.debug {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level),
    )
    .init();
}

fn write_report(path: &Path, pass: &Pass) -> anyhow::Result<()> {
    let f = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    write_pass(&mut w, pass)?;
    w.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.config()?;
    init_logger(&config);

    let data = Dataset::load_file(&args.infile)
        .with_context(|| format!("failed to load {}", args.infile))?;
    let dir = Path::new(&args.infile)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let quiet = config.quiet;

    let passes = Runner::new(config).run(&data)?;

    let fcfile = dir.join("fort.9903");
    let outfiles = [args.outfile(), dir.join("anpass2.out")];
    for (i, (pass, outfile)) in passes.iter().zip(&outfiles).enumerate() {
        if i == 1 {
            // the input for rerunning the second pass by itself
            let next = Dataset {
                bias: Some(passes[0].stationary.clone()),
                ..data.clone()
            };
            let path = dir.join("anpass2.in");
            std::fs::write(&path, next.to_string()).with_context(|| {
                format!("failed to write {}", path.display())
            })?;
        }
        if !quiet {
            write_report(outfile, pass)?;
        }
        write_fcs_file(&fcfile, &pass.fcs)?;
        log::debug!("wrote pass {} to {}", i + 1, fcfile.display());
    }

    if let Some(json) = &args.json {
        let f = File::create(json)
            .with_context(|| format!("failed to create {json}"))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, &passes)?;
        w.flush()?;
    }

    if !quiet {
        if let Some(last) = passes.last() {
            println!("bias: {}", last.bias);
            println!("Sum of squared residuals: {:12.6e}", last.residuals.sum);
            println!("stationary point is a {}", last.characterization.kind);
        }
    }

    Ok(())
}
