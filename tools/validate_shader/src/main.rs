#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use d3d9sv::{validate, BuiltinValidator, DiagnosticSink, DriverOptions, TokenStream};

#[derive(Debug, Parser)]
#[command(
    about = "Validate compiled D3D9 SM2/SM3 shader bytecode (.cso) with the built-in shader validator."
)]
struct Args {
    /// Shader bytecode files expected to validate cleanly.
    shaders: Vec<PathBuf>,

    /// Shader bytecode files expected to be rejected (e.g. deliberately
    /// corrupted blobs used to confirm the validator catches them).
    #[arg(long, value_name = "FILE")]
    must_reject: Vec<PathBuf>,

    /// Fail a run immediately when the version-token submission is rejected
    /// instead of deferring to the validator's end-of-run verdict.
    #[arg(long)]
    check_version_submission: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Valid,
    Rejected,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if args.shaders.is_empty() && args.must_reject.is_empty() {
        bail!("no shader files given");
    }

    let options = DriverOptions {
        check_version_submission: args.check_version_submission,
    };

    let mut mismatches = 0usize;
    for path in &args.shaders {
        if !run_one(path, options, Expect::Valid)? {
            mismatches += 1;
        }
    }
    for path in &args.must_reject {
        if !run_one(path, options, Expect::Rejected)? {
            mismatches += 1;
        }
    }

    if mismatches != 0 {
        bail!("{mismatches} shader(s) did not match their expected validation outcome");
    }
    Ok(())
}

/// Validate one shader file; returns whether the outcome matched `expect`.
fn run_one(path: &Path, options: DriverOptions, expect: Expect) -> Result<bool> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;

    let stream = match TokenStream::from_bytes(&bytes) {
        Ok(stream) => stream,
        Err(err) => {
            // Acquisition failure: no validator is created for this run.
            println!("{}: {err}", path.display());
            return Ok(expect == Expect::Rejected);
        }
    };

    let sink: DiagnosticSink = Box::new(|diag| println!("{}", diag.render()));
    let result = validate(BuiltinValidator::new(), &stream, sink, options);

    let rejected = match result {
        Ok(()) => {
            println!("{}: shader validation completed without errors", path.display());
            false
        }
        Err(err) => {
            println!("{}: {err}", path.display());
            true
        }
    };

    let matched = match expect {
        Expect::Valid => !rejected,
        Expect::Rejected => rejected,
    };
    if !matched {
        println!(
            "{}: expected the shader to be {}",
            path.display(),
            match expect {
                Expect::Valid => "accepted",
                Expect::Rejected => "rejected",
            }
        );
    }
    Ok(matched)
}
