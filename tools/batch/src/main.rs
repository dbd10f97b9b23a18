//! Launches a batch of independent daisy runs as separate processes, one
//! CSV per run. Runs share the parameter file but not the seed, so the
//! batch samples the spread of outcomes a single configuration allows.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "batch", about = "Run a batch of independent Daisyworld simulations")]
struct Args {
    /// Parameter file passed to every run.
    config: PathBuf,

    /// Number of runs to launch.
    #[arg(long, default_value_t = 20)]
    runs: u32,

    /// Directory the per-run CSV files land in.
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// Seed of the first run; run `i` uses `seed + i`.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// daisy executable to launch.
    #[arg(long, default_value = "daisy")]
    daisy_bin: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create {}", args.out_dir.display()))?;

    for run in 0..args.runs {
        let output = args.out_dir.join(format!("result{run}.csv"));
        let status = Command::new(&args.daisy_bin)
            .arg(&args.config)
            .arg("--seed")
            .arg((args.seed + u64::from(run)).to_string())
            .arg("--output")
            .arg(&output)
            .status()
            .with_context(|| format!("cannot launch {}", args.daisy_bin.display()))?;
        if !status.success() {
            bail!("run {run} failed with {status}");
        }
        println!("run {run} -> {}", output.display());
    }
    println!("{} runs complete in {}", args.runs, args.out_dir.display());
    Ok(())
}
