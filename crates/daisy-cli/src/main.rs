//! Daisyworld runner: load a parameter file, step the world to the end,
//! export the per-tick series as CSV, optionally chart them as a PNG or
//! print the final grid.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use daisy_core::{render, SimulationConfig, World};

mod plot;

#[derive(Parser, Debug)]
#[command(name = "daisy", about = "Daisyworld planetary feedback simulation", version)]
struct Args {
    /// JSON parameter file describing the run.
    config: PathBuf,

    /// RNG seed; identical seeds reproduce identical runs.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// CSV file the result series are written to.
    #[arg(short, long, default_value = "result.csv")]
    output: PathBuf,

    /// Also chart the result series into this PNG.
    #[arg(long, value_name = "PNG")]
    plot: Option<PathBuf>,

    /// Print the final grid as text.
    #[arg(long)]
    print_grid: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = SimulationConfig::load(&args.config)
        .with_context(|| format!("invalid parameter file {}", args.config.display()))?;

    let mut world = World::new(config, args.seed)?;
    world.run();

    let file = File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    world
        .history()
        .write_csv(&mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    let end = world
        .history()
        .latest()
        .context("a finished run always has at least one row")?;
    println!(
        "{} ticks done: population {} (black {}, white {}), mean temperature {:.2}, luminosity {:.4}",
        world.tick(),
        end.population,
        end.black,
        end.white,
        end.temperature,
        end.luminosity,
    );
    println!("series written to {}", args.output.display());

    if args.print_grid {
        print!("{}", render::render_grid(world.grid()));
    }

    if let Some(path) = &args.plot {
        // A failed chart must not discard a finished run.
        match plot::render_series(world.history(), path) {
            Ok(()) => println!("chart written to {}", path.display()),
            Err(err) => tracing::warn!("chart skipped: {err:#}"),
        }
    }

    Ok(())
}
