//! Append-only history of global aggregates, one row per tick.
//!
//! The world pushes a snapshot after construction and after every step, so
//! a run of `n` ticks leaves `n + 1` rows with the initial state at row 0.
//! Reporting, plotting, and CSV export all read from here and only here.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Column header of the exported CSV.
pub const CSV_HEADER: &str =
    "tick,solar-luminosity,global-temperature,population,black-number,white-number";

/// Global aggregates at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    /// Solar luminosity the next tick will run under.
    pub luminosity: f64,
    /// Mean patch temperature over the whole grid.
    pub temperature: f64,
    /// Living daisies of both colors.
    pub population: usize,
    pub black: usize,
    pub white: usize,
}

/// Per-tick history of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    rows: Vec<TickSnapshot>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, row: TickSnapshot) {
        self.rows.push(row);
    }

    /// All rows in tick order, row 0 being the initial state.
    pub fn rows(&self) -> &[TickSnapshot] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&TickSnapshot> {
        self.rows.last()
    }

    /// The named series consumers plot: luminosity, temperature, and the
    /// three population counts, each spanning the full run. Counts are
    /// widened to `f64` so every series shares one shape.
    pub fn series(&self) -> Vec<(&'static str, Vec<f64>)> {
        vec![
            (
                "luminosity",
                self.rows.iter().map(|row| row.luminosity).collect(),
            ),
            (
                "temperature",
                self.rows.iter().map(|row| row.temperature).collect(),
            ),
            (
                "population",
                self.rows.iter().map(|row| row.population as f64).collect(),
            ),
            (
                "black-num",
                self.rows.iter().map(|row| row.black as f64).collect(),
            ),
            (
                "white-num",
                self.rows.iter().map(|row| row.white as f64).collect(),
            ),
        ]
    }

    /// Write the whole run as CSV, header first, one row per tick.
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{CSV_HEADER}")?;
        for (tick, row) in self.rows.iter().enumerate() {
            writeln!(
                out,
                "{},{},{},{},{},{}",
                tick, row.luminosity, row.temperature, row.population, row.black, row.white
            )?;
        }
        Ok(())
    }
}
