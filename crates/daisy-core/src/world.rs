//! The world: a square grid of patches, the per-tick stepping protocol,
//! and the history it accumulates.
//!
//! Stepping is synchronous and single-threaded. Each tick runs a heating
//! pass over every patch, then one row-major diffusion-and-lifecycle pass,
//! then aggregation, forcing, and recording. The lifecycle pass mutates
//! the grid as it walks it, so a daisy seeded early in the pass is already
//! visible to patches visited later in the same tick; the fixed visit
//! order is what keeps that behavior reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

use crate::config::{ConfigError, SimulationConfig};
use crate::grid::Grid;
use crate::patch::{DaisyColor, Patch, BASE_LIFETIME};
use crate::recorder::{RunHistory, TickSnapshot};

/// A complete Daisyworld: parameters, patches, randomness, and history.
pub struct World {
    config: SimulationConfig,
    grid: Grid,
    rng: StdRng,
    /// Current global solar luminosity; forcing moves it between ticks.
    luminosity: f64,
    /// Ticks completed so far.
    tick: u64,
    history: RunHistory,
}

impl World {
    /// Validate the configuration and build the initial world.
    ///
    /// Starting populations are `floor(area * fraction)` per color. The
    /// white index set is drawn first by rejection sampling over the whole
    /// grid, then the black set the same way but skipping white cells, so
    /// the two never overlap. Each starting daisy gets a uniform age below
    /// the base lifetime. Every patch then computes its first temperature
    /// and the initial aggregates land in the history as row 0.
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let area = config.area();
        let white_target = (area as f64 * config.white_start) as usize;
        let black_target = (area as f64 * config.black_start) as usize;

        let mut white_cells: HashSet<usize> = HashSet::with_capacity(white_target);
        while white_cells.len() < white_target {
            white_cells.insert(rng.gen_range(0..area));
        }
        let mut black_cells: HashSet<usize> = HashSet::with_capacity(black_target);
        while black_cells.len() < black_target {
            let candidate = rng.gen_range(0..area);
            if !white_cells.contains(&candidate) {
                black_cells.insert(candidate);
            }
        }

        let mut grid = Grid::new(config.side_length, config.init_temperature);
        for x in 0..config.side_length {
            for y in 0..config.side_length {
                let index = grid.index_of(x, y);
                let color = if white_cells.contains(&index) {
                    Some(DaisyColor::White)
                } else if black_cells.contains(&index) {
                    Some(DaisyColor::Black)
                } else {
                    None
                };
                if let Some(color) = color {
                    let age = rng.gen_range(0..BASE_LIFETIME);
                    grid.get_mut(x, y).grow(color, age);
                }
                grid.get_mut(x, y)
                    .calculate_temperature(&config, config.solar_luminosity);
            }
        }

        let mut world = Self {
            luminosity: config.solar_luminosity,
            config,
            grid,
            rng,
            tick: 0,
            history: RunHistory::new(),
        };
        world.record();
        Ok(world)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn luminosity(&self) -> f64 {
        self.luminosity
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Run the number of ticks the configuration asks for.
    pub fn run(&mut self) {
        for _ in 0..self.config.ticks {
            self.step();
        }
    }

    /// Advance the world by one tick.
    pub fn step(&mut self) {
        self.tick += 1;

        self.heating_pass();
        self.diffusion_and_lifecycle_pass();

        self.luminosity = self.config.mode.adjust(self.tick, self.luminosity);
        let row = self.record();

        debug!(
            tick = self.tick,
            luminosity = row.luminosity,
            temperature = row.temperature,
            population = row.population,
            black = row.black,
            white = row.white,
            "tick complete"
        );
    }

    /// Every patch recomputes its intrinsic heating from last tick's
    /// diffused temperature.
    fn heating_pass(&mut self) {
        let luminosity = self.luminosity;
        for patch in self.grid.patches_mut() {
            patch.calculate_temperature(&self.config, luminosity);
        }
    }

    /// One row-major pass that blends temperatures from the heating-pass
    /// snapshot and ages each patch in place.
    ///
    /// Diffusion keeps half of a patch's own heat and takes a 1/16 share
    /// from each neighbor, all read from the snapshot; edge patches simply
    /// lose the shares their missing neighbors would have sent.
    fn diffusion_and_lifecycle_pass(&mut self) {
        let snapshot: Vec<f64> = self.grid.patches().iter().map(Patch::temperature).collect();
        for index in 0..self.grid.area() {
            let mut blended = snapshot[index] * 0.5;
            for neighbor in self.grid.neighbor_indices(index) {
                blended += snapshot[neighbor] / 16.0;
            }
            self.grid.patch_mut(index).set_temperature(blended);
            self.age_patch(index);
        }
    }

    /// Age one patch; a successful seeding roll plants a same-color daisy
    /// of age 0 on a uniformly drawn empty neighbor, if any exists.
    fn age_patch(&mut self, index: usize) {
        let Some(color) = self
            .grid
            .patch_mut(index)
            .age_one_tick(&self.config, &mut self.rng)
        else {
            return;
        };
        let open: Vec<usize> = self
            .grid
            .neighbor_indices(index)
            .into_iter()
            .filter(|&neighbor| self.grid.patch(neighbor).is_empty())
            .collect();
        // The seed is lost when every neighbor is taken; no draw is made.
        if open.is_empty() {
            return;
        }
        let target = open[self.rng.gen_range(0..open.len())];
        self.grid.patch_mut(target).grow(color, 0);
    }

    /// Sum the grid into a snapshot and append it to the history.
    fn record(&mut self) -> TickSnapshot {
        let mut temperature_total = 0.0;
        let mut black = 0;
        let mut white = 0;
        for patch in self.grid.patches() {
            temperature_total += patch.temperature();
            match patch.color() {
                Some(DaisyColor::Black) => black += 1,
                Some(DaisyColor::White) => white += 1,
                None => {}
            }
        }
        let row = TickSnapshot {
            luminosity: self.luminosity,
            temperature: temperature_total / self.grid.area() as f64,
            population: black + white,
            black,
            white,
        };
        self.history.push(row);
        row
    }
}
