//! Daisyworld: a planetary feedback simulation on a square grid.
//!
//! Each patch of the planet couples a temperature to at most one daisy.
//! Black daisies absorb sunlight and warm their patch, white ones reflect
//! it and cool theirs, and both only spread where the local temperature
//! suits them, so the biota regulates the climate it depends on. Heat
//! diffuses between neighboring patches, optional feedbacks wear out the
//! soil or stretch daisy lifespans, and a forcing schedule can drive the
//! sun itself up and down.
//!
//! The crate is deterministic by construction: one seeded generator feeds
//! every draw, so a configuration and a seed fully determine a run.
//!
//! ```
//! use daisy_core::{SimulationConfig, World};
//!
//! let mut world = World::new(SimulationConfig::default(), 42).unwrap();
//! world.step();
//! let latest = world.history().latest().unwrap();
//! assert_eq!(latest.population, latest.black + latest.white);
//! ```

pub mod config;
pub mod forcing;
pub mod grid;
pub mod patch;
pub mod recorder;
pub mod render;
pub mod world;

pub use config::{ConfigError, SimulationConfig};
pub use forcing::ForcingMode;
pub use grid::Grid;
pub use patch::{seeding_threshold, Daisy, DaisyColor, Patch, BASE_LIFETIME};
pub use recorder::{RunHistory, TickSnapshot, CSV_HEADER};
pub use world::World;
