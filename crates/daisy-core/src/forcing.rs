//! Luminosity forcing schedules.
//!
//! Forcing is the external driver of the simulation: once per tick, after
//! the grid has finished updating, the active mode nudges the global solar
//! luminosity. Patches never see the schedule, only the resulting value.

use serde::{Deserialize, Serialize};

/// A named schedule by which solar luminosity changes over ticks,
/// independent of anything happening on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForcingMode {
    /// Luminosity stays wherever the configuration put it.
    #[default]
    None,
    /// One slow brightening followed, after a quiet stretch, by a slower
    /// dimming back down.
    RampUpRampDown,
    /// A sawtooth: a jump up every 100th tick, decay on the other 99.
    Cycle,
}

impl ForcingMode {
    /// Luminosity for the next tick, given the tick that just completed.
    pub fn adjust(self, tick: u64, luminosity: f64) -> f64 {
        match self {
            ForcingMode::None => luminosity,
            ForcingMode::RampUpRampDown => {
                if tick > 200 && tick < 400 {
                    luminosity + 0.005
                } else if tick > 600 && tick < 850 {
                    luminosity - 0.0025
                } else {
                    luminosity
                }
            }
            ForcingMode::Cycle => {
                if tick % 100 == 0 {
                    luminosity + 0.005
                } else {
                    luminosity - 0.0025
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn none_leaves_luminosity_alone() {
        for tick in [0, 1, 100, 250, 700, 10_000] {
            assert_eq!(ForcingMode::None.adjust(tick, 0.8), 0.8);
        }
    }

    #[test]
    fn ramp_brightens_strictly_between_200_and_400() {
        let mode = ForcingMode::RampUpRampDown;
        assert_eq!(mode.adjust(200, 1.0), 1.0, "boundary tick is quiet");
        assert_relative_eq!(mode.adjust(201, 1.0), 1.005);
        assert_relative_eq!(mode.adjust(399, 1.0), 1.005);
        assert_eq!(mode.adjust(400, 1.0), 1.0, "boundary tick is quiet");
    }

    #[test]
    fn ramp_dims_strictly_between_600_and_850() {
        let mode = ForcingMode::RampUpRampDown;
        assert_eq!(mode.adjust(600, 1.0), 1.0);
        assert_relative_eq!(mode.adjust(601, 1.0), 0.9975);
        assert_relative_eq!(mode.adjust(849, 1.0), 0.9975);
        assert_eq!(mode.adjust(850, 1.0), 1.0);
    }

    #[test]
    fn ramp_is_quiet_outside_both_windows() {
        let mode = ForcingMode::RampUpRampDown;
        for tick in [0, 1, 150, 450, 500, 599, 900] {
            assert_eq!(mode.adjust(tick, 1.0), 1.0, "tick {tick}");
        }
    }

    #[test]
    fn cycle_jumps_on_century_ticks_and_decays_otherwise() {
        let mode = ForcingMode::Cycle;
        assert_relative_eq!(mode.adjust(100, 1.0), 1.005);
        assert_relative_eq!(mode.adjust(200, 1.0), 1.005);
        for tick in [1, 2, 50, 99, 101, 199] {
            assert_relative_eq!(mode.adjust(tick, 1.0), 0.9975);
        }
    }

    #[test]
    fn modes_deserialize_from_kebab_case_names() {
        let mode: ForcingMode = serde_json::from_str(r#""ramp-up-ramp-down""#).unwrap();
        assert_eq!(mode, ForcingMode::RampUpRampDown);
        let mode: ForcingMode = serde_json::from_str(r#""cycle""#).unwrap();
        assert_eq!(mode, ForcingMode::Cycle);
        let mode: ForcingMode = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(mode, ForcingMode::None);
    }
}
