//! A patch is one cell of the grid. It owns the local rules: temperature
//! response to sunlight, soil wear and recovery, daisy aging, death, and
//! the seeding roll.
//!
//! A patch never touches the grid. Seeding therefore splits in two: the
//! patch decides *whether* a seed goes out this tick and reports the color,
//! and the world, which can see the neighbors, decides *where* it lands.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;

/// Ticks a daisy lives before dying of old age, absent lifetime feedback.
pub const BASE_LIFETIME: i32 = 25;

/// The two competing daisy species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaisyColor {
    Black,
    White,
}

/// A daisy occupying a patch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Daisy {
    pub color: DaisyColor,
    /// Ticks since this daisy sprouted.
    pub age: i32,
    /// Age at which the daisy dies. Starts at [`BASE_LIFETIME`] and moves
    /// only under the flexible-lifetime feedback.
    pub lifetime: i32,
    /// Consecutive habitable ticks counted toward the next lifetime bonus.
    pub lifetime_bonus: u8,
}

impl Daisy {
    fn new(color: DaisyColor, age: i32) -> Self {
        Self {
            color,
            age,
            lifetime: BASE_LIFETIME,
            lifetime_bonus: 0,
        }
    }
}

/// One grid cell: bare ground or a single daisy, plus the local climate
/// state. Fields stay private so a dead daisy can never linger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    daisy: Option<Daisy>,
    temperature: f64,
    /// Soil fertility in (0, 1]. Inert at 1.0 unless the soil-quality
    /// feedback is enabled.
    soil_quality: f64,
}

impl Patch {
    /// A bare patch at the given starting temperature.
    pub fn new(initial_temperature: f64) -> Self {
        Self {
            daisy: None,
            temperature: initial_temperature,
            soil_quality: 1.0,
        }
    }

    pub fn daisy(&self) -> Option<&Daisy> {
        self.daisy.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.daisy.is_none()
    }

    pub fn color(&self) -> Option<DaisyColor> {
        self.daisy.map(|daisy| daisy.color)
    }

    /// Age of the current occupant; 0 for bare ground.
    pub fn age(&self) -> i32 {
        self.daisy.map_or(0, |daisy| daisy.age)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub(crate) fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    pub fn soil_quality(&self) -> f64 {
        self.soil_quality
    }

    /// Plant a daisy with the given starting age. Any previous occupant is
    /// replaced and the lifetime returns to the base constant.
    pub fn grow(&mut self, color: DaisyColor, age: i32) {
        self.daisy = Some(Daisy::new(color, age));
    }

    /// Recompute this patch's temperature from the energy it absorbs.
    ///
    /// Absorbed luminosity is `(1 - albedo) * luminosity`, with the albedo
    /// taken from the occupant's color or from bare ground. The new
    /// temperature is the mean of the old value and the local heating, a
    /// low-pass filter toward radiative equilibrium.
    pub fn calculate_temperature(&mut self, config: &SimulationConfig, luminosity: f64) {
        let albedo = match self.daisy {
            None => config.surface_albedo,
            Some(daisy) => match daisy.color {
                DaisyColor::White => config.white_albedo,
                DaisyColor::Black => config.black_albedo,
            },
        };
        let absorbed = (1.0 - albedo) * luminosity;
        // ln is only defined for positive input; a fully reflective patch
        // or a dark sun gets the fixed baseline heating instead.
        let local_heating = if absorbed > 0.0 {
            72.0 * absorbed.ln() + 80.0
        } else {
            80.0
        };
        self.temperature = (self.temperature + local_heating) / 2.0;
    }

    /// Advance this patch by one tick of biology.
    ///
    /// Runs the enabled feedbacks, ages the occupant, kills it at the end
    /// of its lifetime, and otherwise makes its seeding roll. `Some(color)`
    /// means a seed of that color goes out this tick; the caller picks the
    /// destination.
    pub fn age_one_tick(
        &mut self,
        config: &SimulationConfig,
        rng: &mut StdRng,
    ) -> Option<DaisyColor> {
        if config.soil_quality_mode {
            self.update_soil_quality();
        }
        if config.flexible_lifetime {
            self.update_lifetime();
        }
        let Some(daisy) = self.daisy.as_mut() else {
            return None;
        };
        daisy.age += 1;
        if daisy.age >= daisy.lifetime {
            self.daisy = None;
            return None;
        }
        self.seed_roll(config, rng)
    }

    /// Soil recovers on bare ground and wears out under a daisy, 0.01 per
    /// tick, pinned inside (0, 1].
    fn update_soil_quality(&mut self) {
        if self.is_empty() {
            if self.soil_quality < 1.0 {
                self.soil_quality += 0.01;
            }
        } else if self.soil_quality > 0.01 {
            self.soil_quality -= 0.01;
        }
    }

    /// Lifetime drifts with habitability: three consecutive ticks strictly
    /// inside the 18..25 degree band buy one extra tick of lifetime, and
    /// any tick outside it costs one and resets the streak.
    fn update_lifetime(&mut self) {
        let temperature = self.temperature;
        let Some(daisy) = self.daisy.as_mut() else {
            return;
        };
        if 18.0 < temperature && temperature < 25.0 {
            daisy.lifetime_bonus += 1;
            if daisy.lifetime_bonus == 3 {
                daisy.lifetime += 1;
                daisy.lifetime_bonus = 0;
            }
        } else {
            daisy.lifetime -= 1;
            daisy.lifetime_bonus = 0;
        }
    }

    /// Decide whether the occupant spreads a seed this tick: one uniform
    /// draw against the temperature threshold. Degraded soil inflates the
    /// draw, making success rarer.
    fn seed_roll(&self, config: &SimulationConfig, rng: &mut StdRng) -> Option<DaisyColor> {
        let color = self.daisy?.color;
        let mut roll: f64 = rng.gen();
        if config.soil_quality_mode {
            roll /= self.soil_quality;
        }
        (roll < seeding_threshold(self.temperature)).then_some(color)
    }
}

/// Seeding probability threshold at temperature `t`.
///
/// A downward parabola, positive between roughly 5 and 40 degrees and
/// peaking just above 1 near 22.8, so comfortable patches seed nearly
/// every tick and extreme ones never do.
pub fn seeding_threshold(t: f64) -> f64 {
    0.1457 * t - 0.0032 * t * t - 0.6443
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn threshold_tops_one_at_comfortable_temperature() {
        assert_relative_eq!(seeding_threshold(22.0), 1.0123, epsilon = 1e-12);
    }

    #[test]
    fn threshold_is_negative_in_the_cold() {
        assert_relative_eq!(seeding_threshold(0.0), -0.6443, epsilon = 1e-12);
        assert!(seeding_threshold(-40.0) < 0.0);
        assert!(seeding_threshold(60.0) < 0.0, "too hot to seed");
    }

    #[test]
    fn fully_reflective_patch_heats_to_the_baseline() {
        let config = SimulationConfig {
            surface_albedo: 1.0,
            ..SimulationConfig::default()
        };
        let mut patch = Patch::new(10.0);
        patch.calculate_temperature(&config, 1.0);
        assert_relative_eq!(patch.temperature(), (10.0 + 80.0) / 2.0);
    }

    #[test]
    fn dark_sun_heats_to_the_baseline() {
        let config = SimulationConfig::default();
        let mut patch = Patch::new(0.0);
        patch.calculate_temperature(&config, 0.0);
        assert_relative_eq!(patch.temperature(), 40.0);
    }

    #[test]
    fn heating_stays_finite_across_parameter_sweep() {
        let mut config = SimulationConfig::default();
        for albedo in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for luminosity in [0.0, 0.001, 0.5, 1.0, 2.0] {
                config.surface_albedo = albedo;
                let mut patch = Patch::new(0.0);
                patch.calculate_temperature(&config, luminosity);
                assert!(
                    patch.temperature().is_finite(),
                    "albedo {albedo} luminosity {luminosity}"
                );
            }
        }
    }

    #[test]
    fn occupied_patch_uses_its_color_albedo() {
        let config = SimulationConfig {
            white_albedo: 0.75,
            black_albedo: 0.25,
            ..SimulationConfig::default()
        };
        let mut black = Patch::new(0.0);
        black.grow(DaisyColor::Black, 0);
        black.calculate_temperature(&config, 1.0);

        let mut white = Patch::new(0.0);
        white.grow(DaisyColor::White, 0);
        white.calculate_temperature(&config, 1.0);

        assert!(
            black.temperature() > white.temperature(),
            "the darker patch absorbs more: {} vs {}",
            black.temperature(),
            white.temperature()
        );
        assert_relative_eq!(black.temperature(), (72.0 * 0.75f64.ln() + 80.0) / 2.0);
        assert_relative_eq!(white.temperature(), (72.0 * 0.25f64.ln() + 80.0) / 2.0);
    }

    #[test]
    fn comfortable_daisy_always_seeds() {
        let config = SimulationConfig::default();
        let mut rng = rng();
        // Threshold above 1 beats every possible draw from [0, 1).
        for _ in 0..200 {
            let mut patch = Patch::new(22.0);
            patch.grow(DaisyColor::White, 3);
            let seed = patch.age_one_tick(&config, &mut rng);
            assert_eq!(seed, Some(DaisyColor::White));
        }
    }

    #[test]
    fn freezing_daisy_never_seeds() {
        let config = SimulationConfig::default();
        let mut rng = rng();
        for _ in 0..200 {
            let mut patch = Patch::new(0.0);
            patch.grow(DaisyColor::Black, 3);
            assert_eq!(patch.age_one_tick(&config, &mut rng), None);
        }
    }

    #[test]
    fn bare_patch_ages_to_nothing() {
        let config = SimulationConfig::default();
        let mut rng = rng();
        let mut patch = Patch::new(22.0);
        assert_eq!(patch.age_one_tick(&config, &mut rng), None);
        assert!(patch.is_empty());
        assert_eq!(patch.age(), 0);
    }

    #[test]
    fn daisy_dies_at_the_end_of_its_lifetime() {
        let config = SimulationConfig::default();
        let mut rng = rng();
        let mut patch = Patch::new(22.0);
        patch.grow(DaisyColor::Black, BASE_LIFETIME - 1);
        assert_eq!(patch.age_one_tick(&config, &mut rng), None, "death trumps seeding");
        assert!(patch.is_empty());
    }

    #[test]
    fn replanting_resets_the_lifetime() {
        let config = SimulationConfig {
            flexible_lifetime: true,
            ..SimulationConfig::default()
        };
        let mut rng = rng();
        let mut patch = Patch::new(0.0);
        patch.grow(DaisyColor::White, 0);
        // A cold tick shortens this daisy's lifetime.
        patch.age_one_tick(&config, &mut rng);
        assert_eq!(patch.daisy().unwrap().lifetime, BASE_LIFETIME - 1);

        patch.grow(DaisyColor::Black, 0);
        assert_eq!(patch.daisy().unwrap().lifetime, BASE_LIFETIME);
        assert_eq!(patch.daisy().unwrap().lifetime_bonus, 0);
    }

    #[test]
    fn soil_wears_under_a_daisy_and_recovers_when_bare() {
        let config = SimulationConfig {
            soil_quality_mode: true,
            ..SimulationConfig::default()
        };
        let mut rng = rng();
        let mut patch = Patch::new(0.0);
        patch.grow(DaisyColor::Black, 0);
        patch.age_one_tick(&config, &mut rng);
        assert_relative_eq!(patch.soil_quality(), 0.99, epsilon = 1e-12);
        patch.age_one_tick(&config, &mut rng);
        assert_relative_eq!(patch.soil_quality(), 0.98, epsilon = 1e-12);

        patch.daisy = None;
        patch.age_one_tick(&config, &mut rng);
        assert_relative_eq!(patch.soil_quality(), 0.99, epsilon = 1e-12);
    }

    #[test]
    fn soil_never_leaves_its_bounds() {
        let config = SimulationConfig {
            soil_quality_mode: true,
            ..SimulationConfig::default()
        };
        let mut rng = rng();

        let mut bare = Patch::new(0.0);
        bare.age_one_tick(&config, &mut rng);
        assert_relative_eq!(bare.soil_quality(), 1.0, epsilon = 1e-12);

        let mut worn = Patch::new(0.0);
        worn.soil_quality = 0.01;
        worn.grow(DaisyColor::White, 0);
        worn.age_one_tick(&config, &mut rng);
        assert_relative_eq!(worn.soil_quality(), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn degraded_soil_suppresses_seeding() {
        let config = SimulationConfig {
            soil_quality_mode: true,
            ..SimulationConfig::default()
        };
        let mut rng = rng();
        // Threshold at 22 degrees is ~1.01; with soil at 0.5 the draw is
        // doubled, so roughly half the rolls should now fail.
        let mut failures = 0;
        for _ in 0..400 {
            let mut patch = Patch::new(22.0);
            patch.soil_quality = 0.5;
            patch.grow(DaisyColor::White, 3);
            if patch.age_one_tick(&config, &mut rng).is_none() {
                failures += 1;
            }
        }
        assert!(
            (120..280).contains(&failures),
            "expected roughly half the rolls to fail, got {failures}/400"
        );
    }

    #[test]
    fn three_habitable_ticks_extend_the_lifetime() {
        let config = SimulationConfig {
            flexible_lifetime: true,
            ..SimulationConfig::default()
        };
        let mut rng = rng();
        let mut patch = Patch::new(22.0);
        patch.grow(DaisyColor::Black, 0);

        patch.age_one_tick(&config, &mut rng);
        patch.age_one_tick(&config, &mut rng);
        assert_eq!(patch.daisy().unwrap().lifetime, BASE_LIFETIME);
        assert_eq!(patch.daisy().unwrap().lifetime_bonus, 2);

        patch.age_one_tick(&config, &mut rng);
        assert_eq!(patch.daisy().unwrap().lifetime, BASE_LIFETIME + 1);
        assert_eq!(patch.daisy().unwrap().lifetime_bonus, 0, "streak restarts");
    }

    #[test]
    fn inhospitable_tick_shortens_lifetime_and_resets_the_streak() {
        let config = SimulationConfig {
            flexible_lifetime: true,
            ..SimulationConfig::default()
        };
        let mut rng = rng();
        let mut patch = Patch::new(22.0);
        patch.grow(DaisyColor::White, 0);
        patch.age_one_tick(&config, &mut rng);
        patch.age_one_tick(&config, &mut rng);
        assert_eq!(patch.daisy().unwrap().lifetime_bonus, 2);

        patch.set_temperature(30.0);
        patch.age_one_tick(&config, &mut rng);
        assert_eq!(patch.daisy().unwrap().lifetime, BASE_LIFETIME - 1);
        assert_eq!(patch.daisy().unwrap().lifetime_bonus, 0);
    }

    #[test]
    fn band_edges_count_as_inhospitable() {
        let config = SimulationConfig {
            flexible_lifetime: true,
            ..SimulationConfig::default()
        };
        let mut rng = rng();
        for edge in [18.0, 25.0] {
            let mut patch = Patch::new(edge);
            patch.grow(DaisyColor::Black, 0);
            patch.age_one_tick(&config, &mut rng);
            assert_eq!(
                patch.daisy().unwrap().lifetime,
                BASE_LIFETIME - 1,
                "temperature {edge} sits outside the open band"
            );
        }
    }

    #[test]
    fn shortened_lifetime_can_kill_early() {
        let config = SimulationConfig {
            flexible_lifetime: true,
            ..SimulationConfig::default()
        };
        let mut rng = rng();
        let mut patch = Patch::new(0.0);
        patch.grow(DaisyColor::White, 20);
        // Each cold tick raises age and lowers lifetime; they meet well
        // before the base lifetime.
        for _ in 0..2 {
            patch.age_one_tick(&config, &mut rng);
        }
        assert_eq!(patch.daisy().unwrap().age, 22);
        assert_eq!(patch.daisy().unwrap().lifetime, 23);
        patch.age_one_tick(&config, &mut rng);
        assert!(patch.is_empty(), "age 23 met lifetime 22");
    }
}
