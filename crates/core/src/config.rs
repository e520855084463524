//! Per-run generation parameters. A config is read once at the start of a
//! run and never mutated while the run is in progress.

use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::coords::{WorldMapping, WorldPoint};
use crate::error::GenerationError;
use crate::mapgen::seed::random_range;

pub const DEFAULT_MIN_FILL_PERCENT: u8 = 37;
pub const DEFAULT_MAX_FILL_PERCENT: u8 = 52;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedSource {
    Explicit(String),
    /// Wall-clock seed. Runs using it are not reproducible unless the
    /// resolved seed string is fed back in as `Explicit`.
    Clock,
}

impl SeedSource {
    pub fn resolve(&self) -> String {
        match self {
            Self::Explicit(seed) => seed.clone(),
            Self::Clock => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0_u128, |duration| duration.as_nanos())
                .to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillPercent {
    /// Requested percentage; clamped into the configured band before use.
    Explicit(u8),
    /// Drawn uniformly from the configured band using the run's seed.
    Random,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    pub tile_size: f32,
    pub border_size: usize,
    pub smooth_iterations: usize,
    pub wall_threshold: usize,
    pub room_threshold: usize,
    pub hall_radius: u32,
    pub fill: FillPercent,
    pub min_fill_percent: u8,
    pub max_fill_percent: u8,
    pub seed: SeedSource,
    pub wall_height: f32,
    pub elevation: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            tile_size: 1.0,
            border_size: 1,
            smooth_iterations: 5,
            wall_threshold: 50,
            room_threshold: 50,
            hall_radius: 1,
            fill: FillPercent::Random,
            min_fill_percent: DEFAULT_MIN_FILL_PERCENT,
            max_fill_percent: DEFAULT_MAX_FILL_PERCENT,
            seed: SeedSource::Explicit("Random".to_string()),
            wall_height: 10.0,
            elevation: 15.0,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width < 3 || self.height < 3 {
            return Err(GenerationError::InvalidConfig(format!(
                "grid must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(GenerationError::InvalidConfig(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        if !self.wall_height.is_finite() || !self.elevation.is_finite() {
            return Err(GenerationError::InvalidConfig(
                "wall height and elevation must be finite".to_string(),
            ));
        }
        if self.hall_radius > self.max_hall_radius() {
            return Err(GenerationError::InvalidConfig(format!(
                "hall radius {} exceeds {} for a {}x{} grid",
                self.hall_radius,
                self.max_hall_radius(),
                self.width,
                self.height
            )));
        }
        if self.min_fill_percent > self.max_fill_percent || self.max_fill_percent > 100 {
            return Err(GenerationError::InvalidConfig(format!(
                "fill band [{}, {}] is not a valid percentage range",
                self.min_fill_percent, self.max_fill_percent
            )));
        }
        Ok(())
    }

    /// Widest corridor radius a grid of this size accepts.
    pub fn max_hall_radius(&self) -> u32 {
        u32::try_from(self.width.min(self.height) / 2).unwrap_or(u32::MAX)
    }

    pub fn resolve_fill_percent(&self, rng: &mut ChaCha8Rng) -> u8 {
        match self.fill {
            FillPercent::Explicit(requested) => {
                let clamped =
                    clamp_fill_percent(requested, self.min_fill_percent, self.max_fill_percent);
                if clamped != requested {
                    log::warn!(
                        "fill percent {requested} outside [{}, {}], using {clamped}",
                        self.min_fill_percent,
                        self.max_fill_percent
                    );
                }
                clamped
            }
            FillPercent::Random => random_range(
                rng,
                usize::from(self.min_fill_percent),
                usize::from(self.max_fill_percent),
            ) as u8,
        }
    }

    /// Mapping for this room placed at `origin`.
    pub fn mapping(&self, origin: WorldPoint) -> WorldMapping {
        WorldMapping::new(origin, self.tile_size, self.width, self.height, self.border_size)
    }
}

pub fn clamp_fill_percent(requested: u8, min_fill_percent: u8, max_fill_percent: u8) -> u8 {
    requested.clamp(min_fill_percent, max_fill_percent)
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn explicit_fill_is_clamped_into_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut config = GenerationConfig { fill: FillPercent::Explicit(90), ..Default::default() };
        assert_eq!(config.resolve_fill_percent(&mut rng), DEFAULT_MAX_FILL_PERCENT);

        config.fill = FillPercent::Explicit(3);
        assert_eq!(config.resolve_fill_percent(&mut rng), DEFAULT_MIN_FILL_PERCENT);

        config.fill = FillPercent::Explicit(45);
        assert_eq!(config.resolve_fill_percent(&mut rng), 45);
    }

    #[test]
    fn random_fill_stays_inside_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = GenerationConfig::default();
        for _ in 0..200 {
            let fill = config.resolve_fill_percent(&mut rng);
            assert!((DEFAULT_MIN_FILL_PERCENT..=DEFAULT_MAX_FILL_PERCENT).contains(&fill));
        }
    }

    #[test]
    fn validate_rejects_degenerate_configs() {
        let tiny = GenerationConfig { width: 2, ..Default::default() };
        assert!(matches!(tiny.validate(), Err(GenerationError::InvalidConfig(_))));

        let flat = GenerationConfig { tile_size: 0.0, ..Default::default() };
        assert!(flat.validate().is_err());

        let inverted_band =
            GenerationConfig { min_fill_percent: 60, max_fill_percent: 40, ..Default::default() };
        assert!(inverted_band.validate().is_err());

        let wide_halls = GenerationConfig { width: 40, height: 30, hall_radius: 50_000, ..Default::default() };
        assert_eq!(wide_halls.max_hall_radius(), 15);
        assert!(matches!(wide_halls.validate(), Err(GenerationError::InvalidConfig(_))));
        assert!(GenerationConfig { hall_radius: 15, ..wide_halls }.validate().is_ok());

        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn config_json_roundtrip_keeps_every_field() {
        let config = GenerationConfig {
            width: 64,
            seed: SeedSource::Explicit("abc".to_string()),
            fill: FillPercent::Explicit(44),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let decoded: GenerationConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, decoded);
    }

    #[test]
    fn clock_seed_resolves_to_a_decimal_string() {
        let seed = SeedSource::Clock.resolve();
        assert!(!seed.is_empty());
        assert!(seed.chars().all(|c| c.is_ascii_digit()));
    }
}
