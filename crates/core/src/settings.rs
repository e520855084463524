//! Line-oriented settings file.
//!
//! Each line is `key value`, split on whitespace, with a case-insensitive
//! key. Lines starting with `#` and lines of at most one character are
//! skipped. Problems never abort loading: the offending line is reported as
//! a [`SettingsWarning`] and the previous value is kept.

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{FillPercent, GenerationConfig, SeedSource};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world_width: usize,
    pub world_height: usize,
    /// Corridor radius used for passages between world rooms.
    pub room_connection_width: u32,
    /// Width of the far-corner band the end goal room is drawn from.
    pub end_goal_threshold: usize,
    pub room: GenerationConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: 5,
            world_height: 5,
            room_connection_width: 1,
            end_goal_threshold: 0,
            room: GenerationConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettingsWarning {
    /// 1-based line number; 0 for whole-file problems.
    pub line: usize,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub warnings: Vec<SettingsWarning>,
}

impl Settings {
    pub fn load(path: &Path) -> io::Result<LoadedSettings> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> LoadedSettings {
        let mut parser = Parser::default();
        let mut applied = 0;
        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.len() <= 1 || line.starts_with('#') {
                continue;
            }
            parser.line = index + 1;
            if parser.apply(line) {
                applied += 1;
            }
        }
        if applied == 0 {
            parser.warn_at(0, "settings file contains zero settings".to_string());
        }
        parser.finish()
    }

    /// Room count along each world axis.
    pub fn world_dimensions(&self) -> (usize, usize) {
        (self.world_width, self.world_height)
    }
}

#[derive(Default)]
struct Parser {
    settings: Settings,
    warnings: Vec<SettingsWarning>,
    line: usize,
    requested_fill: Option<u8>,
    use_random_fill: Option<bool>,
    end_goal_threshold: Option<i64>,
}

impl Parser {
    fn warn_at(&mut self, line: usize, message: String) {
        log::warn!("settings line {line}: {message}");
        self.warnings.push(SettingsWarning { line, message });
    }

    fn warn(&mut self, message: String) {
        self.warn_at(self.line, message);
    }

    fn value<T: FromStr>(&mut self, key: &str, raw: &str) -> Option<T> {
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.warn(format!("invalid value {raw:?} for {key}"));
                None
            }
        }
    }

    fn at_least<T: FromStr + PartialOrd + Copy + Display>(
        &mut self,
        key: &str,
        raw: &str,
        min_value: T,
    ) -> Option<T> {
        let value = self.value::<T>(key, raw)?;
        if value < min_value {
            self.warn(format!("{key} must be at least {min_value}, got {value}"));
            return None;
        }
        Some(value)
    }

    fn finite(&mut self, key: &str, raw: &str) -> Option<f32> {
        let value = self.value::<f32>(key, raw)?;
        if !value.is_finite() {
            self.warn(format!("{key} must be a finite number, got {value}"));
            return None;
        }
        Some(value)
    }

    fn flag(&mut self, key: &str, raw: &str) -> Option<bool> {
        match raw.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                self.warn(format!("invalid boolean {raw:?} for {key}"));
                None
            }
        }
    }

    /// Returns true when the line named a known key.
    fn apply(&mut self, line: &str) -> bool {
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next().map(str::to_ascii_lowercase) else {
            return false;
        };
        let Some(raw) = tokens.next() else {
            self.warn(format!("missing value for {key}"));
            return false;
        };

        match key.as_str() {
            "worldwidth" => {
                if let Some(value) = self.at_least(&key, raw, 1) {
                    self.settings.world_width = value;
                }
            }
            "worldheight" => {
                if let Some(value) = self.at_least(&key, raw, 1) {
                    self.settings.world_height = value;
                }
            }
            "roomwidth" => {
                if let Some(value) = self.at_least(&key, raw, 3) {
                    self.settings.room.width = value;
                }
            }
            "roomheight" => {
                if let Some(value) = self.at_least(&key, raw, 3) {
                    self.settings.room.height = value;
                }
            }
            "hallwidth" => {
                if let Some(value) = self.value(&key, raw) {
                    self.settings.room.hall_radius = value;
                }
            }
            "roomconnectionwidth" => {
                if let Some(value) = self.value(&key, raw) {
                    self.settings.room_connection_width = value;
                }
            }
            "squaresize" => {
                if let Some(value) = self.value::<f32>(&key, raw) {
                    if value.is_finite() && value > 0.0 {
                        self.settings.room.tile_size = value;
                    } else {
                        self.warn(format!("squaresize must be positive, got {value}"));
                    }
                }
            }
            "bordersize" => {
                if let Some(value) = self.value(&key, raw) {
                    self.settings.room.border_size = value;
                }
            }
            "smoothtimes" => {
                if let Some(value) = self.value(&key, raw) {
                    self.settings.room.smooth_iterations = value;
                }
            }
            "wallthresholdsize" => {
                if let Some(value) = self.value(&key, raw) {
                    self.settings.room.wall_threshold = value;
                }
            }
            "roomthresholdsize" => {
                if let Some(value) = self.value(&key, raw) {
                    self.settings.room.room_threshold = value;
                }
            }
            "seed" => {
                if self.settings.room.seed != SeedSource::Clock {
                    self.settings.room.seed = SeedSource::Explicit(raw.to_string());
                }
            }
            "userandseed" => {
                if let Some(true) = self.flag(&key, raw) {
                    self.settings.room.seed = SeedSource::Clock;
                }
            }
            "randfillpercent" => {
                if let Some(value) = self.value::<u8>(&key, raw) {
                    self.requested_fill = Some(value);
                }
            }
            "userandfillpercent" => {
                if let Some(value) = self.flag(&key, raw) {
                    self.use_random_fill = Some(value);
                }
            }
            "minfillpercent" => {
                if let Some(value) = self.value::<u8>(&key, raw) {
                    self.settings.room.min_fill_percent = value;
                }
            }
            "maxfillpercent" => {
                if let Some(value) = self.value::<u8>(&key, raw) {
                    self.settings.room.max_fill_percent = value;
                }
            }
            "endgoalthreshold" => {
                if let Some(value) = self.value::<i64>(&key, raw) {
                    self.end_goal_threshold = Some(value);
                }
            }
            "wallheight" => {
                if let Some(value) = self.finite(&key, raw) {
                    self.settings.room.wall_height = value;
                }
            }
            "roomypos" => {
                if let Some(value) = self.finite(&key, raw) {
                    self.settings.room.elevation = value;
                }
            }
            _ => {
                self.warn(format!("{key} is not a valid setting"));
                return false;
            }
        }
        true
    }

    /// Cross-field fixups once every line has been read.
    fn finish(mut self) -> LoadedSettings {
        let room = &self.settings.room;
        if room.min_fill_percent > room.max_fill_percent || room.max_fill_percent > 100 {
            let message = format!(
                "fill band [{}, {}] is invalid, using defaults",
                room.min_fill_percent, room.max_fill_percent
            );
            self.warn_at(0, message);
            let defaults = GenerationConfig::default();
            self.settings.room.min_fill_percent = defaults.min_fill_percent;
            self.settings.room.max_fill_percent = defaults.max_fill_percent;
        }

        self.settings.room.fill = match (self.use_random_fill, self.requested_fill) {
            (Some(false), Some(requested)) => FillPercent::Explicit(requested),
            (None, Some(requested)) => FillPercent::Explicit(requested),
            (Some(false), None) => {
                self.warn_at(0, "userandfillpercent is false but no randfillpercent given".to_string());
                FillPercent::Random
            }
            (Some(true), _) | (None, None) => FillPercent::Random,
        };

        let max_radius = self.settings.room.max_hall_radius();
        if self.settings.room.hall_radius > max_radius {
            let message = format!("hallwidth {} clamped to {max_radius}", self.settings.room.hall_radius);
            self.warn_at(0, message);
            self.settings.room.hall_radius = max_radius;
        }
        if self.settings.room_connection_width > max_radius {
            let message =
                format!("roomconnectionwidth {} clamped to {max_radius}", self.settings.room_connection_width);
            self.warn_at(0, message);
            self.settings.room_connection_width = max_radius;
        }

        if let Some(requested) = self.end_goal_threshold {
            let limit = self.settings.world_width.min(self.settings.world_height) - 1;
            let clamped = requested.clamp(0, limit as i64) as usize;
            if clamped as i64 != requested {
                self.warn_at(0, format!("endgoalthreshold {requested} clamped to {clamped}"));
            }
            self.settings.end_goal_threshold = clamped;
        }

        LoadedSettings { settings: self.settings, warnings: self.warnings }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_known_keys_case_insensitively() {
        let loaded = Settings::parse(
            "# world\nWorldWidth 3\nworldheight 4\nRoomWidth 60\nroomheight 40\n\
             hallwidth 2\nsquaresize 1.5\nbordersize 2\nsmoothtimes 4\nseed cave\n\
             randfillpercent 48\nuserandfillpercent false\nroomypos 20\n",
        );
        assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
        let settings = loaded.settings;
        assert_eq!(settings.world_dimensions(), (3, 4));
        assert_eq!((settings.room.width, settings.room.height), (60, 40));
        assert_eq!(settings.room.hall_radius, 2);
        assert_eq!(settings.room.tile_size, 1.5);
        assert_eq!(settings.room.border_size, 2);
        assert_eq!(settings.room.smooth_iterations, 4);
        assert_eq!(settings.room.seed, SeedSource::Explicit("cave".to_string()));
        assert_eq!(settings.room.fill, FillPercent::Explicit(48));
        assert_eq!(settings.room.elevation, 20.0);
    }

    #[test]
    fn bad_lines_become_warnings_and_keep_defaults() {
        let loaded = Settings::parse("worldwidth many\nbogus 3\nroomwidth 1\nwallheight\nsmoothtimes 2\n");
        let lines: Vec<usize> = loaded.warnings.iter().map(|warning| warning.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
        assert_eq!(loaded.settings.world_width, 5);
        assert_eq!(loaded.settings.room.width, 100);
        assert_eq!(loaded.settings.room.smooth_iterations, 2);
    }

    #[test]
    fn non_finite_heights_are_rejected() {
        let loaded = Settings::parse("wallheight inf
roomypos NaN
smoothtimes 3
");
        let lines: Vec<usize> = loaded.warnings.iter().map(|warning| warning.line).collect();
        assert_eq!(lines, vec![1, 2]);
        assert_eq!(loaded.settings.room.wall_height, 10.0);
        assert_eq!(loaded.settings.room.elevation, 15.0);
        assert!(loaded.settings.room.validate().is_ok());
    }

    #[test]
    fn corridor_widths_are_clamped_to_the_room() {
        let loaded = Settings::parse(
            "hallwidth 50000
roomconnectionwidth 70000
roomwidth 40
roomheight 30
seed wide
",
        );
        assert_eq!(loaded.settings.room.hall_radius, 15);
        assert_eq!(loaded.settings.room_connection_width, 15);
        assert_eq!(loaded.warnings.len(), 2);
        assert!(loaded.warnings.iter().all(|warning| warning.line == 0));
        assert!(loaded.settings.room.validate().is_ok());
    }

    #[test]
    fn empty_file_warns_about_zero_settings() {
        let loaded = Settings::parse("# nothing here\n\n");
        assert_eq!(loaded.settings, Settings::default());
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].line, 0);
    }

    #[test]
    fn random_seed_flag_wins_over_explicit_seed() {
        let loaded = Settings::parse("userandseed True\nseed fixed\n");
        assert_eq!(loaded.settings.room.seed, SeedSource::Clock);
    }

    #[test]
    fn end_goal_threshold_is_clamped_to_the_world() {
        let loaded = Settings::parse("worldwidth 3\nworldheight 6\nendgoalthreshold 9\n");
        assert_eq!(loaded.settings.end_goal_threshold, 2);
        assert_eq!(loaded.warnings.len(), 1);

        let loaded = Settings::parse("endgoalthreshold -4\n");
        assert_eq!(loaded.settings.end_goal_threshold, 0);
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "worldwidth 2\nworldheight 2\nuserandfillpercent true").expect("write");
        let loaded = Settings::load(file.path()).expect("load");
        assert_eq!(loaded.settings.world_dimensions(), (2, 2));
        assert_eq!(loaded.settings.room.fill, FillPercent::Random);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(Settings::load(&dir.path().join("missing.txt")).is_err());
    }
}
