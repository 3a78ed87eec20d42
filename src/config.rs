//! Startup configuration.  Read once from an optional TOML file; every
//! field falls back to the classic 800×600 layout when omitted.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::entities::Field;
use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self { min: 4.0, max: 9.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub field_width: f32,
    pub field_height: f32,
    pub player_size: f32,
    /// Distance moved per directional key event.
    pub player_step: f32,
    pub fruit_size: f32,
    pub pool_size: usize,
    pub starting_lives: u32,
    pub tick_interval_ms: u64,
    /// Fall speed is drawn from `[min, max)`.
    pub fall_speed: SpeedRange,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            player_size: 70.0,
            player_step: 35.0,
            fruit_size: 45.0,
            pool_size: 4,
            starting_lives: 3,
            tick_interval_ms: 30,
            fall_speed: SpeedRange::default(),
        }
    }
}

impl GameConfig {
    pub fn field(&self) -> Field {
        Field {
            width: self.field_width,
            height: self.field_height,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like `load_from_file` but never fails; the error (if any) is handed
    /// back as text so the caller can log it.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e.to_string())),
        }
    }

    /// Human-readable warnings for values the game cannot play sensibly with.
    /// Call at startup and log each with `warn!`.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let reals = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_size", self.player_size),
            ("player_step", self.player_step),
            ("fruit_size", self.fruit_size),
            ("fall_speed.min", self.fall_speed.min),
            ("fall_speed.max", self.fall_speed.max),
        ];
        for (name, value) in reals {
            if !value.is_finite() {
                warnings.push(format!("{name} must be a finite number, got {value}"));
            }
        }
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            warnings.push(format!(
                "field must be positive, got {}x{}",
                self.field_width, self.field_height
            ));
        }
        if self.player_size <= 0.0 || self.player_size > self.field_width {
            warnings.push(format!(
                "player_size {} does not fit a field {} wide",
                self.player_size, self.field_width
            ));
        }
        if self.fruit_size <= 0.0 || self.fruit_size > self.field_width {
            warnings.push(format!(
                "fruit_size {} does not fit a field {} wide",
                self.fruit_size, self.field_width
            ));
        }
        if self.fruit_size > self.field_height {
            warnings.push(format!(
                "fruit_size {} exceeds field height {}",
                self.fruit_size, self.field_height
            ));
        }
        if self.player_step <= 0.0 {
            warnings.push(format!("player_step must be positive, got {}", self.player_step));
        }
        if self.pool_size == 0 {
            warnings.push("pool_size is 0: nothing will ever fall".to_string());
        }
        if self.starting_lives == 0 {
            warnings.push("starting_lives is 0: every run ends on the first miss".to_string());
        }
        if self.tick_interval_ms == 0 {
            warnings.push("tick_interval_ms is 0".to_string());
        }
        if self.fall_speed.min <= 0.0 || self.fall_speed.min >= self.fall_speed.max {
            warnings.push(format!(
                "fall_speed range [{}, {}) is empty or not downward",
                self.fall_speed.min, self.fall_speed.max
            ));
        }
        warnings
    }
}
