//! Surface tuning parsed from defaults and environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, DRAG_THRESHOLD, GRID_SIZE, ZOOM_TICK_MAX, ZOOM_TICK_MIN};
use crate::vec::CanvasVec;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Tunables shared by the viewport and tile area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Committed tile positions snap to multiples of this.
    pub grid_size: f64,
    /// Pointer travel before a press turns into a drag.
    pub drag_threshold: f64,
    pub zoom_tick_min: i32,
    pub zoom_tick_max: i32,
    /// Size of the virtual canvas in canvas units.
    pub canvas_size: CanvasVec,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            drag_threshold: DRAG_THRESHOLD,
            zoom_tick_min: ZOOM_TICK_MIN,
            zoom_tick_max: ZOOM_TICK_MAX,
            canvas_size: CanvasVec::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        }
    }
}

impl SurfaceConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `TABLETOP_GRID_SIZE`: default 20
    /// - `TABLETOP_DRAG_THRESHOLD`: default 8
    /// - `TABLETOP_CANVAS_WIDTH` / `TABLETOP_CANVAS_HEIGHT`: default 4000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the resulting values fail [`Self::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            grid_size: env_parse("TABLETOP_GRID_SIZE", defaults.grid_size),
            drag_threshold: env_parse("TABLETOP_DRAG_THRESHOLD", defaults.drag_threshold),
            canvas_size: CanvasVec::new(
                env_parse("TABLETOP_CANVAS_WIDTH", defaults.canvas_size.x),
                env_parse("TABLETOP_CANVAS_HEIGHT", defaults.canvas_size.y),
            ),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(invalid("grid_size", format!("must be positive, got {}", self.grid_size)));
        }
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            return Err(invalid("drag_threshold", format!("must be non-negative, got {}", self.drag_threshold)));
        }
        if !(self.canvas_size.is_finite() && self.canvas_size.x > 0.0 && self.canvas_size.y > 0.0) {
            return Err(invalid("canvas_size", format!("must be positive, got {:?}", self.canvas_size)));
        }
        if self.zoom_tick_min > self.zoom_tick_max {
            return Err(invalid(
                "zoom_tick_min",
                format!("{} exceeds zoom_tick_max {}", self.zoom_tick_min, self.zoom_tick_max),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { key, reason }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
