//! Loader configuration
//!
//! Every knob of the loader lives in one [`LoaderConfig`], loaded from TOML
//! (usually `halo.toml`) or built in code. All fields have defaults, so an
//! empty file is a valid configuration:
//!
//! ```toml
//! rotation_speed = 10.0
//! stroke_width = 10.0
//! loading_color = "#FFFFFF"
//! background_color = "#0000FF"
//! background_alpha = 0.7
//! loading_width = 200.0
//! loading_height = 200.0
//! ```

use crate::error::{LoaderError, Result};
use crate::oscillator::AnimationConfig;
use halo_core::{Color, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a [`CircleLoader`](crate::CircleLoader)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Degrees the outer arc advances per frame
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    /// Width of the arcs and their shadows
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    /// Arc color
    #[serde(default = "default_loading_color")]
    pub loading_color: Color,
    /// Backdrop color
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    /// Backdrop opacity once faded in
    #[serde(default = "default_background_alpha")]
    pub background_alpha: f32,
    /// Spinner width
    #[serde(default = "default_loading_size")]
    pub loading_width: f32,
    /// Spinner height
    #[serde(default = "default_loading_size")]
    pub loading_height: f32,
    /// Smallest arc span in degrees
    #[serde(default = "default_min_span")]
    pub min_span: f32,
    /// Largest arc span in degrees
    #[serde(default = "default_max_span")]
    pub max_span: f32,
    /// Color of the offset shadow arcs
    #[serde(default = "default_shadow_color")]
    pub shadow_color: Color,
    /// Shadow offset on both axes
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset: f32,
    /// Duration of the scale and fade transitions
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u32,
}

fn default_rotation_speed() -> f32 {
    10.0
}

fn default_stroke_width() -> f32 {
    10.0
}

fn default_loading_color() -> Color {
    Color::WHITE
}

fn default_background_color() -> Color {
    Color::BLUE
}

fn default_background_alpha() -> f32 {
    0.7
}

fn default_loading_size() -> f32 {
    200.0
}

fn default_min_span() -> f32 {
    10.0
}

fn default_max_span() -> f32 {
    160.0
}

fn default_shadow_color() -> Color {
    Color::from_hex(0x42464C)
}

fn default_shadow_offset() -> f32 {
    2.0
}

fn default_animation_duration_ms() -> u32 {
    300
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            rotation_speed: default_rotation_speed(),
            stroke_width: default_stroke_width(),
            loading_color: default_loading_color(),
            background_color: default_background_color(),
            background_alpha: default_background_alpha(),
            loading_width: default_loading_size(),
            loading_height: default_loading_size(),
            min_span: default_min_span(),
            max_span: default_max_span(),
            shadow_color: default_shadow_color(),
            shadow_offset: default_shadow_offset(),
            animation_duration_ms: default_animation_duration_ms(),
        }
    }
}

impl LoaderConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LoaderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Spinner size
    pub fn loading_size(&self) -> Size {
        Size::new(self.loading_width, self.loading_height)
    }

    /// Check every value, including the derived animation configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.background_alpha) {
            return Err(LoaderError::InvalidConfig(format!(
                "background_alpha must be within [0, 1], got {}",
                self.background_alpha
            )));
        }
        if !(self.loading_width > 0.0 && self.loading_height > 0.0) {
            return Err(LoaderError::InvalidConfig(format!(
                "loading size must be positive, got {}x{}",
                self.loading_width, self.loading_height
            )));
        }
        if self.animation_duration_ms == 0 {
            return Err(LoaderError::InvalidConfig(
                "animation_duration_ms must be greater than zero".to_string(),
            ));
        }
        if !self.shadow_offset.is_finite() {
            return Err(LoaderError::InvalidConfig(
                "shadow_offset must be finite".to_string(),
            ));
        }
        self.animation_config().map(|_| ())
    }

    /// Build the per-frame animation configuration
    pub fn animation_config(&self) -> Result<AnimationConfig> {
        AnimationConfig::new(self.rotation_speed, self.stroke_width, self.loading_color)?
            .with_span_bounds(self.min_span, self.max_span)
            .map(|config| config.with_shadow(self.shadow_color, self.shadow_offset))
    }
}
