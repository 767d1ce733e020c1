//! Arc oscillator
//!
//! Per-frame geometry of the loader: two arcs rotating in opposite
//! directions while their common span pulses between a minimum and a
//! maximum. [`ArcState::advance`] is the whole algorithm; it is pure and is
//! called exactly once per frame while the spinner runs.
//!
//! The outer arc turns by `rotation_step` per frame and is kept in
//! `[0, 360)`. The inner arc turns back by `rotation_step / 1.2` and is kept
//! at or above 360, so the two counter-rotate.
//!
//! The span grows by `pulse_step` (`rotation_step / 4`) and shrinks twice as
//! fast. Shrinking only happens while the span is larger than the rotation
//! step, so with `rotation_step >= max_span` the span stays at its maximum,
//! and with `rotation_step > min_span` it stalls above the minimum.

use crate::error::{LoaderError, Result};
use halo_core::{Color, LineCap, Stroke};

/// Start angle of the outer arc before the first frame
pub const INITIAL_OUTER_ANGLE: f32 = 10.0;

/// Start angle of the inner arc before the first frame
pub const INITIAL_INNER_ANGLE: f32 = 190.0;

/// Ratio between the outer and inner rotation speeds
const INNER_ROTATION_RATIO: f32 = 1.2;

/// Immutable animation parameters
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    rotation_step: f32,
    min_span: f32,
    max_span: f32,
    stroke_color: Color,
    stroke_width: f32,
    shadow_color: Color,
    shadow_offset: f32,
}

impl AnimationConfig {
    /// Default span bounds (10°..160°) and the dark offset shadow
    pub fn new(rotation_step: f32, stroke_width: f32, stroke_color: Color) -> Result<Self> {
        let config = Self {
            rotation_step,
            min_span: 10.0,
            max_span: 160.0,
            stroke_color,
            stroke_width,
            shadow_color: Color::from_hex(0x42464C),
            shadow_offset: 2.0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the span bounds
    pub fn with_span_bounds(mut self, min_span: f32, max_span: f32) -> Result<Self> {
        self.min_span = min_span;
        self.max_span = max_span;
        self.validate()?;
        Ok(self)
    }

    pub fn with_shadow(mut self, color: Color, offset: f32) -> Self {
        self.shadow_color = color;
        self.shadow_offset = offset;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.rotation_step.is_finite() && self.rotation_step > 0.0) {
            return Err(LoaderError::InvalidConfig(format!(
                "rotation step must be a positive number, got {}",
                self.rotation_step
            )));
        }
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(LoaderError::InvalidConfig(format!(
                "stroke width must be a positive number, got {}",
                self.stroke_width
            )));
        }
        if !(self.min_span.is_finite() && self.max_span.is_finite()) || self.min_span < 0.0 {
            return Err(LoaderError::InvalidConfig(format!(
                "span bounds must be finite and non-negative, got {}..{}",
                self.min_span, self.max_span
            )));
        }
        if self.max_span <= self.min_span {
            return Err(LoaderError::InvalidConfig(format!(
                "max span ({}) must be greater than min span ({})",
                self.max_span, self.min_span
            )));
        }

        if self.rotation_step >= self.max_span {
            tracing::warn!(
                "rotation step {} >= max span {}: arcs will never shrink",
                self.rotation_step,
                self.max_span
            );
        } else if self.rotation_step > self.min_span {
            tracing::warn!(
                "rotation step {} > min span {}: arcs stop shrinking above the minimum",
                self.rotation_step,
                self.min_span
            );
        }
        Ok(())
    }

    /// Degrees the outer arc advances per frame
    pub fn rotation_step(&self) -> f32 {
        self.rotation_step
    }

    /// Degrees the inner arc moves back per frame
    pub fn inner_rotation_step(&self) -> f32 {
        self.rotation_step / INNER_ROTATION_RATIO
    }

    /// Span growth per frame; shrinking uses twice this
    pub fn pulse_step(&self) -> f32 {
        self.rotation_step / 4.0
    }

    pub fn min_span(&self) -> f32 {
        self.min_span
    }

    pub fn max_span(&self) -> f32 {
        self.max_span
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn shadow_color(&self) -> Color {
        self.shadow_color
    }

    pub fn shadow_offset(&self) -> f32 {
        self.shadow_offset
    }

    /// Round-capped, anti-aliased stroke at the configured width
    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.stroke_width)
            .with_cap(LineCap::Round)
            .with_anti_alias(true)
    }

    pub(crate) fn set_rotation_step(&mut self, rotation_step: f32) -> Result<()> {
        let mut updated = self.clone();
        updated.rotation_step = rotation_step;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub(crate) fn set_stroke_width(&mut self, stroke_width: f32) -> Result<()> {
        let mut updated = self.clone();
        updated.stroke_width = stroke_width;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub(crate) fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }
}

/// Mutable arc geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcState {
    /// Start angle of the outer arc, in `[0, 360)` once advanced
    pub outer_start_angle: f32,
    /// Start angle of the inner arc, at or above 360 once advanced
    pub inner_start_angle: f32,
    /// Current span of both arcs
    pub arc_span: f32,
    /// Whether the span is currently growing
    pub is_growing: bool,
}

impl ArcState {
    /// Initial geometry for `config`
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            outer_start_angle: INITIAL_OUTER_ANGLE,
            inner_start_angle: INITIAL_INNER_ANGLE,
            arc_span: config.min_span,
            is_growing: true,
        }
    }

    /// Advance the geometry by one frame
    pub fn advance(&mut self, config: &AnimationConfig) {
        self.outer_start_angle = (self.outer_start_angle + config.rotation_step).rem_euclid(360.0);

        self.inner_start_angle -= config.inner_rotation_step();
        if self.inner_start_angle < 360.0 {
            // rem_euclid rounds up to exactly 360 for tiny negative inputs
            let wrapped = self.inner_start_angle.rem_euclid(360.0);
            let wrapped = if wrapped < 360.0 { wrapped } else { 0.0 };
            self.inner_start_angle = wrapped + 360.0;
        }

        if self.is_growing && self.arc_span < config.max_span {
            self.arc_span = (self.arc_span + config.pulse_step()).min(config.max_span);
        } else if !self.is_growing && self.arc_span > config.rotation_step {
            self.arc_span = (self.arc_span - 2.0 * config.pulse_step()).max(config.min_span);
        }

        if self.arc_span >= config.max_span || self.arc_span <= config.min_span {
            self.is_growing = !self.is_growing;
        }
    }

    /// Return the advanced copy, leaving `self` untouched
    pub fn advanced(mut self, config: &AnimationConfig) -> Self {
        self.advance(config);
        self
    }
}

/// An [`ArcState`] paired with the configuration that drives it
#[derive(Clone, Debug)]
pub struct ArcOscillator {
    config: AnimationConfig,
    state: ArcState,
}

impl ArcOscillator {
    pub fn new(config: AnimationConfig) -> Self {
        let state = ArcState::new(&config);
        Self { config, state }
    }

    /// Advance one frame and return the new geometry
    pub fn tick(&mut self) -> ArcState {
        self.state.advance(&self.config);
        tracing::trace!(
            outer = self.state.outer_start_angle,
            inner = self.state.inner_start_angle,
            span = self.state.arc_span,
            growing = self.state.is_growing,
            "arcs advanced"
        );
        self.state
    }

    pub fn state(&self) -> ArcState {
        self.state
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut AnimationConfig {
        &mut self.config
    }

    /// Back to the initial geometry
    pub fn reset(&mut self) {
        self.state = ArcState::new(&self.config);
    }
}
