//! Draw Context - rendering seam
//!
//! The `DrawContext` trait is the only way widgets talk to a renderer. It
//! keeps a transform stack and an opacity stack and exposes the handful of
//! primitives a loader needs: filled rectangles and stroked arcs.
//!
//! Rasterization is entirely the implementor's business. The in-tree
//! [`RecordingContext`] records commands so they can be replayed by a real
//! backend or inspected in tests.
//!
//! # Example
//!
//! ```
//! use halo_core::{Affine2D, Color, DrawContext, Rect, RecordingContext, Size, Stroke};
//!
//! let mut ctx = RecordingContext::new(Size::new(200.0, 200.0));
//! ctx.push_transform(Affine2D::scale(0.5, 0.5));
//! ctx.stroke_arc(
//!     Rect::new(20.0, 20.0, 160.0, 160.0),
//!     10.0,
//!     90.0,
//!     &Stroke::new(10.0),
//!     Color::WHITE,
//! );
//! ctx.pop_transform();
//!
//! assert_eq!(ctx.arc_count(), 1);
//! ```

use crate::geometry::{Affine2D, Color, Rect, Size};

// ─────────────────────────────────────────────────────────────────────────────
// Stroke Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Line cap style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Flat cap at the endpoint
    #[default]
    Butt,
    /// Rounded cap extending past the endpoint
    Round,
    /// Square cap extending past the endpoint
    Square,
}

/// Stroke style configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Line width
    pub width: f32,
    /// Line cap style
    pub cap: LineCap,
    /// Whether edges should be anti-aliased
    pub anti_alias: bool,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            anti_alias: true,
        }
    }
}

impl Stroke {
    /// Create a new stroke with the given width
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Set line cap style
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    /// Enable or disable anti-aliasing
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Draw Context Trait
// ─────────────────────────────────────────────────────────────────────────────

/// The rendering interface handed to widgets when they paint
pub trait DrawContext {
    /// Push a transform, composed with the current one
    fn push_transform(&mut self, transform: Affine2D);

    /// Pop the top transform from the stack
    fn pop_transform(&mut self);

    /// Get the current combined transform
    fn current_transform(&self) -> Affine2D;

    /// Push an opacity value (multiplied with parent)
    fn push_opacity(&mut self, opacity: f32);

    /// Pop the top opacity from the stack
    fn pop_opacity(&mut self);

    /// Get the current combined opacity
    fn current_opacity(&self) -> f32;

    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke an arc of the oval inscribed in `bounds`
    ///
    /// Angles are in degrees, measured clockwise from the positive x axis.
    /// `sweep_angle` is drawn as given; implementors must not clamp it.
    fn stroke_arc(
        &mut self,
        bounds: Rect,
        start_angle: f32,
        sweep_angle: f32,
        stroke: &Stroke,
        color: Color,
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Draw Context
// ─────────────────────────────────────────────────────────────────────────────

/// A draw command that can be recorded and replayed
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    PushTransform(Affine2D),
    PopTransform,
    PushOpacity(f32),
    PopOpacity,
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeArc {
        bounds: Rect,
        start_angle: f32,
        sweep_angle: f32,
        stroke: Stroke,
        color: Color,
    },
}

/// A draw context that records commands for later execution
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    transform_stack: Vec<Affine2D>,
    opacity_stack: Vec<f32>,
    viewport: Size,
}

impl RecordingContext {
    /// Create a new recording context
    pub fn new(viewport: Size) -> Self {
        Self {
            commands: Vec::new(),
            transform_stack: vec![Affine2D::IDENTITY],
            opacity_stack: vec![1.0],
            viewport,
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded arc strokes
    pub fn arc_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeArc { .. }))
            .count()
    }

    /// Clear all recorded commands and reset the state stacks
    pub fn clear(&mut self) {
        self.commands.clear();
        self.transform_stack = vec![Affine2D::IDENTITY];
        self.opacity_stack = vec![1.0];
    }
}

impl DrawContext for RecordingContext {
    fn push_transform(&mut self, transform: Affine2D) {
        self.commands.push(DrawCommand::PushTransform(transform));
        let combined = self.current_transform().then(&transform);
        self.transform_stack.push(combined);
    }

    fn pop_transform(&mut self) {
        self.commands.push(DrawCommand::PopTransform);
        if self.transform_stack.len() > 1 {
            self.transform_stack.pop();
        }
    }

    fn current_transform(&self) -> Affine2D {
        self.transform_stack.last().copied().unwrap_or_default()
    }

    fn push_opacity(&mut self, opacity: f32) {
        self.commands.push(DrawCommand::PushOpacity(opacity));
        let current = self.current_opacity();
        self.opacity_stack.push(current * opacity);
    }

    fn pop_opacity(&mut self) {
        self.commands.push(DrawCommand::PopOpacity);
        if self.opacity_stack.len() > 1 {
            self.opacity_stack.pop();
        }
    }

    fn current_opacity(&self) -> f32 {
        *self.opacity_stack.last().unwrap_or(&1.0)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_arc(
        &mut self,
        bounds: Rect,
        start_angle: f32,
        sweep_angle: f32,
        stroke: &Stroke,
        color: Color,
    ) {
        self.commands.push(DrawCommand::StrokeArc {
            bounds,
            start_angle,
            sweep_angle,
            stroke: stroke.clone(),
            color,
        });
    }
}
