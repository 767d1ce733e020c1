//! Per-frame JSON records printed by `halo simulate`

use halo_core::{Container, RecordingContext};
use halo_loader::{CircleLoader, FrameOutcome};
use serde::Serialize;

/// One line of simulation output
#[derive(Debug, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub state: String,
    pub advanced: bool,
    pub outer_start_angle: f32,
    pub inner_start_angle: f32,
    pub arc_span: f32,
    pub growing: bool,
    pub spinner_scale: f32,
    pub backdrop_opacity: f32,
    pub backdrop_visible: bool,
    /// Arc strokes painted this frame, shadows included
    pub arcs: usize,
}

impl FrameRecord {
    pub fn capture(outcome: &FrameOutcome, loader: &CircleLoader, ctx: &RecordingContext) -> Self {
        let arcs = loader.spinner().arc_state();
        Self {
            frame: outcome.frame,
            state: format!("{:?}", loader.state()).to_lowercase(),
            advanced: outcome.advanced,
            outer_start_angle: arcs.outer_start_angle,
            inner_start_angle: arcs.inner_start_angle,
            arc_span: arcs.arc_span,
            growing: arcs.is_growing,
            spinner_scale: loader.spinner().scale().0,
            backdrop_opacity: loader.backdrop().opacity(),
            backdrop_visible: loader.backdrop().visibility().is_visible(),
            arcs: ctx.arc_count(),
        }
    }
}
