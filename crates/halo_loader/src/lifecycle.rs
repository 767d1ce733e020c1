//! Spinner lifecycle
//!
//! Owns the arc geometry and decides when it moves. The spinner is a small
//! state machine:
//!
//! ```text
//!   Idle ──start()──▶ Starting ──scale-in requested──▶ Running
//!    ▲                                                   │
//!    └──scale-out ends── Stopping ◀──────stop()──────────┘
//! ```
//!
//! Frames are requested one at a time and re-armed after each advance.
//! `stop()` cancels the armed request synchronously and any frame delivered
//! afterwards is ignored, so the geometry never moves once the spinner has
//! left `Running`. The spinner only returns to `Idle` when its scale-out
//! transition ends; until then `start()` is refused.

use crate::error::{LoaderError, Result};
use crate::oscillator::{AnimationConfig, ArcOscillator, ArcState};
use crate::strokes::StrokeGeometry;
use halo_animation::{
    Easing, FrameRequestId, FrameScheduler, PropertyUpdate, TransitionEngine, TransitionEvent,
    TransitionId, TransitionSpec, TransitionTarget,
};
use halo_core::{
    Affine2D, Color, Container, DrawContext, Drawable, NodeId, Property, Rect, ViewNode,
    Visibility,
};

/// Node id of the spinner inside a loader
pub const SPINNER_NODE: NodeId = NodeId(1);

/// Target of the scale-in/scale-out transitions
pub const SPINNER_SCALE: TransitionTarget = TransitionTarget::new(SPINNER_NODE, Property::Scale);

/// Default duration of the scale transitions
pub const DEFAULT_TRANSITION_MS: u32 = 300;

/// Coarse running status of the spinner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleState {
    #[default]
    Idle,
    Starting,
    Running,
    Stopping,
}

/// Spinner state machine plus the node it draws into
#[derive(Debug)]
pub struct SpinnerLifecycle {
    state: LifecycleState,
    oscillator: ArcOscillator,
    node: ViewNode,
    geometry: StrokeGeometry,
    transition_ms: u32,
    pending_frame: Option<FrameRequestId>,
    scale_out: Option<TransitionId>,
}

impl SpinnerLifecycle {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            state: LifecycleState::Idle,
            oscillator: ArcOscillator::new(config),
            node: ViewNode::new(SPINNER_NODE),
            geometry: StrokeGeometry::default(),
            transition_ms: DEFAULT_TRANSITION_MS,
            pending_frame: None,
            scale_out: None,
        }
    }

    /// Use a different duration for the scale transitions
    pub fn with_transition_duration(mut self, duration_ms: u32) -> Self {
        self.transition_ms = duration_ms;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// True only while frames advance the geometry
    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    pub fn arc_state(&self) -> ArcState {
        self.oscillator.state()
    }

    pub fn config(&self) -> &AnimationConfig {
        self.oscillator.config()
    }

    pub fn geometry(&self) -> &StrokeGeometry {
        &self.geometry
    }

    pub fn node(&self) -> &ViewNode {
        &self.node
    }

    /// Place the spinner and recompute the arc rectangles
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.node.set_bounds(bounds);
        self.geometry = StrokeGeometry::from_config(bounds, self.oscillator.config());
    }

    /// Scale in and start advancing the arcs
    ///
    /// Returns `false` without side effects unless the spinner is idle.
    pub fn start(
        &mut self,
        engine: &mut dyn TransitionEngine,
        frames: &mut dyn FrameScheduler,
    ) -> bool {
        if self.state != LifecycleState::Idle {
            tracing::debug!("spinner start ignored in {:?}", self.state);
            return false;
        }

        self.state = LifecycleState::Starting;
        self.node.apply_property(Property::Scale, 0.0);
        engine.animate(self.scale_spec(0.0, 1.0));

        self.state = LifecycleState::Running;
        self.pending_frame = Some(frames.request_frame());
        tracing::debug!("spinner running");
        true
    }

    /// Stop advancing the arcs and scale out
    ///
    /// Returns `false` without side effects unless the spinner is running.
    pub fn stop(
        &mut self,
        engine: &mut dyn TransitionEngine,
        frames: &mut dyn FrameScheduler,
    ) -> bool {
        if self.state != LifecycleState::Running {
            tracing::debug!("spinner stop ignored in {:?}", self.state);
            return false;
        }

        if let Some(frame) = self.pending_frame.take() {
            frames.cancel_frame(frame);
        }
        self.state = LifecycleState::Stopping;
        self.node.apply_property(Property::Scale, 1.0);
        self.scale_out = Some(engine.animate(self.scale_spec(1.0, 0.0)));
        tracing::debug!("spinner stopping");
        true
    }

    /// Handle a delivered frame request
    ///
    /// Advances the arcs and re-arms when `frame` is the request this spinner
    /// is waiting for; anything else is ignored. Returns whether the
    /// geometry moved.
    pub fn on_frame(&mut self, frame: FrameRequestId, frames: &mut dyn FrameScheduler) -> bool {
        if self.state != LifecycleState::Running || self.pending_frame != Some(frame) {
            tracing::trace!("stale frame {:?} ignored in {:?}", frame, self.state);
            return false;
        }

        self.oscillator.tick();
        self.pending_frame = Some(frames.request_frame());
        true
    }

    /// Handle a transition event; returns `true` when it ended the scale-out
    pub fn on_transition_event(&mut self, event: &TransitionEvent) -> bool {
        if self.state != LifecycleState::Stopping || self.scale_out != Some(event.id()) {
            return false;
        }

        if !event.is_completed() {
            tracing::warn!("spinner scale-out was cancelled, finishing stop anyway");
        }
        self.scale_out = None;
        self.state = LifecycleState::Idle;
        tracing::debug!("spinner idle");
        true
    }

    /// Apply an animated value if it targets the spinner
    pub fn apply_update(&mut self, update: &PropertyUpdate) -> bool {
        if update.target.node != SPINNER_NODE {
            return false;
        }
        self.node.apply_property(update.target.property, update.value);
        true
    }

    /// Change the rotation speed; only allowed while idle
    pub fn set_rotation_step(&mut self, rotation_step: f32) -> Result<()> {
        self.ensure_idle("rotation speed")?;
        self.oscillator.config_mut().set_rotation_step(rotation_step)
    }

    /// Change the stroke width; only allowed while idle
    pub fn set_stroke_width(&mut self, stroke_width: f32) -> Result<()> {
        self.ensure_idle("stroke width")?;
        self.oscillator.config_mut().set_stroke_width(stroke_width)?;
        self.geometry = StrokeGeometry::from_config(self.node.bounds, self.oscillator.config());
        Ok(())
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.oscillator.config_mut().set_stroke_color(color);
    }

    fn ensure_idle(&self, what: &'static str) -> Result<()> {
        if self.state == LifecycleState::Idle {
            Ok(())
        } else {
            Err(LoaderError::Busy(what))
        }
    }

    fn scale_spec(&self, from: f32, to: f32) -> TransitionSpec {
        TransitionSpec::new(SPINNER_SCALE, from, to)
            .duration_ms(self.transition_ms)
            .easing(Easing::Linear)
    }
}

impl Container for SpinnerLifecycle {
    fn visibility(&self) -> Visibility {
        self.node.visibility()
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.node.set_visibility(visibility);
    }

    fn scale(&self) -> (f32, f32) {
        self.node.scale()
    }

    fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.node.set_scale(scale_x, scale_y);
    }

    fn opacity(&self) -> f32 {
        self.node.opacity()
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.node.set_opacity(opacity);
    }
}

impl Drawable for SpinnerLifecycle {
    fn bounds(&self) -> Rect {
        self.node.bounds
    }

    /// Paints the arcs while running or scaling out
    fn paint(&self, ctx: &mut dyn DrawContext) {
        let active = matches!(
            self.state,
            LifecycleState::Running | LifecycleState::Stopping
        );
        if !active || !self.node.visibility.is_visible() {
            return;
        }

        let (sx, sy) = self.node.scale();
        ctx.push_transform(Affine2D::scale_about(sx, sy, self.node.bounds.center()));
        self.geometry
            .paint(ctx, &self.oscillator.state(), self.oscillator.config());
        ctx.pop_transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_animation::{AnimationScheduler, FrameLoop};
    use halo_core::{RecordingContext, Size};
    use slotmap::SlotMap;

    /// Records every request instead of animating
    #[derive(Default)]
    struct RecordingEngine {
        running: SlotMap<TransitionId, TransitionSpec>,
        requested: Vec<TransitionSpec>,
    }

    impl TransitionEngine for RecordingEngine {
        fn animate(&mut self, spec: TransitionSpec) -> TransitionId {
            self.requested.push(spec);
            self.running.insert(spec)
        }

        fn cancel(&mut self, id: TransitionId) -> bool {
            self.running.remove(id).is_some()
        }

        fn is_active(&self, id: TransitionId) -> bool {
            self.running.contains_key(id)
        }
    }

    fn spinner() -> SpinnerLifecycle {
        let config = AnimationConfig::new(10.0, 10.0, Color::WHITE).unwrap();
        let mut spinner = SpinnerLifecycle::new(config);
        spinner.set_bounds(Rect::new(0.0, 0.0, 200.0, 200.0));
        spinner.set_visibility(Visibility::Visible);
        spinner
    }

    #[test]
    fn test_start_requests_scale_in_and_first_frame() {
        let mut spinner = spinner();
        let mut engine = RecordingEngine::default();
        let mut frames = FrameLoop::new();

        assert!(spinner.start(&mut engine, &mut frames));
        assert!(spinner.is_running());
        assert_eq!(spinner.state(), LifecycleState::Running);
        assert_eq!(spinner.scale(), (0.0, 0.0));

        assert_eq!(engine.requested.len(), 1);
        let spec = engine.requested[0];
        assert_eq!(spec.target, SPINNER_SCALE);
        assert_eq!((spec.from, spec.to), (0.0, 1.0));
        assert_eq!(spec.duration_ms, 300);
        assert_eq!(spec.easing, Easing::Linear);

        assert!(frames.has_pending());
    }

    #[test]
    fn test_double_start_scales_in_once() {
        let mut spinner = spinner();
        let mut engine = RecordingEngine::default();
        let mut frames = FrameLoop::new();

        assert!(spinner.start(&mut engine, &mut frames));
        assert!(!spinner.start(&mut engine, &mut frames));
        assert_eq!(engine.requested.len(), 1);
        assert_eq!(frames.take_due().len(), 1);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let mut spinner = spinner();
        let mut engine = RecordingEngine::default();
        let mut frames = FrameLoop::new();

        assert!(!spinner.stop(&mut engine, &mut frames));
        assert_eq!(spinner.state(), LifecycleState::Idle);
        assert!(engine.requested.is_empty());
        assert!(!frames.has_pending());
    }

    #[test]
    fn test_frames_advance_and_rearm() {
        let mut spinner = spinner();
        let mut engine = RecordingEngine::default();
        let mut frames = FrameLoop::new();
        spinner.start(&mut engine, &mut frames);

        for expected_outer in [20.0, 30.0, 40.0] {
            let due = frames.take_due();
            assert_eq!(due.len(), 1);
            assert!(spinner.on_frame(due[0], &mut frames));
            assert_eq!(spinner.arc_state().outer_start_angle, expected_outer);
        }
        assert!(frames.has_pending());
    }

    #[test]
    fn test_start_then_stop_before_first_frame() {
        let mut spinner = spinner();
        let mut engine = AnimationScheduler::new();
        let mut frames = FrameLoop::new();
        let initial = spinner.arc_state();

        spinner.start(&mut engine, &mut frames);
        // The host already pulled the request before stop() ran
        let stale = frames.take_due();
        assert!(spinner.stop(&mut engine, &mut frames));

        assert!(!spinner.is_running());
        assert_eq!(spinner.state(), LifecycleState::Stopping);
        assert!(!frames.has_pending());

        for frame in stale {
            assert!(!spinner.on_frame(frame, &mut frames));
        }
        assert_eq!(spinner.arc_state(), initial);
        assert!(!frames.has_pending());

        // Scale-in is replaced by the scale-out; only the scale-out ends the stop
        let report = engine.tick(150.0);
        for event in &report.events {
            assert!(!spinner.on_transition_event(event));
        }
        assert_eq!(spinner.state(), LifecycleState::Stopping);

        let report = engine.tick(150.0);
        let ended = report
            .events
            .iter()
            .filter(|e| spinner.on_transition_event(e))
            .count();
        assert_eq!(ended, 1);
        assert_eq!(spinner.state(), LifecycleState::Idle);
    }

    #[test]
    fn test_cancelled_scale_out_still_reaches_idle() {
        let mut spinner = spinner();
        let mut engine = AnimationScheduler::new();
        let mut frames = FrameLoop::new();
        spinner.start(&mut engine, &mut frames);
        spinner.stop(&mut engine, &mut frames);

        let scale_out = engine.active_on(SPINNER_SCALE).unwrap();
        engine.cancel(scale_out);
        let report = engine.tick(16.0);
        assert!(report.events.iter().any(|e| spinner.on_transition_event(e)));
        assert_eq!(spinner.state(), LifecycleState::Idle);
    }

    #[test]
    fn test_restart_after_idle() {
        let mut spinner = spinner();
        let mut engine = AnimationScheduler::new();
        let mut frames = FrameLoop::new();

        spinner.start(&mut engine, &mut frames);
        spinner.stop(&mut engine, &mut frames);
        assert!(!spinner.start(&mut engine, &mut frames));

        let report = engine.tick(300.0);
        for event in &report.events {
            spinner.on_transition_event(event);
        }
        assert!(spinner.start(&mut engine, &mut frames));
        assert!(spinner.is_running());
    }

    #[test]
    fn test_apply_update_routes_by_node() {
        let mut spinner = spinner();
        let update = PropertyUpdate {
            target: SPINNER_SCALE,
            value: 0.25,
        };
        assert!(spinner.apply_update(&update));
        assert_eq!(spinner.scale(), (0.25, 0.25));

        let other = PropertyUpdate {
            target: TransitionTarget::new(NodeId(7), Property::Scale),
            value: 0.5,
        };
        assert!(!spinner.apply_update(&other));
        assert_eq!(spinner.scale(), (0.25, 0.25));
    }

    #[test]
    fn test_paint_only_while_active() {
        let mut spinner = spinner();
        let mut engine = RecordingEngine::default();
        let mut frames = FrameLoop::new();
        let mut ctx = RecordingContext::new(Size::new(200.0, 200.0));

        spinner.paint(&mut ctx);
        assert_eq!(ctx.arc_count(), 0);

        spinner.start(&mut engine, &mut frames);
        spinner.paint(&mut ctx);
        assert_eq!(ctx.arc_count(), 4);

        spinner.set_visibility(Visibility::Gone);
        ctx.clear();
        spinner.paint(&mut ctx);
        assert_eq!(ctx.arc_count(), 0);
    }

    #[test]
    fn test_setters_rejected_while_animating() {
        let mut spinner = spinner();
        let mut engine = RecordingEngine::default();
        let mut frames = FrameLoop::new();

        spinner.set_stroke_width(5.0).unwrap();
        assert_eq!(
            spinner.geometry().outer,
            Rect::from_edges(10.0, 10.0, 190.0, 190.0)
        );

        spinner.start(&mut engine, &mut frames);
        assert!(matches!(
            spinner.set_rotation_step(4.0),
            Err(LoaderError::Busy(_))
        ));
        assert!(matches!(
            spinner.set_stroke_width(8.0),
            Err(LoaderError::Busy(_))
        ));
        spinner.set_stroke_color(Color::RED);
        assert_eq!(spinner.config().stroke_color(), Color::RED);
        assert_eq!(spinner.config().rotation_step(), 10.0);
    }
}
