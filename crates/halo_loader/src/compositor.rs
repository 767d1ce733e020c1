//! Circle loader widget
//!
//! Composes a full-size backdrop with a centered [`SpinnerLifecycle`]. The
//! backdrop fades in alongside the spinner's scale-in and fades out alongside
//! its scale-out; it is hidden once the fade-out completes. The spinner
//! itself is never hidden on stop, it simply collapses to scale zero.

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::lifecycle::{LifecycleState, SpinnerLifecycle, SPINNER_NODE};
use halo_animation::{
    Easing, FrameRequestId, FrameScheduler, TickReport, TransitionEngine, TransitionEvent,
    TransitionId, TransitionSpec, TransitionTarget,
};
use halo_core::{
    Color, Container, DrawContext, Drawable, NodeId, Property, Rect, Size, ViewNode, Visibility,
};

/// Node id of the backdrop
pub const BACKDROP_NODE: NodeId = NodeId(2);

/// Target of the fade-in/fade-out transitions
pub const BACKDROP_OPACITY: TransitionTarget =
    TransitionTarget::new(BACKDROP_NODE, Property::Opacity);

/// Backdrop plus spinner, started and stopped together
#[derive(Debug)]
pub struct CircleLoader {
    spinner: SpinnerLifecycle,
    backdrop: ViewNode,
    background_alpha: f32,
    transition_ms: u32,
    loading_size: Size,
    bounds: Rect,
    fade_out: Option<TransitionId>,
}

impl CircleLoader {
    /// Build a hidden loader from a validated configuration
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        config.validate()?;

        let spinner = SpinnerLifecycle::new(config.animation_config()?)
            .with_transition_duration(config.animation_duration_ms);

        Ok(Self {
            spinner,
            backdrop: ViewNode::new(BACKDROP_NODE).with_background(config.background_color),
            background_alpha: config.background_alpha,
            transition_ms: config.animation_duration_ms,
            loading_size: config.loading_size(),
            bounds: Rect::ZERO,
            fade_out: None,
        })
    }

    pub fn spinner(&self) -> &SpinnerLifecycle {
        &self.spinner
    }

    pub fn backdrop(&self) -> &ViewNode {
        &self.backdrop
    }

    pub fn state(&self) -> LifecycleState {
        self.spinner.state()
    }

    pub fn is_running(&self) -> bool {
        self.spinner.is_running()
    }

    pub fn background_alpha(&self) -> f32 {
        self.background_alpha
    }

    /// Fill `bounds` with the backdrop and center the spinner in it
    pub fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.backdrop.set_bounds(bounds);
        self.spinner.set_bounds(bounds.centered(self.loading_size));
    }

    /// Show both children, fade the backdrop in and start the spinner
    ///
    /// Ignored unless the spinner is idle, including while a previous stop
    /// is still scaling out.
    pub fn start_loading(
        &mut self,
        engine: &mut dyn TransitionEngine,
        frames: &mut dyn FrameScheduler,
    ) -> bool {
        if self.spinner.state() != LifecycleState::Idle {
            tracing::debug!("start_loading ignored, spinner is {:?}", self.spinner.state());
            return false;
        }

        self.spinner.set_visibility(Visibility::Visible);
        self.backdrop.set_visibility(Visibility::Visible);
        self.backdrop.set_opacity(0.0);
        engine.animate(self.fade_spec(0.0, self.background_alpha));

        self.spinner.start(engine, frames)
    }

    /// Stop the spinner and fade the backdrop out
    pub fn stop_loading(
        &mut self,
        engine: &mut dyn TransitionEngine,
        frames: &mut dyn FrameScheduler,
    ) -> bool {
        if !self.spinner.is_running() {
            tracing::debug!("stop_loading ignored, spinner is {:?}", self.spinner.state());
            return false;
        }

        self.spinner.stop(engine, frames);
        self.backdrop.set_opacity(self.background_alpha);
        self.fade_out = Some(engine.animate(self.fade_spec(self.background_alpha, 0.0)));
        true
    }

    /// Forward a delivered frame request to the spinner
    pub fn on_frame(&mut self, frame: FrameRequestId, frames: &mut dyn FrameScheduler) -> bool {
        self.spinner.on_frame(frame, frames)
    }

    /// Route sampled values and transition events to the children
    pub fn apply_tick_report(&mut self, report: &TickReport) {
        for update in &report.updates {
            match update.target.node {
                SPINNER_NODE => {
                    self.spinner.apply_update(update);
                }
                BACKDROP_NODE => self
                    .backdrop
                    .apply_property(update.target.property, update.value),
                other => tracing::trace!("update for unknown node {:?} dropped", other),
            }
        }

        for event in &report.events {
            if self.spinner.on_transition_event(event) {
                continue;
            }
            self.on_backdrop_event(event);
        }
    }

    fn on_backdrop_event(&mut self, event: &TransitionEvent) {
        if self.fade_out != Some(event.id()) {
            return;
        }
        self.fade_out = None;
        if event.is_completed() {
            self.backdrop.set_visibility(Visibility::Gone);
            tracing::debug!("backdrop hidden");
        }
    }

    /// Alpha reached by the next fade-in
    pub fn set_background_alpha(&mut self, alpha: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(LoaderError::InvalidConfig(format!(
                "background_alpha must be within [0, 1], got {}",
                alpha
            )));
        }
        self.background_alpha = alpha;
        Ok(())
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.backdrop.set_background(color);
    }

    pub fn set_loading_color(&mut self, color: Color) {
        self.spinner.set_stroke_color(color);
    }

    /// Only allowed while the spinner is idle
    pub fn set_rotation_speed(&mut self, rotation_speed: f32) -> Result<()> {
        self.spinner.set_rotation_step(rotation_speed)
    }

    /// Only allowed while the spinner is idle
    pub fn set_stroke_width(&mut self, stroke_width: f32) -> Result<()> {
        self.spinner.set_stroke_width(stroke_width)
    }

    fn fade_spec(&self, from: f32, to: f32) -> TransitionSpec {
        TransitionSpec::new(BACKDROP_OPACITY, from, to)
            .duration_ms(self.transition_ms)
            .easing(Easing::Linear)
    }
}

impl Drawable for CircleLoader {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Backdrop first, spinner on top
    fn paint(&self, ctx: &mut dyn DrawContext) {
        self.backdrop.paint(ctx);
        self.spinner.paint(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::SPINNER_SCALE;
    use halo_animation::{AnimationScheduler, FrameLoop};
    use halo_core::{DrawCommand, RecordingContext};

    struct Harness {
        loader: CircleLoader,
        engine: AnimationScheduler,
        frames: FrameLoop,
    }

    impl Harness {
        fn new(config: LoaderConfig) -> Self {
            let mut loader = CircleLoader::new(&config).unwrap();
            loader.layout(Rect::new(0.0, 0.0, 400.0, 800.0));
            Self {
                loader,
                engine: AnimationScheduler::new(),
                frames: FrameLoop::new(),
            }
        }

        fn start(&mut self) -> bool {
            self.loader.start_loading(&mut self.engine, &mut self.frames)
        }

        fn stop(&mut self) -> bool {
            self.loader.stop_loading(&mut self.engine, &mut self.frames)
        }

        fn step(&mut self, dt_ms: f32) {
            let report = self.engine.tick(dt_ms);
            self.loader.apply_tick_report(&report);
            for frame in self.frames.take_due() {
                self.loader.on_frame(frame, &mut self.frames);
            }
        }
    }

    #[test]
    fn test_new_loader_is_hidden() {
        let harness = Harness::new(LoaderConfig::default());
        assert_eq!(harness.loader.state(), LifecycleState::Idle);
        assert_eq!(harness.loader.backdrop().visibility(), Visibility::Gone);
        assert_eq!(harness.loader.spinner().visibility(), Visibility::Gone);
        assert_eq!(
            harness.loader.spinner().bounds(),
            Rect::new(100.0, 300.0, 200.0, 200.0)
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LoaderConfig {
            background_alpha: -0.1,
            ..LoaderConfig::default()
        };
        assert!(matches!(
            CircleLoader::new(&config),
            Err(LoaderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_start_fades_backdrop_in() {
        let mut harness = Harness::new(LoaderConfig::default());
        assert!(harness.start());

        assert!(harness.loader.is_running());
        assert_eq!(harness.loader.backdrop().visibility(), Visibility::Visible);
        assert_eq!(harness.loader.spinner().visibility(), Visibility::Visible);
        assert_eq!(harness.loader.backdrop().opacity(), 0.0);

        harness.step(150.0);
        assert!((harness.loader.backdrop().opacity() - 0.35).abs() < 1e-5);
        assert!((harness.loader.spinner().scale().0 - 0.5).abs() < 1e-5);

        harness.step(150.0);
        assert!((harness.loader.backdrop().opacity() - 0.7).abs() < 1e-5);
        assert_eq!(harness.loader.spinner().scale(), (1.0, 1.0));
        assert_eq!(harness.loader.spinner().arc_state().outer_start_angle, 30.0);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut harness = Harness::new(LoaderConfig::default());
        assert!(harness.start());
        harness.step(100.0);
        assert!(!harness.start());
        // Fade-in and scale-in are still the only transitions
        assert_eq!(harness.engine.transition_count(), 2);
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let mut harness = Harness::new(LoaderConfig::default());
        assert!(!harness.stop());
        assert_eq!(harness.engine.transition_count(), 0);
        assert_eq!(harness.loader.backdrop().visibility(), Visibility::Gone);
    }

    #[test]
    fn test_stop_hides_backdrop_after_fade_out() {
        let mut harness = Harness::new(LoaderConfig::default());
        harness.start();
        harness.step(300.0);
        harness.step(16.0);

        assert!(harness.stop());
        assert!(!harness.loader.is_running());
        assert_eq!(harness.loader.state(), LifecycleState::Stopping);
        let frozen = harness.loader.spinner().arc_state();

        harness.step(150.0);
        assert_eq!(harness.loader.backdrop().visibility(), Visibility::Visible);
        assert!((harness.loader.backdrop().opacity() - 0.35).abs() < 1e-5);
        assert_eq!(harness.loader.spinner().arc_state(), frozen);

        harness.step(150.0);
        assert_eq!(harness.loader.state(), LifecycleState::Idle);
        assert_eq!(harness.loader.backdrop().visibility(), Visibility::Gone);
        assert_eq!(harness.loader.spinner().visibility(), Visibility::Visible);
        assert_eq!(harness.loader.spinner().scale(), (0.0, 0.0));
    }

    #[test]
    fn test_restart_during_fade_out_keeps_backdrop() {
        let config = LoaderConfig {
            animation_duration_ms: 200,
            ..LoaderConfig::default()
        };
        let mut harness = Harness::new(config);
        harness.start();
        harness.step(200.0);
        harness.stop();

        // Stop is still in progress
        harness.step(100.0);
        assert!(!harness.start());

        harness.step(100.0);
        assert_eq!(harness.loader.state(), LifecycleState::Idle);
        assert!(harness.start());

        harness.step(50.0);
        assert_eq!(harness.loader.backdrop().visibility(), Visibility::Visible);
        assert!(harness.loader.is_running());
    }

    #[test]
    fn test_fade_in_over_running_fade_out_keeps_backdrop() {
        let mut harness = Harness::new(LoaderConfig::default());
        harness.start();
        harness.step(300.0);
        harness.stop();

        // Cut the scale-out short so the spinner is idle while the fade-out runs
        let scale_out = harness.engine.active_on(SPINNER_SCALE).unwrap();
        assert!(harness.engine.cancel(scale_out));
        harness.step(50.0);
        assert_eq!(harness.loader.state(), LifecycleState::Idle);
        assert!(harness.engine.active_on(BACKDROP_OPACITY).is_some());

        assert!(harness.start());
        harness.step(300.0);
        assert_eq!(harness.loader.backdrop().visibility(), Visibility::Visible);
        assert!((harness.loader.backdrop().opacity() - 0.7).abs() < 1e-5);
        assert!(harness.loader.is_running());

        // The replaced fade-out never completes later on
        harness.step(300.0);
        assert_eq!(harness.loader.backdrop().visibility(), Visibility::Visible);
    }

    #[test]
    fn test_custom_alpha_used_by_fades() {
        let mut harness = Harness::new(LoaderConfig::default());
        harness.loader.set_background_alpha(0.4).unwrap();
        assert!(harness.loader.set_background_alpha(1.2).is_err());

        harness.start();
        harness.step(300.0);
        assert!((harness.loader.backdrop().opacity() - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_setters_respect_lifecycle() {
        let mut harness = Harness::new(LoaderConfig::default());
        harness.loader.set_rotation_speed(6.0).unwrap();
        harness.loader.set_stroke_width(4.0).unwrap();

        harness.start();
        assert!(matches!(
            harness.loader.set_rotation_speed(8.0),
            Err(LoaderError::Busy(_))
        ));
        assert!(matches!(
            harness.loader.set_stroke_width(8.0),
            Err(LoaderError::Busy(_))
        ));

        harness.loader.set_loading_color(Color::RED);
        harness.loader.set_background_color(Color::BLACK);
        assert_eq!(harness.loader.spinner().config().stroke_color(), Color::RED);
        assert_eq!(harness.loader.backdrop().background, Some(Color::BLACK));
        assert_eq!(harness.loader.spinner().config().rotation_step(), 6.0);
    }

    #[test]
    fn test_paint_backdrop_then_arcs() {
        let mut harness = Harness::new(LoaderConfig::default());
        harness.start();
        harness.step(300.0);

        let mut ctx = RecordingContext::new(Size::new(400.0, 800.0));
        harness.loader.paint(&mut ctx);

        let commands = ctx.commands();
        assert!(matches!(commands[0], DrawCommand::PushOpacity(_)));
        assert!(matches!(
            commands[1],
            DrawCommand::FillRect { color, .. } if color == Color::BLUE
        ));
        assert_eq!(ctx.arc_count(), 4);
    }
}
