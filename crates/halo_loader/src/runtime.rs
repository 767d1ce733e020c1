//! Single-threaded loader host
//!
//! [`LoaderRuntime`] bundles a [`CircleLoader`] with the transition engine
//! and frame clock it needs, and drives all three from one `pump` call per
//! rendered frame. Hosts that already own an animation scheduler can drive
//! [`CircleLoader`] directly instead.

use crate::compositor::CircleLoader;
use crate::config::LoaderConfig;
use crate::error::Result;
use halo_animation::{AnimationScheduler, FrameLoop};
use halo_core::{DrawContext, Drawable, Size};

/// What happened during one [`LoaderRuntime::pump`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Frame index, starting at 1
    pub frame: u64,
    /// The arc geometry moved this frame
    pub advanced: bool,
    /// Transitions or frame requests are still outstanding
    pub animating: bool,
}

/// A loader with its own scheduler and frame clock
pub struct LoaderRuntime {
    loader: CircleLoader,
    scheduler: AnimationScheduler,
    frames: FrameLoop,
}

impl LoaderRuntime {
    /// Build a loader and lay it out over a `viewport`-sized surface
    pub fn new(config: &LoaderConfig, viewport: Size) -> Result<Self> {
        let mut loader = CircleLoader::new(config)?;
        loader.layout(viewport.to_rect());
        Ok(Self {
            loader,
            scheduler: AnimationScheduler::new(),
            frames: FrameLoop::new(),
        })
    }

    pub fn start_loading(&mut self) -> bool {
        self.loader
            .start_loading(&mut self.scheduler, &mut self.frames)
    }

    pub fn stop_loading(&mut self) -> bool {
        self.loader
            .stop_loading(&mut self.scheduler, &mut self.frames)
    }

    /// Advance transitions by `dt_ms`, deliver due frames, then paint
    pub fn pump(&mut self, dt_ms: f32, ctx: &mut dyn DrawContext) -> FrameOutcome {
        let report = self.scheduler.tick(dt_ms);
        self.loader.apply_tick_report(&report);

        let mut advanced = false;
        for frame in self.frames.take_due() {
            advanced |= self.loader.on_frame(frame, &mut self.frames);
        }

        self.loader.paint(ctx);

        FrameOutcome {
            frame: self.frames.frame_count(),
            advanced,
            animating: self.is_animating(),
        }
    }

    /// Whether another `pump` would change anything
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_transitions() || self.frames.has_pending()
    }

    pub fn loader(&self) -> &CircleLoader {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut CircleLoader {
        &mut self.loader
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }
}
