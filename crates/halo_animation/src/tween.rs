//! Timed interpolation between two property values

use crate::easing::Easing;

/// Interpolates from one value to another over a fixed duration
#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    /// Duration in milliseconds
    duration_ms: u32,
    /// Elapsed time in milliseconds
    elapsed_ms: f32,
    easing: Easing,
    playing: bool,
}

impl Tween {
    /// Create a stopped tween
    pub fn new(from: f32, to: f32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
            easing,
            playing: false,
        }
    }

    /// Rewind and start playing
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Linear progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Current eased value
    pub fn value(&self) -> f32 {
        let t = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * t
    }

    /// Advance by `dt_ms`
    ///
    /// Returns `true` on the tick that reaches the end.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.playing {
            return false;
        }

        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.duration_ms as f32 {
            self.elapsed_ms = self.duration_ms as f32;
            self.playing = false;
            return true;
        }
        false
    }
}
