//! Easing curves
//!
//! Map linear progress `t ∈ [0, 1]` to eased progress. Inputs outside the
//! unit interval are clamped first.

/// Pacing of a transition
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
}

impl Easing {
    /// Apply the curve to linear progress `t`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
        }
    }
}
