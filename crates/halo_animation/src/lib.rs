//! Halo Animation System
//!
//! Property transitions and frame scheduling for Halo widgets.
//!
//! # Features
//!
//! - **Transitions**: timed from/to interpolation of node properties with easing
//! - **Completion events**: reported per tick instead of listener callbacks
//! - **Override semantics**: a new transition on a busy property replaces the old one
//! - **Frame scheduling**: explicit, cancellable per-frame requests

pub mod easing;
pub mod frame;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use frame::{FrameLoop, FrameRequestId, FrameScheduler};
pub use scheduler::{
    AnimationScheduler, PropertyUpdate, TickReport, TransitionEngine, TransitionEvent,
    TransitionId, TransitionSpec, TransitionTarget,
};
pub use tween::Tween;
