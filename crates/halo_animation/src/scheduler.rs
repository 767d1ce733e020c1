//! Transition scheduler
//!
//! Drives property transitions (scale, opacity, ...) for widgets. A widget
//! asks for a transition through [`TransitionEngine::animate`] and keeps the
//! returned [`TransitionId`]; the host advances the scheduler once per frame
//! with [`AnimationScheduler::tick`] and routes the resulting
//! [`TickReport`] back to the widget:
//!
//! - `updates` carry the sampled value of every running transition
//! - `events` carry completions and cancellations
//!
//! Completion is reported exactly once and only for transitions that ran to
//! the end. Starting a new transition on a target that is already animating
//! replaces the old one, which is then reported as [`TransitionEvent::Cancelled`].
//!
//! Everything runs on the caller's thread; there is no background ticking.

use crate::easing::Easing;
use crate::tween::Tween;
use halo_core::{NodeId, Property};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a registered transition
    pub struct TransitionId;
}

/// A property of a specific node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionTarget {
    pub node: NodeId,
    pub property: Property,
}

impl TransitionTarget {
    pub const fn new(node: NodeId, property: Property) -> Self {
        Self { node, property }
    }
}

/// Everything needed to start a transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSpec {
    pub target: TransitionTarget,
    pub from: f32,
    pub to: f32,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl TransitionSpec {
    /// Linear transition with a 300ms duration
    pub fn new(target: TransitionTarget, from: f32, to: f32) -> Self {
        Self {
            target,
            from,
            to,
            duration_ms: 300,
            easing: Easing::Linear,
        }
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Lifecycle notifications produced while ticking
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    /// The transition reached its end value
    Completed {
        id: TransitionId,
        target: TransitionTarget,
    },
    /// The transition was replaced or cancelled before finishing
    Cancelled {
        id: TransitionId,
        target: TransitionTarget,
    },
}

impl TransitionEvent {
    pub fn id(&self) -> TransitionId {
        match *self {
            TransitionEvent::Completed { id, .. } | TransitionEvent::Cancelled { id, .. } => id,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TransitionEvent::Completed { .. })
    }
}

/// A sampled property value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyUpdate {
    pub target: TransitionTarget,
    pub value: f32,
}

/// Result of one scheduler tick
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub updates: SmallVec<[PropertyUpdate; 4]>,
    pub events: SmallVec<[TransitionEvent; 4]>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.events.is_empty()
    }

    /// Ids of transitions that completed during this tick
    pub fn completed(&self) -> impl Iterator<Item = TransitionId> + '_ {
        self.events
            .iter()
            .filter(|e| e.is_completed())
            .map(TransitionEvent::id)
    }
}

/// Capability to interpolate a property over time
pub trait TransitionEngine {
    /// Start a transition, replacing any transition already running on the same target
    fn animate(&mut self, spec: TransitionSpec) -> TransitionId;

    /// Cancel a running transition. Returns `false` if it was not running.
    fn cancel(&mut self, id: TransitionId) -> bool;

    /// Whether the transition is still running
    fn is_active(&self, id: TransitionId) -> bool;
}

struct Transition {
    target: TransitionTarget,
    tween: Tween,
}

/// Single-threaded transition engine
#[derive(Default)]
pub struct AnimationScheduler {
    transitions: SlotMap<TransitionId, Transition>,
    by_target: FxHashMap<TransitionTarget, TransitionId>,
    /// Last sampled value per target
    values: FxHashMap<TransitionTarget, f32>,
    /// Cancellations waiting to be reported on the next tick
    pending_events: Vec<TransitionEvent>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every running transition by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) -> TickReport {
        let mut report = TickReport::default();
        report.events.extend(self.pending_events.drain(..));

        let mut finished: SmallVec<[TransitionId; 4]> = SmallVec::new();
        for (id, transition) in self.transitions.iter_mut() {
            let done = transition.tween.tick(dt_ms);
            let value = transition.tween.value();
            self.values.insert(transition.target, value);
            report.updates.push(PropertyUpdate {
                target: transition.target,
                value,
            });
            if done {
                finished.push(id);
            }
        }

        for id in finished {
            if let Some(transition) = self.transitions.remove(id) {
                self.by_target.remove(&transition.target);
                tracing::trace!(
                    "transition {:?} on {:?} completed",
                    id,
                    transition.target
                );
                report.events.push(TransitionEvent::Completed {
                    id,
                    target: transition.target,
                });
            }
        }

        report
    }

    /// Whether any transition is running or an event is waiting to be reported
    pub fn has_active_transitions(&self) -> bool {
        !self.transitions.is_empty() || !self.pending_events.is_empty()
    }

    /// Number of running transitions
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Last value sampled for `target`, if it was ever animated
    pub fn value(&self, target: TransitionTarget) -> Option<f32> {
        self.values.get(&target).copied()
    }

    /// Id of the transition currently running on `target`
    pub fn active_on(&self, target: TransitionTarget) -> Option<TransitionId> {
        self.by_target.get(&target).copied()
    }
}

impl TransitionEngine for AnimationScheduler {
    fn animate(&mut self, spec: TransitionSpec) -> TransitionId {
        if let Some(previous) = self.by_target.remove(&spec.target) {
            if self.transitions.remove(previous).is_some() {
                tracing::debug!(
                    "transition {:?} on {:?} replaced before finishing",
                    previous,
                    spec.target
                );
                self.pending_events.push(TransitionEvent::Cancelled {
                    id: previous,
                    target: spec.target,
                });
            }
        }

        let mut tween = Tween::new(spec.from, spec.to, spec.duration_ms, spec.easing);
        tween.start();
        self.values.insert(spec.target, spec.from);

        let id = self.transitions.insert(Transition {
            target: spec.target,
            tween,
        });
        self.by_target.insert(spec.target, id);
        id
    }

    fn cancel(&mut self, id: TransitionId) -> bool {
        match self.transitions.remove(id) {
            Some(transition) => {
                self.by_target.remove(&transition.target);
                self.pending_events.push(TransitionEvent::Cancelled {
                    id,
                    target: transition.target,
                });
                true
            }
            None => false,
        }
    }

    fn is_active(&self, id: TransitionId) -> bool {
        self.transitions.contains_key(id)
    }
}
