//! Deferred state changes keyed by simulation tick
//!
//! Power-up reversions and phase auto-transitions are queued here and fired
//! at the start of the tick whose clock reaches their `fire_tick`, so they
//! always land between physics steps.

use serde::{Deserialize, Serialize};

use super::state::Side;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScheduledKind {
    /// Undo a height multiplier on a paddle
    RevertPaddleHeight { side: Side, factor: f32 },
    /// Drop one extra ball, keeping at least one live
    RemoveExtraBall,
    /// Undo a speed multiplier on every live ball
    RevertBallSpeed { factor: f32 },
    /// Intermission over, back to play
    ResumeRound,
    /// Match-over display finished, start a fresh match
    ResetMatch,
}

impl ScheduledKind {
    /// True for power-up reversions, false for phase transitions
    pub fn is_effect(&self) -> bool {
        matches!(
            self,
            ScheduledKind::RevertPaddleHeight { .. }
                | ScheduledKind::RemoveExtraBall
                | ScheduledKind::RevertBallSpeed { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub kind: ScheduledKind,
    pub fire_tick: u64,
}

/// Pending events in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    events: Vec<ScheduledEvent>,
}

impl Schedule {
    pub fn push(&mut self, kind: ScheduledKind, fire_tick: u64) {
        self.events.push(ScheduledEvent { kind, fire_tick });
    }

    /// Remove and return every event due at `now`, earliest first.
    /// Events due on the same tick keep their insertion order.
    pub fn take_due(&mut self, now: u64) -> Vec<ScheduledKind> {
        let mut due: Vec<ScheduledEvent> = Vec::new();
        self.events.retain(|e| {
            if e.fire_tick <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| e.fire_tick);
        due.into_iter().map(|e| e.kind).collect()
    }

    /// Drop pending power-up reversions, keeping phase transitions
    pub fn cancel_effects(&mut self) {
        self.events.retain(|e| !e.kind.is_effect());
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.events.iter()
    }
}
