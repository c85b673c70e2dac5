//! Tick bookkeeping: cancellation of in-flight ticks and per-tick reports

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

use super::types::ElevatorId;

/// Identifies the tick generation a piece of movement work belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

/// Generation counter shared by the driver and every advancing elevator
///
/// Bumping the generation cancels whatever tick is running. Elevators only
/// look at it while waiting between two floors, so a cancelled tick never
/// leaves a car halfway through a floor change or an exchange.
#[derive(Debug, Default)]
pub struct TickControl {
    generation: Mutex<u64>,
    changed: Condvar,
}

impl TickControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a tick starting now
    pub fn begin(&self) -> TickToken {
        TickToken(*self.generation.lock())
    }

    /// Cancel every tick begun before this call
    pub fn cancel_in_flight(&self) {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.changed.notify_all();
    }

    pub fn is_cancelled(&self, token: TickToken) -> bool {
        *self.generation.lock() != token.0
    }

    /// Sleep for `duration` unless the tick is cancelled first
    ///
    /// Returns `true` if the tick was cancelled.
    pub fn wait(&self, token: TickToken, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut generation = self.generation.lock();
        while *generation == token.0 {
            if self.changed.wait_until(&mut generation, deadline).timed_out() {
                return *generation != token.0;
            }
        }
        true
    }
}

/// What happened to one elevator during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Reached its next stop and exchanged passengers there
    Arrived {
        elevator: ElevatorId,
        floor: i32,
        unloaded: usize,
        loaded: usize,
    },
    /// Stopped between floors because a new request came in
    Cancelled { elevator: ElevatorId, floor: i32 },
    /// Had nowhere to go
    Idle { elevator: ElevatorId },
}

/// Summary of one tick across the whole fleet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub outcomes: Vec<AdvanceOutcome>,
}

impl TickReport {
    /// (elevator, floor) for every arrival this tick
    pub fn arrivals(&self) -> Vec<(ElevatorId, i32)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                AdvanceOutcome::Arrived { elevator, floor, .. } => Some((*elevator, *floor)),
                _ => None,
            })
            .collect()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                AdvanceOutcome::Arrived { unloaded, .. } => *unloaded,
                _ => 0,
            })
            .sum()
    }

    pub fn loaded(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                AdvanceOutcome::Arrived { loaded, .. } => *loaded,
                _ => 0,
            })
            .sum()
    }

    pub fn was_cancelled(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| matches!(outcome, AdvanceOutcome::Cancelled { .. }))
    }

    /// True when no elevator had anything to do
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
