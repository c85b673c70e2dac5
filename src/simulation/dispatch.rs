//! Dispatch heuristic
//!
//! Chooses which elevator answers a call at a floor. This works on snapshots
//! rather than on the locked elevators so the whole fleet can be judged from
//! one consistent picture. It is a greedy heuristic: the first rule that
//! produces a candidate wins.

use super::elevator::turning_point;
use super::types::{Direction, ElevatorId, ElevatorSnapshot, ElevatorStatus};

/// Which dispatch rule picked the elevator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRule {
    /// Already standing at the floor
    AtFloor,
    /// Closest among cars heading that way or free
    Nearest,
    /// Cheapest once its current sweep is finished
    TurningDistance,
    /// Every car is full; degraded service on the first one
    Fallback,
}

/// Travel needed to finish the current sweep and come back to `floor`
pub fn turning_distance(elevator: &ElevatorSnapshot, floor: i32) -> i32 {
    let turn = turning_point(
        elevator.current_floor,
        elevator.direction,
        elevator.next_stop,
        elevator.pending_stops.iter().copied(),
    );
    (turn - elevator.current_floor).abs() + (turn - floor).abs()
}

fn is_heading_towards(elevator: &ElevatorSnapshot, floor: i32, direction: Direction) -> bool {
    elevator.status == ElevatorStatus::Moving
        && elevator.direction == direction
        && direction.is_ahead(elevator.current_floor, floor)
}

/// Pick the elevator that should serve a call at `floor` going `direction`
///
/// Returns `None` only when `elevators` is empty.
pub fn select_elevator(
    elevators: &[ElevatorSnapshot],
    floor: i32,
    direction: Direction,
) -> Option<(ElevatorId, DispatchRule)> {
    let candidates: Vec<&ElevatorSnapshot> =
        elevators.iter().filter(|e| e.has_capacity()).collect();

    // Rule 1: no travel at all
    if let Some(elevator) = candidates.iter().find(|e| {
        e.current_floor == floor
            && matches!(e.status, ElevatorStatus::Stopped | ElevatorStatus::Idle)
    }) {
        return Some((elevator.id, DispatchRule::AtFloor));
    }

    // Rule 2: heading this way already, or free
    if let Some(elevator) = candidates
        .iter()
        .filter(|e| is_heading_towards(e, floor, direction) || e.is_free())
        .min_by_key(|e| {
            (
                (e.current_floor - floor).abs(),
                e.direction != direction,
                e.status != ElevatorStatus::Idle,
            )
        })
    {
        return Some((elevator.id, DispatchRule::Nearest));
    }

    // Rule 3: busy cars, judged by how far they go before they can turn
    if let Some(elevator) = candidates
        .iter()
        .min_by_key(|e| turning_distance(e, floor))
    {
        return Some((elevator.id, DispatchRule::TurningDistance));
    }

    // Rule 4: every car is full, so the stop is queued on the first one.
    // Rule 3 always answers when any car has room.
    elevators
        .first()
        .map(|e| (e.id, DispatchRule::Fallback))
}
