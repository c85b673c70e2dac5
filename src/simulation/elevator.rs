//! Elevator state machine
//!
//! An elevator is `Idle` until it is given a stop, `Moving` while it travels
//! towards its next stop, and `Stopped` only while passengers are exchanged.
//! Stops are kept in an ordered set and served with a SCAN sweep: keep going
//! in the current direction while there is something ahead, then reverse.

use anyhow::Result;
use sorted_vec::SortedSet;
use std::time::Duration;

use super::error::SimError;
use super::passenger::SimPassenger;
use super::types::{Direction, ElevatorId, ElevatorSnapshot, ElevatorStatus};

/// An elevator car in the simulation
#[derive(Debug, Clone)]
pub struct SimElevator {
    pub id: ElevatorId,
    pub capacity: usize,
    /// Time spent travelling between two adjacent floors
    pub travel_time: Duration,
    pub current_floor: i32,
    /// `None` means the elevator has nowhere to go
    pub next_stop: Option<i32>,
    pub status: ElevatorStatus,
    pub direction: Direction,
    pub passengers: Vec<SimPassenger>,
    /// Floors still to visit, ascending and without duplicates
    pub pending_stops: SortedSet<i32>,
}

impl SimElevator {
    pub fn new(id: ElevatorId, capacity: usize, travel_time: Duration) -> Self {
        Self {
            id,
            capacity,
            travel_time,
            current_floor: 0,
            next_stop: None,
            status: ElevatorStatus::Idle,
            direction: Direction::Idle,
            passengers: Vec::new(),
            pending_stops: SortedSet::new(),
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.passengers.len() < self.capacity
    }

    pub fn available_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.passengers.len())
    }

    fn set_next_stop(&mut self, floor: i32) {
        self.next_stop = Some(floor);
        self.direction = Direction::between(self.current_floor, floor);
    }

    fn go_idle(&mut self) {
        self.next_stop = None;
        self.status = ElevatorStatus::Idle;
        self.direction = Direction::Idle;
    }

    /// Register a floor this elevator has to visit
    ///
    /// A stopped or idle car heads for the closest registered floor. A moving
    /// car only retargets when the new floor is strictly between its position
    /// and its current next stop; anything else waits in the pending set until
    /// the sweep reaches it. Returns `false` when nothing changed.
    pub fn add_stop(&mut self, floor: i32) -> bool {
        if floor < 0 || self.pending_stops.contains(&floor) {
            return false;
        }

        let _ = self.pending_stops.find_or_insert(floor);

        match (self.status, self.next_stop) {
            (ElevatorStatus::Moving, Some(next)) => {
                if self.direction.is_ahead(self.current_floor, floor)
                    && self.direction.is_ahead(floor, next)
                {
                    self.next_stop = Some(floor);
                }
            }
            (_, Some(next)) => {
                if (floor - self.current_floor).abs() < (next - self.current_floor).abs() {
                    self.set_next_stop(floor);
                }
            }
            (_, None) => self.set_next_stop(floor),
        }

        true
    }

    fn nearest_pending_ahead(&self, direction: Direction) -> Option<i32> {
        let current = self.current_floor;
        match direction {
            Direction::Up => self.pending_stops.iter().copied().find(|&f| f > current),
            Direction::Down => self.pending_stops.iter().rev().copied().find(|&f| f < current),
            Direction::Idle => None,
        }
    }

    /// Pick the next stop from the pending set, continuing the current sweep
    /// before reversing. Idles the elevator when nothing is pending.
    pub fn select_next_stop(&mut self) {
        let current = self.current_floor;
        let next = match self.direction {
            Direction::Up | Direction::Down => self
                .nearest_pending_ahead(self.direction)
                .or_else(|| self.nearest_pending_ahead(self.direction.opposite())),
            Direction::Idle => self
                .pending_stops
                .iter()
                .copied()
                .filter(|&f| f != current)
                .min_by_key(|&f| (f - current).abs()),
        }
        .or_else(|| self.pending_stops.contains(&current).then_some(current));

        match next {
            Some(floor) => self.set_next_stop(floor),
            None => self.go_idle(),
        }
    }

    /// Mark the arrival at `floor`: the stop is consumed and the car stops.
    /// A car with no pending stop ahead of it drops its direction so the
    /// exchange can serve either queue.
    pub fn arrive(&mut self, floor: i32) {
        self.current_floor = floor;
        let _ = self.pending_stops.remove_item(&floor);
        self.next_stop = None;
        self.status = ElevatorStatus::Stopped;

        // Nothing left ahead means the sweep is over, whatever lies behind
        if self.nearest_pending_ahead(self.direction).is_none() {
            self.direction = Direction::Idle;
        }
    }

    /// Settle the status once an exchange is over
    pub fn finish_exchange(&mut self) {
        if self.next_stop.is_some() {
            self.status = ElevatorStatus::Moving;
        } else {
            self.go_idle();
        }
    }

    /// Remove and return every passenger whose destination is `floor`
    pub fn unload_at(&mut self, floor: i32) -> Vec<SimPassenger> {
        let (leaving, staying): (Vec<_>, Vec<_>) = self
            .passengers
            .drain(..)
            .partition(|p| p.destination_floor == floor);
        self.passengers = staying;
        leaving
    }

    pub fn board(&mut self, passenger: SimPassenger) -> Result<()> {
        if !self.has_capacity() {
            return Err(SimError::CapacityExceeded {
                elevator: self.id,
                capacity: self.capacity,
            }
            .into());
        }
        self.passengers.push(passenger);
        Ok(())
    }

    /// Furthest floor this car will reach before it can turn around
    pub fn turning_point(&self) -> i32 {
        turning_point(
            self.current_floor,
            self.direction,
            self.next_stop,
            self.pending_stops.iter().copied(),
        )
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            id: self.id,
            current_floor: self.current_floor,
            direction: self.direction,
            status: self.status,
            passenger_count: self.passengers.len(),
            capacity: self.capacity,
            next_stop: self.next_stop,
            pending_stops: self.pending_stops.iter().copied().collect(),
        }
    }
}

/// Furthest floor reached in `direction` from `current_floor` given the stops
/// still to serve
pub fn turning_point(
    current_floor: i32,
    direction: Direction,
    next_stop: Option<i32>,
    pending_stops: impl Iterator<Item = i32>,
) -> i32 {
    let stops = next_stop.into_iter().chain(pending_stops);
    match direction {
        Direction::Up => stops.fold(current_floor, i32::max),
        Direction::Down => stops.fold(current_floor, i32::min),
        Direction::Idle => current_floor,
    }
}
