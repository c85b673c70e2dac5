//! Core types for the elevator simulation
//!
//! Identifiers, travel directions and the read-only status record handed to
//! whatever is displaying the building.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Maximum number of passengers an elevator carries unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 10;

/// Time an elevator needs to travel between two adjacent floors, in milliseconds
pub const DEFAULT_TRAVEL_TIME_MS: u64 = 2000;

/// A wrapper type for elevator IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElevatorId(pub usize);

/// A wrapper type for passenger IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PassengerId(pub usize);

/// Direction of travel for an elevator or a waiting passenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    /// Direction needed to get from `from` to `to`
    pub fn between(from: i32, to: i32) -> Self {
        match to.cmp(&from) {
            Ordering::Greater => Direction::Up,
            Ordering::Less => Direction::Down,
            Ordering::Equal => Direction::Idle,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    /// Floor offset of a single step in this direction
    pub fn step(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Idle => 0,
        }
    }

    /// Whether `floor` lies strictly ahead of `from` when travelling this way
    pub fn is_ahead(self, from: i32, floor: i32) -> bool {
        match self {
            Direction::Up => floor > from,
            Direction::Down => floor < from,
            Direction::Idle => false,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Idle => "idle",
        };
        f.write_str(label)
    }
}

/// What an elevator is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevatorStatus {
    Idle,
    Moving,
    /// Only held while passengers are exchanged at a floor
    Stopped,
}

/// Read-only view of one elevator, polled by the display layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElevatorSnapshot {
    pub id: ElevatorId,
    pub current_floor: i32,
    pub direction: Direction,
    pub status: ElevatorStatus,
    pub passenger_count: usize,
    pub capacity: usize,
    pub next_stop: Option<i32>,
    pub pending_stops: Vec<i32>,
}

impl ElevatorSnapshot {
    pub fn has_capacity(&self) -> bool {
        self.passenger_count < self.capacity
    }

    /// Idle with nothing left to visit
    pub fn is_free(&self) -> bool {
        self.status == ElevatorStatus::Idle
            && self.next_stop.is_none()
            && self.pending_stops.is_empty()
    }
}
