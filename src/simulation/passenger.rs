//! Passenger value type

use super::types::{Direction, PassengerId};

/// One rider, waiting in a floor queue or travelling in an elevator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimPassenger {
    pub id: PassengerId,
    pub origin_floor: i32,
    pub destination_floor: i32,
}

impl SimPassenger {
    pub fn new(id: PassengerId, origin_floor: i32, destination_floor: i32) -> Self {
        Self {
            id,
            origin_floor,
            destination_floor,
        }
    }

    /// Which directional queue this passenger waits in
    pub fn direction(&self) -> Direction {
        Direction::between(self.origin_floor, self.destination_floor)
    }
}
