//! Error kinds raised by the simulation core
//!
//! Operations return `anyhow::Result`; the kinds below travel inside the
//! `anyhow::Error` so callers can tell a rejected request from a caller bug
//! with `downcast_ref::<SimError>()`.

use std::fmt;

use super::types::{Direction, ElevatorId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Invalid building or elevator configuration, fatal at startup
    Configuration(String),
    /// A request that can never be served, such as origin == destination
    InvalidRequest(String),
    /// Reference to a floor or elevator that does not exist
    NotFound(String),
    /// The fleet has no elevator that could take the request
    NoElevatorAvailable { floor: i32, direction: Direction },
    /// Boarding past the capacity limit; the load amount was computed wrong
    CapacityExceeded { elevator: ElevatorId, capacity: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Configuration(message) => write!(f, "invalid configuration: {}", message),
            SimError::InvalidRequest(message) => write!(f, "invalid request: {}", message),
            SimError::NotFound(message) => write!(f, "not found: {}", message),
            SimError::NoElevatorAvailable { floor, direction } => write!(
                f,
                "no elevator available for floor {} going {}",
                floor, direction
            ),
            SimError::CapacityExceeded { elevator, capacity } => write!(
                f,
                "elevator {} is at full capacity ({})",
                elevator.0, capacity
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Returns the simulation error kind carried by `error`, if any
pub fn error_kind(error: &anyhow::Error) -> Option<&SimError> {
    error.downcast_ref::<SimError>()
}
