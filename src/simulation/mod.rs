//! Elevator bank simulation core
//!
//! Floors with directional passenger queues, elevators that sweep between
//! their stops, and the dispatch and exchange logic that connects them. It
//! can be driven tick by tick from tests or the console without any of the
//! outer layers.

mod building;
mod dispatch;
mod elevator;
mod error;
mod fleet;
mod floor;
mod floor_registry;
mod passenger;
mod tick;
mod types;

pub use building::{PassengerLocation, SimBuilding, SimulationStats};
pub use dispatch::{select_elevator, turning_distance, DispatchRule};
pub use elevator::{turning_point, SimElevator};
pub use error::{error_kind, SimError};
pub use fleet::ElevatorFleet;
pub use floor::SimFloor;
pub use floor_registry::FloorRegistry;
pub use passenger::SimPassenger;
pub use tick::{AdvanceOutcome, TickControl, TickReport, TickToken};
pub use types::{
    Direction, ElevatorId, ElevatorSnapshot, ElevatorStatus, PassengerId, DEFAULT_CAPACITY,
    DEFAULT_TRAVEL_TIME_MS,
};
