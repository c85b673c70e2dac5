//! Elevator Simulation Library
//!
//! A multi-elevator building simulation that can be ticked directly or run by
//! a background driver.

pub mod config;
pub mod driver;
pub mod simulation;
