//! The simulated building that ties everything together
//!
//! This is the entry point for running the elevator simulation. Every method
//! takes `&self`, so one building can be shared between the thread that ticks
//! it and whatever is feeding it passenger requests.

use anyhow::Result;
use log::{info, warn};
use parking_lot::Mutex;
use serde::Serialize;

use super::fleet::ElevatorFleet;
use super::floor_registry::FloorRegistry;
use super::tick::{TickControl, TickReport};
use super::types::{Direction, ElevatorId, ElevatorSnapshot, PassengerId};
use crate::config::SimConfig;

/// Where a passenger currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerLocation {
    Waiting { floor: i32 },
    Aboard { elevator: ElevatorId },
}

/// Running totals for a simulation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub ticks: u64,
    pub cancelled_ticks: u64,
    pub requests_accepted: usize,
    pub requests_rejected: usize,
    pub passengers_spawned: usize,
    pub passengers_delivered: usize,
}

impl SimulationStats {
    /// Delivered passengers as a percentage of those spawned
    pub fn delivery_rate(&self) -> f32 {
        if self.passengers_spawned > 0 {
            self.passengers_delivered as f32 / self.passengers_spawned as f32 * 100.0
        } else {
            0.0
        }
    }
}

/// The main simulation building
pub struct SimBuilding {
    floors: FloorRegistry,
    fleet: ElevatorFleet,
    control: TickControl,
    stats: Mutex<SimulationStats>,
}

impl SimBuilding {
    /// Build floors and elevators from a configuration
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let floors = FloorRegistry::new(config.building.floors)?;
        let fleet = ElevatorFleet::new(
            config.building.elevators,
            config.elevator.capacity,
            config.elevator.travel_time(),
        );

        info!(
            "Created building with {} floors and {} elevators (capacity {}, {}ms per floor)",
            config.building.floors,
            config.building.elevators,
            config.elevator.capacity,
            config.elevator.travel_time_ms
        );

        Ok(Self {
            floors,
            fleet,
            control: TickControl::new(),
            stats: Mutex::new(SimulationStats::default()),
        })
    }

    pub fn floors(&self) -> &FloorRegistry {
        &self.floors
    }

    pub fn fleet(&self) -> &ElevatorFleet {
        &self.fleet
    }

    /// Queue passengers at `origin_floor` and call an elevator for them
    ///
    /// Invalid requests are rejected before anything changes. An accepted
    /// request cancels the tick in flight so the next tick starts from the
    /// updated dispatch state. A failed dispatch is logged and the passengers
    /// keep waiting.
    pub fn add_passengers(
        &self,
        count: usize,
        origin_floor: i32,
        destination_floor: i32,
    ) -> Result<Vec<PassengerId>> {
        let ids = match self
            .floors
            .enqueue_passengers(count, origin_floor, destination_floor)
        {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Rejected request: {:#}", e);
                self.stats.lock().requests_rejected += 1;
                return Err(e);
            }
        };

        {
            let mut stats = self.stats.lock();
            stats.requests_accepted += 1;
            stats.passengers_spawned += ids.len();
        }

        self.control.cancel_in_flight();

        let direction = Direction::between(origin_floor, destination_floor);
        if let Err(e) = self.fleet.dispatch(origin_floor, direction) {
            warn!("{:#}", e);
        }

        Ok(ids)
    }

    /// Advance every elevator with somewhere to go
    ///
    /// Safe to call when nothing is pending; nothing changes then.
    pub fn tick(&self) -> TickReport {
        let report = self.fleet.advance_all(&self.floors, &self.control);

        let mut stats = self.stats.lock();
        stats.ticks += 1;
        if report.was_cancelled() {
            stats.cancelled_ticks += 1;
        }
        report
    }

    /// Cancel the tick in flight without issuing a request
    pub fn cancel_tick(&self) {
        self.control.cancel_in_flight();
    }

    /// Status of every elevator, in ID order
    pub fn status(&self) -> Vec<ElevatorSnapshot> {
        self.fleet.snapshots()
    }

    pub fn stats(&self) -> SimulationStats {
        let mut stats = self.stats.lock().clone();
        stats.passengers_delivered = self.fleet.delivered_count();
        stats
    }

    /// Passengers waiting or riding, with their whereabouts
    pub fn passenger_locations(&self) -> Vec<(PassengerId, PassengerLocation)> {
        let waiting = self
            .floors
            .waiting_passengers()
            .into_iter()
            .map(|(floor, p)| (p.id, PassengerLocation::Waiting { floor }));
        let aboard = self
            .fleet
            .aboard_passengers()
            .into_iter()
            .map(|(elevator, p)| (p.id, PassengerLocation::Aboard { elevator }));
        waiting.chain(aboard).collect()
    }

    /// Passengers not yet delivered
    pub fn passengers_in_system(&self) -> usize {
        self.floors.total_waiting() + self.fleet.aboard_passengers().len()
    }

    /// True once nobody is waiting, riding or expected anywhere
    pub fn is_settled(&self) -> bool {
        self.passengers_in_system() == 0 && !self.fleet.has_pending_stops()
    }

    /// Tick until settled or `max_ticks` have run; returns the ticks used
    pub fn run_until_settled(&self, max_ticks: u64) -> Result<u64> {
        for tick in 0..max_ticks {
            if self.is_settled() {
                return Ok(tick);
            }
            self.tick();
        }

        if !self.is_settled() {
            anyhow::bail!(
                "{} passenger(s) still undelivered after {} ticks",
                self.passengers_in_system(),
                max_ticks
            );
        }
        Ok(max_ticks)
    }

    /// Print a summary of the building state
    pub fn print_summary(&self) {
        let stats = self.stats();
        println!("=== Elevator Simulation Summary ===");
        println!(
            "Ticks: {} ({} cancelled)",
            stats.ticks, stats.cancelled_ticks
        );
        println!(
            "Floors: {}, Elevators: {}",
            self.floors.floor_count(),
            self.fleet.len()
        );
        println!(
            "Passengers: spawned={}, delivered={}, in system={}",
            stats.passengers_spawned,
            stats.passengers_delivered,
            self.passengers_in_system()
        );
        println!();

        println!("--- Elevators ---");
        for elevator in self.status() {
            println!(
                "  Elevator {}: floor={}, {:?} {}, passengers={}/{}, next={}, stops={:?}",
                elevator.id.0,
                elevator.current_floor,
                elevator.status,
                elevator.direction,
                elevator.passenger_count,
                elevator.capacity,
                elevator
                    .next_stop
                    .map_or_else(|| "-".to_string(), |f| f.to_string()),
                elevator.pending_stops
            );
        }

        let waiting: Vec<_> = self
            .floors
            .waiting_by_floor()
            .into_iter()
            .filter(|(_, up, down)| up + down > 0)
            .collect();
        if !waiting.is_empty() {
            println!("--- Waiting ---");
            for (floor, up, down) in waiting {
                println!("  Floor {}: up={}, down={}", floor, up, down);
            }
        }
    }
}
