//! Floor registry for the elevator simulation
//!
//! Owns every floor and all the queuing logic. Each floor sits behind its own
//! lock so elevators arriving at different floors never contend, while two
//! elevators arriving at the same floor take turns dequeuing.

use anyhow::Result;
use log::debug;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::elevator::SimElevator;
use super::error::SimError;
use super::floor::SimFloor;
use super::passenger::SimPassenger;
use super::types::{Direction, ElevatorId, PassengerId};

pub struct FloorRegistry {
    floors: Vec<Mutex<SimFloor>>,
    /// Next passenger ID to assign
    next_passenger_id: AtomicUsize,
}

impl FloorRegistry {
    /// Create `floor_count` floors numbered from 0
    pub fn new(floor_count: usize) -> Result<Self> {
        if floor_count == 0 {
            return Err(SimError::Configuration(
                "a building needs at least one floor".to_string(),
            )
            .into());
        }

        let floors = (0..floor_count)
            .map(|number| Mutex::new(SimFloor::new(number as i32)))
            .collect();

        Ok(Self {
            floors,
            next_passenger_id: AtomicUsize::new(0),
        })
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn contains(&self, floor_number: i32) -> bool {
        floor_number >= 0 && (floor_number as usize) < self.floors.len()
    }

    fn floor(&self, floor_number: i32) -> Result<&Mutex<SimFloor>> {
        if !self.contains(floor_number) {
            return Err(SimError::NotFound(format!(
                "floor {} (building has floors 0..{})",
                floor_number,
                self.floors.len()
            ))
            .into());
        }
        Ok(&self.floors[floor_number as usize])
    }

    fn next_passenger_id(&self) -> PassengerId {
        PassengerId(self.next_passenger_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Queue `count` passengers at `origin_floor` bound for `destination_floor`
    ///
    /// The request is validated completely before any queue is touched.
    /// Returns the IDs of the new passengers in queue order.
    pub fn enqueue_passengers(
        &self,
        count: usize,
        origin_floor: i32,
        destination_floor: i32,
    ) -> Result<Vec<PassengerId>> {
        let floor = self.floor(origin_floor)?;
        self.floor(destination_floor)?;

        if Direction::between(origin_floor, destination_floor) == Direction::Idle {
            return Err(SimError::InvalidRequest(format!(
                "origin and destination are both floor {}",
                origin_floor
            ))
            .into());
        }
        if count == 0 {
            return Err(
                SimError::InvalidRequest("passenger count must be positive".to_string()).into(),
            );
        }

        let mut floor = floor.lock();
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.next_passenger_id();
            floor.enqueue(SimPassenger::new(id, origin_floor, destination_floor))?;
            ids.push(id);
        }

        debug!(
            "Queued {} passenger(s) at floor {} for floor {}",
            count, origin_floor, destination_floor
        );
        Ok(ids)
    }

    /// Passengers waiting at a floor to go `direction`
    pub fn queue_depth(&self, floor_number: i32, direction: Direction) -> Result<usize> {
        Ok(self.floor(floor_number)?.lock().queue_depth(direction))
    }

    /// Take up to `max_count` passengers from the head of a directional queue
    pub fn dequeue_up_to(
        &self,
        floor_number: i32,
        direction: Direction,
        max_count: usize,
    ) -> Result<Vec<SimPassenger>> {
        self.floor(floor_number)?
            .lock()
            .dequeue_up_to(direction, max_count)
    }

    /// Drop every passenger waiting at a floor to go `direction`
    pub fn clear_queue(
        &self,
        floor_number: i32,
        direction: Direction,
    ) -> Result<Vec<SimPassenger>> {
        self.floor(floor_number)?.lock().clear_queue(direction)
    }

    /// Which queue an elevator arriving at `floor_number` should serve
    ///
    /// A car without a committed direction takes the longer backlog, ties go
    /// down. A car in the middle of a sweep keeps its direction.
    pub fn resolve_service_direction(
        &self,
        elevator: &SimElevator,
        floor_number: i32,
    ) -> Result<Direction> {
        let floor = self.floor(floor_number)?.lock();

        if elevator.direction != Direction::Idle {
            return Ok(elevator.direction);
        }

        if floor.queue_depth(Direction::Up) > floor.queue_depth(Direction::Down) {
            Ok(Direction::Up)
        } else {
            Ok(Direction::Down)
        }
    }

    pub fn add_stopped_elevator(&self, floor_number: i32, elevator_id: ElevatorId) -> Result<()> {
        self.floor(floor_number)?
            .lock()
            .stopped_elevators
            .insert(elevator_id);
        Ok(())
    }

    pub fn remove_stopped_elevator(
        &self,
        floor_number: i32,
        elevator_id: ElevatorId,
    ) -> Result<()> {
        self.floor(floor_number)?
            .lock()
            .stopped_elevators
            .remove(&elevator_id);
        Ok(())
    }

    /// Elevators currently exchanging passengers at a floor
    pub fn stopped_elevators(&self, floor_number: i32) -> Result<Vec<ElevatorId>> {
        Ok(self
            .floor(floor_number)?
            .lock()
            .stopped_elevators
            .iter()
            .copied()
            .collect())
    }

    /// Total passengers waiting across the building
    pub fn total_waiting(&self) -> usize {
        self.floors.iter().map(|floor| floor.lock().waiting()).sum()
    }

    /// (floor, waiting up, waiting down) for every floor
    pub fn waiting_by_floor(&self) -> Vec<(i32, usize, usize)> {
        self.floors
            .iter()
            .map(|floor| {
                let floor = floor.lock();
                (
                    floor.number,
                    floor.queue_depth(Direction::Up),
                    floor.queue_depth(Direction::Down),
                )
            })
            .collect()
    }

    /// Every passenger still waiting, paired with the floor it waits on
    pub fn waiting_passengers(&self) -> Vec<(i32, SimPassenger)> {
        self.floors
            .iter()
            .flat_map(|floor| {
                let floor = floor.lock();
                let waiting: Vec<_> = floor
                    .waiting_passengers()
                    .map(|p| (floor.number, p.clone()))
                    .collect();
                waiting
            })
            .collect()
    }
}
