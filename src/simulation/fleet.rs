//! Elevator fleet: dispatch, stop management, movement and passenger exchange
//!
//! Every elevator sits behind its own lock. A tick fans out one scoped thread
//! per elevator with somewhere to go and joins them all before returning.
//! Locks are always taken elevator first, floor second, and dispatch never
//! holds more than one elevator lock at a time.

use anyhow::Result;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use super::dispatch::select_elevator;
use super::elevator::SimElevator;
use super::error::SimError;
use super::floor_registry::FloorRegistry;
use super::passenger::SimPassenger;
use super::tick::{AdvanceOutcome, TickControl, TickReport, TickToken};
use super::types::{Direction, ElevatorId, ElevatorSnapshot, ElevatorStatus};

pub struct ElevatorFleet {
    elevators: Vec<Mutex<SimElevator>>,
    /// Passengers dropped off at their destination so far
    delivered: AtomicUsize,
}

impl ElevatorFleet {
    /// Create `elevator_count` identical elevators, all idle on floor 0
    pub fn new(elevator_count: usize, capacity: usize, travel_time: Duration) -> Self {
        let elevators = (0..elevator_count)
            .map(|index| Mutex::new(SimElevator::new(ElevatorId(index), capacity, travel_time)))
            .collect();

        Self {
            elevators,
            delivered: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.elevators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevators.is_empty()
    }

    fn elevator(&self, id: ElevatorId) -> Result<&Mutex<SimElevator>> {
        self.elevators
            .get(id.0)
            .ok_or_else(|| SimError::NotFound(format!("elevator {}", id.0)).into())
    }

    pub fn snapshots(&self) -> Vec<ElevatorSnapshot> {
        self.elevators.iter().map(|e| e.lock().snapshot()).collect()
    }

    pub fn snapshot(&self, id: ElevatorId) -> Result<ElevatorSnapshot> {
        Ok(self.elevator(id)?.lock().snapshot())
    }

    /// Run `f` against one elevator while holding its lock
    pub fn with_elevator<R>(
        &self,
        id: ElevatorId,
        f: impl FnOnce(&mut SimElevator) -> R,
    ) -> Result<R> {
        Ok(f(&mut self.elevator(id)?.lock()))
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Every passenger currently riding, paired with its elevator
    pub fn aboard_passengers(&self) -> Vec<(ElevatorId, SimPassenger)> {
        self.elevators
            .iter()
            .flat_map(|e| {
                let e = e.lock();
                let riders: Vec<_> = e.passengers.iter().map(|p| (e.id, p.clone())).collect();
                riders
            })
            .collect()
    }

    /// True if any elevator still has a stop to reach
    pub fn has_pending_stops(&self) -> bool {
        self.elevators.iter().any(|e| {
            let e = e.lock();
            e.next_stop.is_some() || !e.pending_stops.is_empty()
        })
    }

    /// Choose the elevator for a call without assigning anything
    pub fn select_elevator(&self, floor: i32, direction: Direction) -> Option<ElevatorId> {
        select_elevator(&self.snapshots(), floor, direction).map(|(id, _)| id)
    }

    /// Send an elevator to `floor` to pick up passengers going `direction`
    pub fn dispatch(&self, floor: i32, direction: Direction) -> Result<ElevatorId> {
        if direction == Direction::Idle {
            return Err(SimError::InvalidRequest(format!(
                "cannot dispatch to floor {} without a direction",
                floor
            ))
            .into());
        }

        let (id, rule) = select_elevator(&self.snapshots(), floor, direction)
            .ok_or(SimError::NoElevatorAvailable { floor, direction })?;

        self.add_stop(id, floor)?;
        info!(
            "Dispatched elevator {} to floor {} going {} ({:?})",
            id.0, floor, direction, rule
        );
        Ok(id)
    }

    /// Register `floor` as a stop for elevator `id`
    pub fn add_stop(&self, id: ElevatorId, floor: i32) -> Result<bool> {
        let mut elevator = self.elevator(id)?.lock();
        let added = elevator.add_stop(floor);
        if added {
            debug!(
                "Elevator {} stops: {:?}, next {:?}",
                id.0,
                elevator.pending_stops.iter().collect::<Vec<_>>(),
                elevator.next_stop
            );
        }
        Ok(added)
    }

    /// Advance every elevator that has a next stop, concurrently
    ///
    /// Returns once every elevator has arrived or given up because the tick
    /// was cancelled. Does nothing when no elevator has a next stop.
    pub fn advance_all(&self, floors: &FloorRegistry, control: &TickControl) -> TickReport {
        let token = control.begin();

        let active: Vec<ElevatorId> = self
            .elevators
            .iter()
            .filter_map(|e| {
                let e = e.lock();
                let id = e.id;
                e.next_stop.map(|_| id)
            })
            .collect();

        if active.is_empty() {
            return TickReport::default();
        }

        let outcomes: Vec<AdvanceOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = active
                .iter()
                .map(|&id| {
                    let handle = thread::Builder::new()
                        .name(format!("elevator-{}", id.0))
                        .spawn_scoped(scope, move || {
                            self.advance_elevator(id, floors, control, token)
                        });
                    (id, handle)
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|(id, handle)| match handle {
                    Err(e) => {
                        error!("Failed to start elevator {}: {}", id.0, e);
                        None
                    }
                    Ok(handle) => match handle.join() {
                        Ok(Ok(outcome)) => Some(outcome),
                        Ok(Err(e)) => {
                            error!("Elevator {} failed to advance: {:#}", id.0, e);
                            None
                        }
                        Err(_) => {
                            error!("Elevator {} movement panicked", id.0);
                            None
                        }
                    },
                })
                .collect()
        });

        TickReport { outcomes }
    }

    /// Move one elevator floor by floor to its next stop, then exchange
    fn advance_elevator(
        &self,
        id: ElevatorId,
        floors: &FloorRegistry,
        control: &TickControl,
        token: TickToken,
    ) -> Result<AdvanceOutcome> {
        let slot = self.elevator(id)?;

        let arrival_floor = loop {
            let travel_time = {
                let mut elevator = slot.lock();
                let Some(target) = elevator.next_stop else {
                    elevator.status = ElevatorStatus::Idle;
                    elevator.direction = Direction::Idle;
                    return Ok(AdvanceOutcome::Idle { elevator: id });
                };

                if elevator.current_floor == target {
                    break target;
                }

                elevator.status = ElevatorStatus::Moving;
                elevator.direction = Direction::between(elevator.current_floor, target);
                elevator.travel_time
            };

            if control.wait(token, travel_time) {
                let floor = slot.lock().current_floor;
                debug!(
                    "Elevator {} halted at floor {}, tick cancelled",
                    id.0, floor
                );
                return Ok(AdvanceOutcome::Cancelled { elevator: id, floor });
            }

            let mut elevator = slot.lock();
            let current = elevator.current_floor;
            // The target may have moved closer while we were travelling
            let step = elevator
                .next_stop
                .map_or(0, |target| Direction::between(current, target).step());
            elevator.current_floor += step;
            debug!("Elevator {} at floor {}", id.0, elevator.current_floor);
        };

        self.process_stop(id, arrival_floor, floors)
    }

    /// Exchange passengers once elevator `id` has arrived at `floor`
    ///
    /// Riders for this floor get off, then the elevator boards as many
    /// waiting passengers as it has room for from the queue it serves. Any
    /// backlog left on the floor is dispatched again.
    pub fn process_stop(
        &self,
        id: ElevatorId,
        floor: i32,
        floors: &FloorRegistry,
    ) -> Result<AdvanceOutcome> {
        let slot = self.elevator(id)?;

        let (served, unloaded, loaded) = {
            let mut elevator = slot.lock();
            elevator.arrive(floor);
            floors.add_stopped_elevator(floor, id)?;

            let result = exchange(&mut elevator, floor, floors);

            floors.remove_stopped_elevator(floor, id)?;
            elevator.finish_exchange();
            result?
        };

        self.delivered.fetch_add(unloaded, Ordering::Relaxed);
        info!(
            "Elevator {} at floor {}: {} off, {} on, serving {}",
            id.0, floor, unloaded, loaded, served
        );

        // A backlog this car could not absorb, or that it left behind by
        // keeping its direction, calls for another car
        for direction in [served, served.opposite()] {
            if floors.queue_depth(floor, direction)? > 0 {
                if let Err(e) = self.dispatch(floor, direction) {
                    warn!("Could not dispatch to floor {}: {:#}", floor, e);
                }
            }
        }

        Ok(AdvanceOutcome::Arrived {
            elevator: id,
            floor,
            unloaded,
            loaded,
        })
    }
}

/// Unload, pick a queue, load, and choose where to go next.
/// Returns (direction served, passengers off, passengers on).
fn exchange(
    elevator: &mut SimElevator,
    floor: i32,
    floors: &FloorRegistry,
) -> Result<(Direction, usize, usize)> {
    let unloaded = elevator.unload_at(floor).len();

    let served = floors.resolve_service_direction(elevator, floor)?;
    let boarding = floors.dequeue_up_to(floor, served, elevator.available_capacity())?;
    let loaded = boarding.len();

    let destinations: Vec<i32> = boarding.iter().map(|p| p.destination_floor).collect();
    for passenger in boarding {
        elevator.board(passenger)?;
    }
    for destination in destinations {
        elevator.add_stop(destination);
    }

    elevator.select_next_stop();
    Ok((served, unloaded, loaded))
}
