//! A single floor of the building
//!
//! Each floor keeps separate FIFO queues for passengers heading up and down,
//! plus the elevators that are currently exchanging passengers here.

use anyhow::Result;
use std::collections::{BTreeSet, VecDeque};

use super::error::SimError;
use super::passenger::SimPassenger;
use super::types::{Direction, ElevatorId};

#[derive(Debug, Clone)]
pub struct SimFloor {
    pub number: i32,
    up_queue: VecDeque<SimPassenger>,
    down_queue: VecDeque<SimPassenger>,
    /// Elevators in the middle of an exchange at this floor
    pub stopped_elevators: BTreeSet<ElevatorId>,
}

impl SimFloor {
    pub fn new(number: i32) -> Self {
        Self {
            number,
            up_queue: VecDeque::new(),
            down_queue: VecDeque::new(),
            stopped_elevators: BTreeSet::new(),
        }
    }

    fn queue_mut(&mut self, direction: Direction) -> Result<&mut VecDeque<SimPassenger>> {
        match direction {
            Direction::Up => Ok(&mut self.up_queue),
            Direction::Down => Ok(&mut self.down_queue),
            Direction::Idle => Err(SimError::InvalidRequest(format!(
                "floor {} has no idle queue",
                self.number
            ))
            .into()),
        }
    }

    /// Append a passenger to the queue matching its direction of travel
    pub fn enqueue(&mut self, passenger: SimPassenger) -> Result<()> {
        let direction = passenger.direction();
        self.queue_mut(direction)?.push_back(passenger);
        Ok(())
    }

    /// Number of passengers waiting to go `direction`; always 0 for Idle
    pub fn queue_depth(&self, direction: Direction) -> usize {
        match direction {
            Direction::Up => self.up_queue.len(),
            Direction::Down => self.down_queue.len(),
            Direction::Idle => 0,
        }
    }

    /// Remove up to `max_count` passengers from the head of a queue
    pub fn dequeue_up_to(
        &mut self,
        direction: Direction,
        max_count: usize,
    ) -> Result<Vec<SimPassenger>> {
        let queue = self.queue_mut(direction)?;
        let take = max_count.min(queue.len());
        Ok(queue.drain(..take).collect())
    }

    /// Drop every passenger waiting to go `direction`
    pub fn clear_queue(&mut self, direction: Direction) -> Result<Vec<SimPassenger>> {
        Ok(self.queue_mut(direction)?.drain(..).collect())
    }

    /// Total passengers waiting on this floor
    pub fn waiting(&self) -> usize {
        self.up_queue.len() + self.down_queue.len()
    }

    pub fn waiting_passengers(&self) -> impl Iterator<Item = &SimPassenger> {
        self.up_queue.iter().chain(self.down_queue.iter())
    }
}
