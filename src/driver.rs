//! Background driver that ticks a building on a fixed cadence
//!
//! The driver owns a thread that waits on a shutdown channel between ticks and
//! publishes a [`StatusUpdate`] after each one. Requests go straight to the
//! shared building so a tick in flight is cancelled as soon as they land.

use anyhow::{anyhow, Context, Result};
use crossbeam_channel as cbc;
use log::{debug, info};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::simulation::{ElevatorSnapshot, PassengerId, SimBuilding, TickReport};

/// Published after every tick
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub tick: u64,
    pub report: TickReport,
    pub elevators: Vec<ElevatorSnapshot>,
}

pub struct SimulationDriver {
    building: Arc<SimBuilding>,
    tick_interval: Duration,
    shutdown_rx: cbc::Receiver<()>,
    status_tx: cbc::Sender<StatusUpdate>,
}

impl SimulationDriver {
    pub fn run(self) {
        let mut tick = 0;
        info!("Driver started, ticking every {:?}", self.tick_interval);

        loop {
            cbc::select! {
                recv(self.shutdown_rx) -> _ => break,
                default(self.tick_interval) => {
                    let report = self.building.tick();
                    tick += 1;
                    if !report.is_empty() {
                        debug!("Tick {}: {} arrival(s)", tick, report.arrivals().len());
                    }
                    let update = StatusUpdate {
                        tick,
                        report,
                        elevators: self.building.status(),
                    };
                    // Nobody listening is fine
                    let _ = self.status_tx.send(update);
                }
            }
        }

        info!("Driver stopped after {} ticks", tick);
    }
}

/// Owner side of a running driver
pub struct DriverHandle {
    building: Arc<SimBuilding>,
    shutdown_tx: cbc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl DriverHandle {
    /// Start ticking `building` on its own thread
    ///
    /// Returns the handle and the receiving end of the status channel.
    pub fn spawn(
        building: Arc<SimBuilding>,
        tick_interval: Duration,
    ) -> Result<(Self, cbc::Receiver<StatusUpdate>)> {
        let (shutdown_tx, shutdown_rx) = cbc::bounded(1);
        let (status_tx, status_rx) = cbc::unbounded();

        let driver = SimulationDriver {
            building: Arc::clone(&building),
            tick_interval,
            shutdown_rx,
            status_tx,
        };

        let thread = thread::Builder::new()
            .name("sim-driver".to_string())
            .spawn(move || driver.run())
            .context("Failed to start simulation driver")?;

        Ok((
            Self {
                building,
                shutdown_tx,
                thread: Some(thread),
            },
            status_rx,
        ))
    }

    pub fn building(&self) -> &SimBuilding {
        &self.building
    }

    pub fn add_passengers(
        &self,
        count: usize,
        origin_floor: i32,
        destination_floor: i32,
    ) -> Result<Vec<PassengerId>> {
        self.building
            .add_passengers(count, origin_floor, destination_floor)
    }

    pub fn status(&self) -> Vec<ElevatorSnapshot> {
        self.building.status()
    }

    /// Stop the driver and wait for its thread
    ///
    /// The tick in flight is cancelled so elevators halt where they are.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        let _ = self.shutdown_tx.send(());
        // A tick may begin between the send and the cancel, so keep cancelling
        while !thread.is_finished() {
            self.building.cancel_tick();
            thread::sleep(Duration::from_millis(5));
        }
        thread
            .join()
            .map_err(|_| anyhow!("simulation driver thread panicked"))
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
