//! Elevator state machine tests
//!
//! Stop registration, SCAN sweeps and capacity handling on a single car.

use std::time::Duration;

use elevator_sim::simulation::{
    error_kind, Direction, ElevatorId, ElevatorStatus, PassengerId, SimElevator, SimError,
    SimPassenger,
};

fn elevator(capacity: usize) -> SimElevator {
    SimElevator::new(ElevatorId(0), capacity, Duration::ZERO)
}

fn passenger(id: usize, origin: i32, destination: i32) -> SimPassenger {
    SimPassenger::new(PassengerId(id), origin, destination)
}

#[test]
fn test_new_elevator_is_idle_at_ground_floor() {
    let e = elevator(10);
    assert_eq!(e.current_floor, 0);
    assert_eq!(e.status, ElevatorStatus::Idle);
    assert_eq!(e.direction, Direction::Idle);
    assert_eq!(e.next_stop, None);
    assert!(e.pending_stops.is_empty());
    assert_eq!(e.available_capacity(), 10);
}

#[test]
fn test_add_stop_sets_next_stop_when_idle() {
    let mut e = elevator(10);
    assert!(e.add_stop(4));
    assert_eq!(e.next_stop, Some(4));
    assert_eq!(e.direction, Direction::Up);
    assert!(e.pending_stops.contains(&4));
}

#[test]
fn test_add_stop_ignores_negative_and_duplicate_floors() {
    let mut e = elevator(10);
    assert!(!e.add_stop(-1));
    assert!(e.pending_stops.is_empty());

    assert!(e.add_stop(3));
    assert!(!e.add_stop(3));
    assert_eq!(e.pending_stops.iter().copied().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_idle_elevator_prefers_closer_stop() {
    let mut e = elevator(10);
    e.current_floor = 5;
    e.add_stop(9);
    e.add_stop(6);
    assert_eq!(e.next_stop, Some(6));

    // Further away than the current target, only queued
    e.add_stop(1);
    assert_eq!(e.next_stop, Some(6));
    assert_eq!(
        e.pending_stops.iter().copied().collect::<Vec<_>>(),
        vec![1, 6, 9]
    );
}

#[test]
fn test_moving_elevator_only_retargets_between_position_and_next_stop() {
    let mut e = elevator(10);
    e.current_floor = 2;
    e.add_stop(8);
    e.status = ElevatorStatus::Moving;

    e.add_stop(5);
    assert_eq!(e.next_stop, Some(5), "floor on the way becomes the target");

    e.add_stop(9);
    assert_eq!(e.next_stop, Some(5), "floor past the target waits");

    e.add_stop(1);
    assert_eq!(e.next_stop, Some(5), "floor behind the car waits");
    assert_eq!(e.direction, Direction::Up);
    assert_eq!(
        e.pending_stops.iter().copied().collect::<Vec<_>>(),
        vec![1, 5, 8, 9]
    );
}

#[test]
fn test_scan_sweep_finishes_direction_before_reversing() {
    let mut e = elevator(10);
    e.current_floor = 5;
    e.add_stop(7);
    e.add_stop(2);
    e.add_stop(9);
    assert_eq!(e.next_stop, Some(7));
    assert_eq!(e.direction, Direction::Up);

    e.arrive(7);
    assert_eq!(e.status, ElevatorStatus::Stopped);
    assert_eq!(e.next_stop, None);
    e.select_next_stop();
    e.finish_exchange();
    assert_eq!(e.next_stop, Some(9));
    assert_eq!(e.status, ElevatorStatus::Moving);

    e.arrive(9);
    e.select_next_stop();
    e.finish_exchange();
    assert_eq!(e.next_stop, Some(2));
    assert_eq!(e.direction, Direction::Down);

    e.arrive(2);
    assert_eq!(e.direction, Direction::Idle);
    e.select_next_stop();
    e.finish_exchange();
    assert_eq!(e.next_stop, None);
    assert_eq!(e.status, ElevatorStatus::Idle);
}

#[test]
fn test_unload_only_removes_passengers_for_this_floor() {
    let mut e = elevator(10);
    e.board(passenger(0, 0, 3)).unwrap();
    e.board(passenger(1, 0, 5)).unwrap();
    e.board(passenger(2, 0, 3)).unwrap();

    let leaving = e.unload_at(3);
    assert_eq!(leaving.len(), 2);
    assert!(leaving.iter().all(|p| p.destination_floor == 3));
    assert_eq!(e.passengers.len(), 1);
    assert_eq!(e.passengers[0].id, PassengerId(1));
}

#[test]
fn test_boarding_past_capacity_is_rejected() {
    let mut e = elevator(2);
    e.board(passenger(0, 0, 4)).unwrap();
    e.board(passenger(1, 0, 4)).unwrap();
    assert!(!e.has_capacity());

    let err = e.board(passenger(2, 0, 4)).unwrap_err();
    assert_eq!(
        error_kind(&err),
        Some(&SimError::CapacityExceeded {
            elevator: ElevatorId(0),
            capacity: 2
        })
    );
    assert_eq!(e.passengers.len(), 2);
}

#[test]
fn test_turning_point_follows_direction() {
    let mut e = elevator(10);
    e.current_floor = 4;
    e.add_stop(6);
    e.add_stop(8);
    assert_eq!(e.turning_point(), 8);

    let mut down = elevator(10);
    down.current_floor = 6;
    down.add_stop(3);
    down.add_stop(1);
    assert_eq!(down.turning_point(), 1);

    assert_eq!(elevator(10).turning_point(), 0);
}

#[test]
fn test_snapshot_reflects_state() {
    let mut e = elevator(4);
    e.current_floor = 2;
    e.add_stop(6);
    e.board(passenger(0, 2, 6)).unwrap();

    let snapshot = e.snapshot();
    assert_eq!(snapshot.id, ElevatorId(0));
    assert_eq!(snapshot.current_floor, 2);
    assert_eq!(snapshot.direction, Direction::Up);
    assert_eq!(snapshot.passenger_count, 1);
    assert_eq!(snapshot.capacity, 4);
    assert_eq!(snapshot.next_stop, Some(6));
    assert_eq!(snapshot.pending_stops, vec![6]);
}

#[test]
fn test_arrival_with_nothing_ahead_ends_the_sweep() {
    let mut e = elevator(10);
    e.add_stop(1);
    e.add_stop(0);
    e.select_next_stop();
    e.finish_exchange();
    assert_eq!(e.next_stop, Some(1));
    assert_eq!(e.direction, Direction::Up);

    // Floor 0 is still pending behind the car, but nothing is left above it
    e.arrive(1);
    assert_eq!(e.direction, Direction::Idle);
    assert_eq!(e.pending_stops.iter().copied().collect::<Vec<_>>(), vec![0]);

    e.select_next_stop();
    assert_eq!(e.next_stop, Some(0));
    assert_eq!(e.direction, Direction::Down);
}
