//! Dispatch heuristic tests

use std::time::Duration;

use elevator_sim::simulation::{
    error_kind, select_elevator, turning_distance, Direction, DispatchRule, ElevatorFleet,
    ElevatorId, ElevatorSnapshot, ElevatorStatus, SimError,
};

fn snapshot(id: usize, floor: i32) -> ElevatorSnapshot {
    ElevatorSnapshot {
        id: ElevatorId(id),
        current_floor: floor,
        direction: Direction::Idle,
        status: ElevatorStatus::Idle,
        passenger_count: 0,
        capacity: 10,
        next_stop: None,
        pending_stops: Vec::new(),
    }
}

fn moving(id: usize, floor: i32, stops: &[i32]) -> ElevatorSnapshot {
    let next = stops[0];
    ElevatorSnapshot {
        direction: Direction::between(floor, next),
        status: ElevatorStatus::Moving,
        next_stop: Some(next),
        pending_stops: stops.to_vec(),
        ..snapshot(id, floor)
    }
}

#[test]
fn test_elevator_at_floor_wins() {
    let elevators = vec![snapshot(0, 1), snapshot(1, 4)];
    assert_eq!(
        select_elevator(&elevators, 4, Direction::Up),
        Some((ElevatorId(1), DispatchRule::AtFloor))
    );
}

#[test]
fn test_moving_elevator_at_floor_is_not_picked_up_by_rule_one() {
    let elevators = vec![moving(0, 4, &[8]), snapshot(1, 6)];
    let (id, rule) = select_elevator(&elevators, 4, Direction::Up).unwrap();
    assert_eq!(id, ElevatorId(1));
    assert_eq!(rule, DispatchRule::Nearest);
}

#[test]
fn test_idle_elevator_closer_than_moving_one() {
    // A idles at 2, B is moving up from 1 towards 10; the call is at 4 going up
    let elevators = vec![snapshot(0, 2), moving(1, 1, &[10])];
    assert_eq!(
        select_elevator(&elevators, 4, Direction::Up),
        Some((ElevatorId(0), DispatchRule::Nearest))
    );
}

#[test]
fn test_equal_distance_prefers_car_already_heading_that_way() {
    let elevators = vec![snapshot(0, 5), moving(1, 1, &[6])];
    assert_eq!(
        select_elevator(&elevators, 3, Direction::Up),
        Some((ElevatorId(1), DispatchRule::Nearest))
    );
}

#[test]
fn test_car_moving_the_other_way_is_not_heading_towards() {
    let elevators = vec![moving(0, 5, &[0]), snapshot(1, 9)];
    let (id, _) = select_elevator(&elevators, 3, Direction::Up).unwrap();
    assert_eq!(id, ElevatorId(1));
}

#[test]
fn test_busy_fleet_falls_back_to_turning_distance() {
    // A sweeps up to 8 before it can come back, B only goes down to 0
    let elevators = vec![moving(0, 5, &[8]), moving(1, 3, &[0])];
    assert_eq!(turning_distance(&elevators[0], 2), 9);
    assert_eq!(turning_distance(&elevators[1], 2), 5);
    assert_eq!(
        select_elevator(&elevators, 2, Direction::Up),
        Some((ElevatorId(1), DispatchRule::TurningDistance))
    );
}

#[test]
fn test_full_fleet_still_gets_a_stop() {
    let mut full = snapshot(0, 3);
    full.passenger_count = full.capacity;
    let mut also_full = snapshot(1, 7);
    also_full.passenger_count = also_full.capacity;

    assert_eq!(
        select_elevator(&[full, also_full], 3, Direction::Down),
        Some((ElevatorId(0), DispatchRule::Fallback))
    );
}

#[test]
fn test_empty_fleet_has_no_selection() {
    assert_eq!(select_elevator(&[], 0, Direction::Up), None);

    let fleet = ElevatorFleet::new(0, 10, Duration::ZERO);
    let err = fleet.dispatch(0, Direction::Up).unwrap_err();
    assert_eq!(
        error_kind(&err),
        Some(&SimError::NoElevatorAvailable {
            floor: 0,
            direction: Direction::Up
        })
    );
}

#[test]
fn test_dispatch_registers_stop_on_selected_elevator() {
    let fleet = ElevatorFleet::new(2, 10, Duration::ZERO);
    let id = fleet.dispatch(6, Direction::Down).unwrap();
    assert_eq!(id, ElevatorId(0));

    let snapshot = fleet.snapshot(id).unwrap();
    assert_eq!(snapshot.next_stop, Some(6));
    assert_eq!(snapshot.pending_stops, vec![6]);

    // The first car is no longer free, so the next call goes to the other one
    let second = fleet.dispatch(4, Direction::Up).unwrap();
    assert_eq!(second, ElevatorId(1));
}

#[test]
fn test_dispatch_without_direction_is_rejected() {
    let fleet = ElevatorFleet::new(1, 10, Duration::ZERO);
    let err = fleet.dispatch(2, Direction::Idle).unwrap_err();
    assert!(matches!(error_kind(&err), Some(SimError::InvalidRequest(_))));
    assert!(!fleet.has_pending_stops());
}

#[test]
fn test_fleet_selection_matches_snapshot_selection() {
    let fleet = ElevatorFleet::new(3, 10, Duration::ZERO);
    fleet
        .with_elevator(ElevatorId(1), |e| e.current_floor = 5)
        .unwrap();
    fleet
        .with_elevator(ElevatorId(2), |e| e.current_floor = 8)
        .unwrap();

    let expected = select_elevator(&fleet.snapshots(), 7, Direction::Down).map(|(id, _)| id);
    assert_eq!(fleet.select_elevator(7, Direction::Down), expected);
    assert_eq!(expected, Some(ElevatorId(2)));

    assert!(fleet.with_elevator(ElevatorId(9), |_| ()).is_err());
}
