use super::TransitionEngine;
use crate::domain::error::DomainError;
use crate::domain::station::StationSequence;
use crate::domain::types::{StationStatus, VehicleModel};
use crate::domain::vehicle::VehicleRecord;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

// ==========================================
// 测试辅助函数
// ==========================================

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

fn engine_abc() -> TransitionEngine {
    TransitionEngine::new(Arc::new(StationSequence::new(["A", "B", "C"]).unwrap()))
}

fn new_vehicle(engine: &TransitionEngine) -> VehicleRecord {
    VehicleRecord::new("V0001".into(), VehicleModel::C43, t0(), t0(), engine.sequence())
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_scenario_complete_repair_and_reject_revert() {
    let engine = engine_abc();
    let v = new_vehicle(&engine);
    assert_eq!(v.current_station, "A");
    assert_eq!(v.status_at("A"), StationStatus::InProgress);

    let t1 = t0() + Duration::minutes(30);
    let v = engine
        .apply_transition(&v, "A", StationStatus::Completed, t1)
        .unwrap();
    assert_eq!(v.current_station, "B");
    assert_eq!(v.status_at("A"), StationStatus::Completed);
    assert_eq!(v.status_at("B"), StationStatus::InProgress);
    assert_eq!(v.progress("B").unwrap().updated_at, Some(t1));
    assert_eq!(v.last_updated_at, t1);

    let t2 = t1 + Duration::minutes(5);
    let v = engine
        .apply_transition(&v, "B", StationStatus::RepairNeeded, t2)
        .unwrap();
    assert_eq!(v.status_at("B"), StationStatus::RepairNeeded);
    assert_eq!(v.current_station, "B");

    let before = v.clone();
    let err = engine
        .apply_transition(&v, "A", StationStatus::InProgress, t2 + Duration::minutes(1))
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));
    assert_eq!(v, before);
}

#[test]
fn test_complete_last_station_marks_fully_completed() {
    let engine = engine_abc();
    let mut v = new_vehicle(&engine);
    let mut now = t0();
    for station in ["A", "B", "C"] {
        now += Duration::hours(1);
        v = engine
            .apply_transition(&v, station, StationStatus::Completed, now)
            .unwrap();
    }

    assert_eq!(v.current_station, "C");
    assert!(v.is_fully_completed());
    assert_eq!(v.last_updated_at, now);
}

#[test]
fn test_repair_then_complete_current_advances() {
    let engine = engine_abc();
    let v = new_vehicle(&engine);
    let v = engine
        .apply_transition(&v, "A", StationStatus::RepairNeeded, t0())
        .unwrap();
    assert_eq!(v.current_station, "A");

    let v = engine
        .apply_transition(&v, "A", StationStatus::Completed, t0())
        .unwrap();
    assert_eq!(v.current_station, "B");
}

#[test]
fn test_in_progress_on_current_station_is_status_only() {
    let engine = engine_abc();
    let v = new_vehicle(&engine);
    let later = t0() + Duration::minutes(10);
    let v2 = engine
        .apply_transition(&v, "A", StationStatus::InProgress, later)
        .unwrap();
    assert_eq!(v2.current_station, "A");
    assert_eq!(v2.progress("A").unwrap().updated_at, Some(later));
}

#[test]
fn test_future_station_is_rejected() {
    let engine = engine_abc();
    let v = new_vehicle(&engine);
    let err = engine
        .apply_transition(&v, "C", StationStatus::Completed, t0())
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { ref station, .. } if station == "C"));
}

#[test]
fn test_earlier_station_repair_keeps_current() {
    let engine = engine_abc();
    let v = new_vehicle(&engine);
    let v = engine
        .apply_transition(&v, "A", StationStatus::Completed, t0())
        .unwrap();
    let v = engine
        .apply_transition(&v, "A", StationStatus::RepairNeeded, t0())
        .unwrap();
    assert_eq!(v.current_station, "B");
    assert_eq!(v.status_at("A"), StationStatus::RepairNeeded);
    assert_eq!(v.status_at("B"), StationStatus::InProgress);
}

#[test]
fn test_unknown_station_and_status() {
    let engine = engine_abc();
    let v = new_vehicle(&engine);
    assert_eq!(
        engine.apply_transition(&v, "Z", StationStatus::Completed, t0()),
        Err(DomainError::UnknownStation("Z".to_string()))
    );
    assert!(matches!(
        engine.apply_transition(&v, "A", StationStatus::Unset, t0()),
        Err(DomainError::UnknownStatus(_))
    ));
}

#[test]
fn test_last_updated_at_never_goes_backwards() {
    let engine = engine_abc();
    let v = new_vehicle(&engine);
    let earlier = t0() - Duration::hours(2);
    let v2 = engine
        .apply_transition(&v, "A", StationStatus::Completed, earlier)
        .unwrap();
    assert_eq!(v2.last_updated_at, t0());
    assert_eq!(v2.progress("B").unwrap().updated_at, Some(t0()));
}

#[test]
fn test_last_station_completion_rejected_while_earlier_repair_open() {
    let engine = engine_abc();
    let mut v = new_vehicle(&engine);
    for (station, status) in [
        ("A", StationStatus::Completed),
        ("A", StationStatus::RepairNeeded),
        ("B", StationStatus::Completed),
    ] {
        v = engine.apply_transition(&v, station, status, t0()).unwrap();
    }
    assert_eq!(v.current_station, "C");

    let before = v.clone();
    let err = engine
        .apply_transition(&v, "C", StationStatus::Completed, t0())
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { ref station, .. } if station == "C"));
    assert_eq!(v, before);
    assert_eq!(v.current_status(), StationStatus::InProgress);

    // 前序返修完成后,最后工位可以完成
    let v = engine
        .apply_transition(&v, "A", StationStatus::Completed, t0())
        .unwrap();
    let v = engine
        .apply_transition(&v, "C", StationStatus::Completed, t0())
        .unwrap();
    assert!(v.is_fully_completed());
}

#[test]
fn test_fully_completed_vehicle_rejects_earlier_repair() {
    let engine = engine_abc();
    let mut v = new_vehicle(&engine);
    for station in ["A", "B", "C"] {
        v = engine
            .apply_transition(&v, station, StationStatus::Completed, t0())
            .unwrap();
    }

    let err = engine
        .apply_transition(&v, "A", StationStatus::RepairNeeded, t0())
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    // 最后工位本身仍可返修,当前工位状态随之变为返修
    let v = engine
        .apply_transition(&v, "C", StationStatus::RepairNeeded, t0())
        .unwrap();
    assert!(!v.is_fully_completed());
    assert_eq!(v.current_status(), StationStatus::RepairNeeded);
}
