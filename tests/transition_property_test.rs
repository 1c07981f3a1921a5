// ==========================================
// 状态流转属性测试
// ==========================================
// 不变量:
// 1. 编号归一化幂等
// 2. 当前工位完成 → 推进到下一工位（或停在末工位）
// 3. 已通过工位不能回退为进行中,未到达工位不能设置
// 4. 任意合法操作序列后 last_updated_at 不减、当前工位不后退
// 5. 未全部完成时当前工位为进行中或返修,当前工位之后的工位均未设置
// ==========================================


use chrono::Duration;
use std::sync::Arc;
use proptest::prelude::*;
use vehicle_flow_tracker::domain::{
    validate_id, DomainError, StationSequence, StationStatus, VehicleModel, VehicleRecord,
};
use vehicle_flow_tracker::engine::TransitionEngine;

use test_helpers::{base_time, full_line, short_line};

fn status_strategy() -> impl Strategy<Value = StationStatus> {
    prop_oneof![
        Just(StationStatus::InProgress),
        Just(StationStatus::Completed),
        Just(StationStatus::RepairNeeded),
    ]
}

/// 当前工位相关的记录不变量
fn check_current_station(
    line: &StationSequence,
    record: &VehicleRecord,
) -> Result<(), TestCaseError> {
    let current = record.current_status();
    if record.is_fully_completed() {
        prop_assert!(line.is_last(&record.current_station));
        prop_assert!(line.iter().all(|s| record.status_at(s) == StationStatus::Completed));
    } else {
        prop_assert!(
            current == StationStatus::InProgress || current == StationStatus::RepairNeeded,
            "current {} is {:?} but record is not fully completed",
            record.current_station,
            current
        );
    }

    let current_idx = line.index_of(&record.current_station).unwrap();
    prop_assert!(line
        .iter()
        .skip(current_idx + 1)
        .all(|s| record.status_at(s) == StationStatus::Unset));
    Ok(())
}

/// 随机操作序列：失败时记录不变,成功时时间不减、当前工位最多前进一步
fn run_random_ops(
    line: Arc<StationSequence>,
    ops: Vec<(usize, StationStatus, i64)>,
) -> Result<(), TestCaseError> {
    let engine = TransitionEngine::new(line.clone());
    let t0 = base_time();
    let mut record = VehicleRecord::new("VF001".into(), VehicleModel::C43, t0, t0, &line);
    check_current_station(&line, &record)?;

    for (station_idx, status, minutes) in ops {
        let station = line.as_slice()[station_idx % line.len()].clone();
        let before = record.clone();
        match engine.apply_transition(&record, &station, status, t0 + Duration::minutes(minutes)) {
            Ok(next) => record = next,
            Err(_) => {
                prop_assert_eq!(&record, &before);
                continue;
            }
        }

        prop_assert!(record.last_updated_at >= before.last_updated_at);
        let before_idx = line.index_of(&before.current_station).unwrap();
        let after_idx = line.index_of(&record.current_station).unwrap();
        prop_assert!(after_idx >= before_idx);
        prop_assert!(after_idx <= before_idx + 1);
        check_current_station(&line, &record)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_validate_id_is_idempotent(raw in "[ a-zA-Z0-9]{0,8}") {
        if let Ok(id) = validate_id(&raw) {
            prop_assert_eq!(validate_id(&id), Ok(id.clone()));
            prop_assert_eq!(id.len(), 5);
            prop_assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn prop_completing_current_advances(steps in 0usize..14) {
        let line = full_line();
        let engine = TransitionEngine::new(line.clone());
        let t0 = base_time();
        let mut record = VehicleRecord::new("VF001".into(), VehicleModel::C43, t0, t0, &line);

        for _ in 0..steps {
            let current = record.current_station.clone();
            record = engine
                .apply_transition(&record, &current, StationStatus::Completed, t0)
                .unwrap();
        }

        let idx = line.index_of(&record.current_station).unwrap();
        prop_assert_eq!(idx, steps.min(line.len() - 1));
        if steps < line.len() {
            prop_assert_eq!(record.current_status(), StationStatus::InProgress);
        }
    }

    #[test]
    fn prop_earlier_in_progress_and_future_rejected(advance in 1usize..13) {
        let line = full_line();
        let engine = TransitionEngine::new(line.clone());
        let t0 = base_time();
        let mut record = VehicleRecord::new("VF001".into(), VehicleModel::C43, t0, t0, &line);
        for _ in 0..advance {
            let current = record.current_station.clone();
            record = engine
                .apply_transition(&record, &current, StationStatus::Completed, t0)
                .unwrap();
        }

        let earlier = line.as_slice()[advance - 1].clone();
        let rejected = engine.apply_transition(&record, &earlier, StationStatus::InProgress, t0);
        let is_invalid = matches!(rejected, Err(DomainError::InvalidTransition { .. }));
        prop_assert!(is_invalid);

        let future = line.as_slice()[advance + 1].clone();
        let rejected = engine.apply_transition(&record, &future, StationStatus::Completed, t0);
        let is_invalid = matches!(rejected, Err(DomainError::InvalidTransition { .. }));
        prop_assert!(is_invalid);
    }

    #[test]
    fn prop_random_ops_keep_monotonic(
        ops in proptest::collection::vec((0usize..14, status_strategy(), -60i64..120), 1..40)
    ) {
        run_random_ops(full_line(), ops)?;
    }

    #[test]
    fn prop_random_ops_on_short_line_keep_current_station(
        ops in proptest::collection::vec((0usize..3, status_strategy(), -60i64..120), 1..60)
    ) {
        // 三工位产线上随机序列能频繁走到末工位,覆盖返修后完成末工位的路径
        run_random_ops(short_line(), ops)?;
    }
}
