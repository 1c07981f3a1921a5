// ==========================================
// 整车产线流转跟踪系统 - 状态流转引擎
// ==========================================
// 职责: 校验并应用单车工位状态变更,完成时自动推进到下一工位
// 红线: 纯逻辑,无 I/O；先校验后应用,失败时不产生任何修改
// ==========================================
// 流转策略（严格前向）:
// 1. 已通过的工位不允许回退为进行中
// 2. 尚未到达的工位不允许设置任何状态
// 3. 当前工位完成 → 推进至下一工位并置为进行中
// 4. 最后工位完成 → 不再推进,车辆全部完成
//    前序工位仍有未完成（返修中）时拒绝,当前工位必须保持进行中/返修
// 5. 当前工位置为返修/进行中 → 只更新状态与时间
// 6. 全部完成的车辆不允许将前序工位改为返修（当前工位状态须为已完成）
// ==========================================

use crate::domain::error::DomainError;
use crate::domain::station::StationSequence;
use crate::domain::types::StationStatus;
use crate::domain::vehicle::VehicleRecord;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==========================================
// TransitionEngine - 状态流转引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct TransitionEngine {
    sequence: Arc<StationSequence>,
}

impl TransitionEngine {
    pub fn new(sequence: Arc<StationSequence>) -> Self {
        Self { sequence }
    }

    pub fn sequence(&self) -> &StationSequence {
        &self.sequence
    }

    /// 应用一次工位状态变更
    ///
    /// # 参数
    /// - record: 现有车辆记录（不会被修改）
    /// - target_station: 目标工位
    /// - new_status: 新状态（InProgress / Completed / RepairNeeded）
    /// - now: 变更时间
    ///
    /// # 返回
    /// - Ok(VehicleRecord): 变更后的新记录
    /// - Err(UnknownStation): 目标工位不在序列中
    /// - Err(UnknownStatus): 目标状态为 Unset
    /// - Err(InvalidTransition): 违反前向流转规则
    ///
    /// # 时间
    /// last_updated_at 单调不减：now 早于记录中的时间时沿用原值
    pub fn apply_transition(
        &self,
        record: &VehicleRecord,
        target_station: &str,
        new_status: StationStatus,
        now: DateTime<Utc>,
    ) -> Result<VehicleRecord, DomainError> {
        // === 步骤 1: 校验 ===
        let target_idx = self.sequence.index_of(target_station)?;
        if !new_status.is_set() {
            return Err(DomainError::UnknownStatus(format!("{:?}", new_status)));
        }
        let current_idx = self.sequence.index_of(&record.current_station)?;

        match target_idx.cmp(&current_idx) {
            Ordering::Less if new_status == StationStatus::InProgress => {
                return Err(self.invalid(
                    record,
                    target_station,
                    new_status,
                    "已通过的工位不允许回退为进行中",
                ));
            }
            Ordering::Less
                if new_status != StationStatus::Completed && record.is_fully_completed() =>
            {
                return Err(self.invalid(
                    record,
                    target_station,
                    new_status,
                    "车辆已全部完成,前序工位不允许返修",
                ));
            }
            Ordering::Greater => {
                return Err(self.invalid(record, target_station, new_status, "工位尚未到达"));
            }
            Ordering::Equal
                if new_status == StationStatus::Completed
                    && self.sequence.is_last(target_station)
                    && self.has_unfinished_before(record, target_idx) =>
            {
                return Err(self.invalid(
                    record,
                    target_station,
                    new_status,
                    "前序工位尚未全部完成,最后工位不允许完成",
                ));
            }
            _ => {}
        }

        // === 步骤 2: 在副本上应用 ===
        let stamp = if now < record.last_updated_at {
            warn!(
                vehicle_id = %record.id,
                now = %now,
                last_updated_at = %record.last_updated_at,
                "变更时间早于最近修改时间,沿用最近修改时间"
            );
            record.last_updated_at
        } else {
            now
        };

        let mut updated = record.clone();
        set_station(&mut updated, target_station, new_status, stamp)?;
        updated.last_updated_at = stamp;

        // === 步骤 3: 当前工位完成 → 自动推进 ===
        if new_status == StationStatus::Completed && target_idx == current_idx {
            match self.sequence.next_after(target_station)? {
                Some(next) => {
                    set_station(&mut updated, next, StationStatus::InProgress, stamp)?;
                    updated.current_station = next.to_string();
                    debug!(
                        vehicle_id = %updated.id,
                        from = target_station,
                        to = next,
                        "工位完成,推进至下一工位"
                    );
                }
                None => {
                    info!(vehicle_id = %updated.id, "车辆全部工位已完成");
                }
            }
        }

        Ok(updated)
    }

    fn has_unfinished_before(&self, record: &VehicleRecord, idx: usize) -> bool {
        self.sequence
            .iter()
            .take(idx)
            .any(|station| record.status_at(station) != StationStatus::Completed)
    }

    fn invalid(
        &self,
        record: &VehicleRecord,
        station: &str,
        status: StationStatus,
        reason: &str,
    ) -> DomainError {
        DomainError::InvalidTransition {
            vehicle_id: record.id.clone(),
            station: station.to_string(),
            status: status.to_string(),
            current_station: record.current_station.clone(),
            reason: reason.to_string(),
        }
    }
}

fn set_station(
    record: &mut VehicleRecord,
    station: &str,
    status: StationStatus,
    at: DateTime<Utc>,
) -> Result<(), DomainError> {
    let progress = record
        .progress_mut(station)
        .ok_or_else(|| DomainError::UnknownStation(station.to_string()))?;
    progress.status = status;
    progress.updated_at = Some(at);
    Ok(())
}

#[cfg(test)]
mod tests;
