// ==========================================
// 整车产线流转跟踪系统 - 车辆过滤条件
// ==========================================
// 口径:
// - 状态=Completed 表示"全部工位已完成"
// - 其他状态值按"当前工位状态"比较
// ==========================================

use crate::domain::types::StationStatus;
use crate::domain::vehicle::VehicleRecord;
use serde::{Deserialize, Serialize};

/// 车辆过滤条件（各条件之间为"与"关系,None 表示不过滤）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleFilter {
    pub status: Option<StationStatus>,
    pub current_station: Option<String>,
    pub id_contains: Option<String>,
}

impl VehicleFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn at_station(mut self, station: impl Into<String>) -> Self {
        self.current_station = Some(station.into());
        self
    }

    pub fn id_contains(mut self, fragment: impl Into<String>) -> Self {
        self.id_contains = Some(fragment.into());
        self
    }

    pub fn matches(&self, record: &VehicleRecord) -> bool {
        let status_ok = match self.status {
            None => true,
            Some(StationStatus::Completed) => record.is_fully_completed(),
            Some(status) => record.current_status() == status,
        };

        let station_ok = self
            .current_station
            .as_deref()
            .map_or(true, |s| record.current_station == s);

        // 编号已归一化为大写,子串匹配不区分大小写
        let id_ok = self.id_contains.as_deref().map_or(true, |fragment| {
            record.id.contains(&fragment.trim().to_uppercase())
        });

        status_ok && station_ok && id_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::StationSequence;
    use crate::domain::types::VehicleModel;
    use crate::engine::transition::TransitionEngine;
    use chrono::Utc;
    use std::sync::Arc;

    #[test]
    fn test_completed_means_fully_completed() {
        let engine = TransitionEngine::new(Arc::new(StationSequence::new(["A", "B"]).unwrap()));
        let now = Utc::now();
        let v = VehicleRecord::new("AB123".into(), VehicleModel::C43, now, now, engine.sequence());

        // A 完成后当前工位为 B（进行中）,不应匹配 Completed
        let half = engine
            .apply_transition(&v, "A", StationStatus::Completed, now)
            .unwrap();
        let completed = VehicleFilter::all().with_status(StationStatus::Completed);
        assert!(!completed.matches(&half));

        let done = engine
            .apply_transition(&half, "B", StationStatus::Completed, now)
            .unwrap();
        assert!(completed.matches(&done));
        assert!(!VehicleFilter::all()
            .with_status(StationStatus::InProgress)
            .matches(&done));
    }

    #[test]
    fn test_station_and_id_filters() {
        let seq = StationSequence::new(["A", "B"]).unwrap();
        let now = Utc::now();
        let v = VehicleRecord::new("AB123".into(), VehicleModel::C43, now, now, &seq);

        assert!(VehicleFilter::all().at_station("A").matches(&v));
        assert!(!VehicleFilter::all().at_station("B").matches(&v));
        assert!(VehicleFilter::all().id_contains("b12").matches(&v));
        assert!(!VehicleFilter::all().id_contains("ZZ").matches(&v));
        assert!(VehicleFilter::all()
            .with_status(StationStatus::InProgress)
            .at_station("A")
            .matches(&v));
    }
}
