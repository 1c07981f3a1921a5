// ==========================================
// 整车产线流转跟踪系统 - 驾驶舱统计
// ==========================================
// 职责: 为看板提供只读统计数据（每日汇总/工位负载/完工趋势）
// 红线: 只产出数据,不负责图表绘制
// ==========================================

use crate::domain::station::StationSequence;
use crate::domain::vehicle::VehicleRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// 统计结果类型
// ==========================================

/// 每日汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub added_today: usize,     // 今日上线车辆数
    pub completed_today: usize, // 今日全部完工车辆数
    pub in_progress: usize,     // 仍在流转中的车辆数
}

/// 工位负载（当前停留在该工位的车辆数）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationLoad {
    pub station: String,
    pub vehicle_count: usize,
}

/// 完工趋势数据点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPoint {
    pub date: NaiveDate,
    pub completed_count: usize,
}

// ==========================================
// ProductionSummary - 统计计算
// ==========================================
pub struct ProductionSummary;

impl ProductionSummary {
    /// 计算每日汇总
    ///
    /// # 口径
    /// - added_today: started_at 日期 = today
    /// - completed_today: 全部完工且 last_updated_at 日期 = today
    /// - in_progress: 未全部完工
    pub fn daily(records: &[VehicleRecord], today: NaiveDate) -> DashboardSummary {
        let added_today = records
            .iter()
            .filter(|r| r.started_at.date_naive() == today)
            .count();
        let completed_today = records
            .iter()
            .filter(|r| r.is_fully_completed() && r.last_updated_at.date_naive() == today)
            .count();
        let in_progress = records.iter().filter(|r| !r.is_fully_completed()).count();

        DashboardSummary {
            added_today,
            completed_today,
            in_progress,
        }
    }

    /// 按工位序列统计当前工位车辆数（无车辆的工位计 0）
    pub fn station_load(records: &[VehicleRecord], sequence: &StationSequence) -> Vec<StationLoad> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *counts.entry(record.current_station.as_str()).or_insert(0) += 1;
        }

        sequence
            .iter()
            .map(|station| StationLoad {
                station: station.to_string(),
                vehicle_count: counts.get(station).copied().unwrap_or(0),
            })
            .collect()
    }

    /// 按完工日期（last_updated_at）统计全部完工车辆数,日期升序
    pub fn completion_trend(records: &[VehicleRecord]) -> Vec<CompletionPoint> {
        let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for record in records.iter().filter(|r| r.is_fully_completed()) {
            *by_date.entry(record.last_updated_at.date_naive()).or_insert(0) += 1;
        }

        by_date
            .into_iter()
            .map(|(date, completed_count)| CompletionPoint {
                date,
                completed_count,
            })
            .collect()
    }
}
