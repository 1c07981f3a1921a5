// ==========================================
// 整车产线流转跟踪系统 - 工位序列
// ==========================================
// 职责: 固定有序的生产工位列表（启动时加载一次,只读）
// 红线: 不允许重复工位,顺序即车辆唯一可走的路径
// ==========================================

use crate::domain::error::DomainError;
use serde::Serialize;
use std::collections::HashSet;

/// 默认产线工位（14 个,按流转顺序）
pub const DEFAULT_PRODUCTION_LINES: [&str; 14] = [
    "Body Shop",
    "Paint",
    "TRIM",
    "UB",
    "FINAL",
    "Odyssi",
    "Wheel Alignment",
    "ADAS",
    "PQG",
    "Tests Track",
    "CC4",
    "DVX",
    "Audit",
    "Delivery",
];

// ==========================================
// StationSequence - 工位序列
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationSequence {
    stations: Vec<String>,
}

impl StationSequence {
    /// 构建工位序列
    ///
    /// # 校验
    /// - 至少一个工位
    /// - 工位名去除首尾空白后非空且不重复
    pub fn new<I, S>(stations: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut list = Vec::new();

        for raw in stations {
            let name = raw.as_ref().trim().to_string();
            if name.is_empty() || !seen.insert(name.clone()) {
                return Err(DomainError::InvalidStationName(raw.as_ref().to_string()));
            }
            list.push(name);
        }

        if list.is_empty() {
            return Err(DomainError::EmptyStationSequence);
        }

        Ok(Self { stations: list })
    }

    /// 默认 14 工位产线
    pub fn production_default() -> Self {
        Self {
            stations: DEFAULT_PRODUCTION_LINES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 工位在序列中的位置
    pub fn index_of(&self, station: &str) -> Result<usize, DomainError> {
        self.stations
            .iter()
            .position(|s| s == station)
            .ok_or_else(|| DomainError::UnknownStation(station.to_string()))
    }

    /// 下一工位（最后一个工位返回 None）
    pub fn next_after(&self, station: &str) -> Result<Option<&str>, DomainError> {
        let idx = self.index_of(station)?;
        Ok(self.stations.get(idx + 1).map(String::as_str))
    }

    pub fn first(&self) -> &str {
        &self.stations[0]
    }

    pub fn last(&self) -> &str {
        &self.stations[self.stations.len() - 1]
    }

    pub fn is_last(&self, station: &str) -> bool {
        self.last() == station
    }

    pub fn contains(&self, station: &str) -> bool {
        self.stations.iter().any(|s| s == station)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.stations
    }
}
