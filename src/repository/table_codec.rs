// ==========================================
// 整车产线流转跟踪系统 - 表格行编解码
// ==========================================
// 表头: id, model, current_station, started_at, last_updated_at,
//       然后每个工位依次为 <station>, <station>_time
// 时间: 写入 RFC 3339；读取同时接受不带时区的 ISO-8601（按 UTC 处理）
// 空串 = 未设置
// ==========================================

use crate::domain::station::StationSequence;
use crate::domain::types::{StationStatus, VehicleModel};
use crate::domain::vehicle::{StationProgress, VehicleRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::collections::{HashMap, HashSet};

/// 固定列
pub mod columns {
    pub const ID: &str = "id";
    pub const MODEL: &str = "model";
    pub const CURRENT_STATION: &str = "current_station";
    pub const STARTED_AT: &str = "started_at";
    pub const LAST_UPDATED_AT: &str = "last_updated_at";

    pub const FIXED: [&str; 5] = [ID, MODEL, CURRENT_STATION, STARTED_AT, LAST_UPDATED_AT];

    /// 工位时间列名
    pub fn station_time(station: &str) -> String {
        format!("{}_time", station)
    }
}

/// 一行表格数据
pub type Row = Vec<String>;

// ==========================================
// 时间格式
// ==========================================

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn format_optional_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(format_timestamp).unwrap_or_default()
}

/// 解析时间单元格
///
/// 依次尝试 RFC 3339、无时区日期时间、纯日期（零点）
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ==========================================
// TableCodec - 行 <-> 记录
// ==========================================
#[derive(Debug, Clone)]
pub struct TableCodec {
    headers: Row,
}

impl TableCodec {
    pub fn new(sequence: &StationSequence) -> Self {
        let mut headers: Row = columns::FIXED.iter().map(|s| s.to_string()).collect();
        for station in sequence.iter() {
            headers.push(station.to_string());
            headers.push(columns::station_time(station));
        }
        Self { headers }
    }

    /// 标准表头（写入时始终使用此顺序）
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 记录 → 行（与标准表头对齐）
    pub fn encode(&self, record: &VehicleRecord) -> Row {
        let mut row = vec![
            record.id.clone(),
            record.model.to_db_str().to_string(),
            record.current_station.clone(),
            format_timestamp(&record.started_at),
            format_timestamp(&record.last_updated_at),
        ];
        for progress in &record.stations {
            row.push(progress.status.to_db_str().to_string());
            row.push(format_optional_timestamp(progress.updated_at.as_ref()));
        }
        row
    }

    /// 整表编码（表头 + 全部记录）
    pub fn encode_table(&self, records: &[VehicleRecord]) -> Vec<Row> {
        let mut table = Vec::with_capacity(records.len() + 1);
        table.push(self.headers.clone());
        table.extend(records.iter().map(|r| self.encode(r)));
        table
    }

    /// 整表解码
    ///
    /// # 说明
    /// - 空表返回 Ok(vec![])
    /// - 列按表头名称定位,不依赖列顺序
    /// - 缺少必需列、单元格格式错误 → TableFormat 错误（不跳过）
    /// - 完全空白的行跳过
    /// - 车辆编号重复 → TableFormat 错误（报告后出现的那一行）
    pub fn decode_table(
        &self,
        table: &[Row],
        sequence: &StationSequence,
    ) -> RepositoryResult<Vec<VehicleRecord>> {
        let Some((header_row, data_rows)) = table.split_first() else {
            return Ok(Vec::new());
        };

        let index: HashMap<&str, usize> = header_row
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim(), i))
            .collect();

        if let Some(missing) = self.headers.iter().find(|h| !index.contains_key(h.as_str())) {
            return Err(RepositoryError::TableFormat {
                row: 1,
                message: format!("缺少必需列: {}", missing),
            });
        }

        let mut records = Vec::with_capacity(data_rows.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(data_rows.len());
        for (offset, row) in data_rows.iter().enumerate() {
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            // 表格行号从 1 开始,表头占第 1 行
            let row_number = offset + 2;
            let record = decode_row(row, row_number, &index, sequence)?;
            if !seen.insert(record.id.clone()) {
                return Err(RepositoryError::TableFormat {
                    row: row_number,
                    message: format!("车辆编号重复: {}", record.id),
                });
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn decode_row(
    row: &[String],
    row_number: usize,
    index: &HashMap<&str, usize>,
    sequence: &StationSequence,
) -> RepositoryResult<VehicleRecord> {
    let cell = |name: &str| -> &str {
        index
            .get(name)
            .and_then(|&i| row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    };
    let format_err = |message: String| RepositoryError::TableFormat {
        row: row_number,
        message,
    };

    let id = cell(columns::ID).to_uppercase();
    if id.is_empty() {
        return Err(format_err("车辆编号为空".to_string()));
    }

    let model = VehicleModel::from_db_str(cell(columns::MODEL))
        .map_err(|e| format_err(e.to_string()))?;

    let current_station = cell(columns::CURRENT_STATION).to_string();
    if !sequence.contains(&current_station) {
        return Err(format_err(format!("当前工位不在工位序列中: '{}'", current_station)));
    }

    let required_ts = |name: &str| -> RepositoryResult<DateTime<Utc>> {
        parse_timestamp(cell(name))
            .ok_or_else(|| format_err(format!("{} 时间格式错误: '{}'", name, cell(name))))
    };
    let started_at = required_ts(columns::STARTED_AT)?;
    let last_updated_at = required_ts(columns::LAST_UPDATED_AT)?;

    let mut stations = Vec::with_capacity(sequence.len());
    for station in sequence.iter() {
        let status =
            StationStatus::from_db_str(cell(station)).map_err(|e| format_err(e.to_string()))?;
        let time_col = columns::station_time(station);
        let raw_time = cell(&time_col);
        let updated_at = parse_timestamp(raw_time);
        if updated_at.is_none() && !raw_time.is_empty() {
            return Err(format_err(format!("{} 时间格式错误: '{}'", time_col, raw_time)));
        }
        stations.push(StationProgress {
            station: station.to_string(),
            status,
            updated_at,
        });
    }

    Ok(VehicleRecord {
        id,
        model,
        current_station,
        started_at,
        last_updated_at,
        stations,
    })
}
