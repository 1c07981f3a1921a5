// ==========================================
// 整车产线流转跟踪系统 - 明细导出
// ==========================================
// 职责: 生成带状态样式的明细表格快照
// 列: 除各工位 _time 列与 started_at 外的全部列
// 列宽: 该列最长文本（含表头）+ 2
// 红线: 只输出语义样式,颜色由外部渲染层映射
// ==========================================

use crate::domain::station::StationSequence;
use crate::domain::types::StationStatus;
use crate::domain::vehicle::VehicleRecord;
use crate::repository::table_codec::{columns, format_timestamp};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// 列宽在最长文本基础上的留白
const WIDTH_PADDING: usize = 2;

/// 单元格语义样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellStyle {
    None,
    Completed,
    InProgress,
    RepairNeeded,
}

impl From<StationStatus> for CellStyle {
    fn from(status: StationStatus) -> Self {
        match status {
            StationStatus::Unset => CellStyle::None,
            StationStatus::InProgress => CellStyle::InProgress,
            StationStatus::Completed => CellStyle::Completed,
            StationStatus::RepairNeeded => CellStyle::RepairNeeded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCell {
    pub value: String,
    pub style: CellStyle,
}

impl ExportCell {
    fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            style: CellStyle::None,
        }
    }
}

// ==========================================
// ExportTable - 导出表格
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ExportCell>>,
    pub column_widths: Vec<usize>,
}

impl ExportTable {
    /// 默认工作表名
    pub const SHEET_NAME: &'static str = "Vehicle Details";

    /// 由车辆记录构建导出表格（行顺序与输入一致）
    pub fn build(records: &[VehicleRecord], sequence: &StationSequence) -> Self {
        let mut headers = vec![
            columns::ID.to_string(),
            columns::MODEL.to_string(),
            columns::CURRENT_STATION.to_string(),
            columns::LAST_UPDATED_AT.to_string(),
        ];
        headers.extend(sequence.iter().map(str::to_string));

        let rows: Vec<Vec<ExportCell>> = records
            .iter()
            .map(|record| {
                let mut row = vec![
                    ExportCell::plain(record.id.as_str()),
                    ExportCell::plain(record.model.to_db_str()),
                    ExportCell::plain(record.current_station.as_str()),
                    ExportCell::plain(format_timestamp(&record.last_updated_at)),
                ];
                row.extend(sequence.iter().map(|station| {
                    let status = record.status_at(station);
                    ExportCell {
                        value: status.to_db_str().to_string(),
                        style: status.into(),
                    }
                }));
                row
            })
            .collect();

        let column_widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let longest = rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.value.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                longest + WIDTH_PADDING
            })
            .collect();

        Self {
            sheet_name: Self::SHEET_NAME.to_string(),
            headers,
            rows,
            column_widths,
        }
    }

    /// 以 CSV 写出（只含文本,样式由调用方另行渲染）
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell.value.as_str()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
