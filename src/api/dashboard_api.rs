// ==========================================
// 整车产线流转跟踪系统 - 看板 API
// ==========================================
// 职责: 每日汇总、工位负载、完工趋势、明细导出
// 红线: 只读,不修改任何车辆记录
// ==========================================

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::engine::filter::VehicleFilter;
use crate::engine::summary::{CompletionPoint, DashboardSummary, ProductionSummary, StationLoad};
use crate::export::ExportTable;
use crate::repository::vehicle_repo::VehicleRecordStore;

pub struct DashboardApi {
    store: Arc<VehicleRecordStore>,
}

impl DashboardApi {
    pub fn new(store: Arc<VehicleRecordStore>) -> Self {
        Self { store }
    }

    /// 每日汇总（today 为空时取当前 UTC 日期）
    pub fn get_daily_summary(&self, today: Option<NaiveDate>) -> ApiResult<DashboardSummary> {
        let today = today.unwrap_or_else(|| Utc::now().date_naive());
        let records = self.store.snapshot()?;
        Ok(ProductionSummary::daily(&records, today))
    }

    /// 各工位当前车辆数（按工位顺序,含 0）
    pub fn get_station_load(&self) -> ApiResult<Vec<StationLoad>> {
        let records = self.store.snapshot()?;
        Ok(ProductionSummary::station_load(&records, self.store.sequence()))
    }

    /// 按日完工趋势
    pub fn get_completion_trend(&self) -> ApiResult<Vec<CompletionPoint>> {
        let records = self.store.snapshot()?;
        Ok(ProductionSummary::completion_trend(&records))
    }

    /// 生成明细导出表格（按过滤条件,保持表格顺序）
    pub fn build_export(&self, filter: &VehicleFilter) -> ApiResult<ExportTable> {
        let records = self.store.list(filter)?;
        Ok(ExportTable::build(&records, self.store.sequence()))
    }

    /// 导出明细到 CSV 文件
    ///
    /// # 返回
    /// - Ok(usize): 导出的车辆数
    pub fn export_csv<P: AsRef<Path>>(&self, path: P, filter: &VehicleFilter) -> ApiResult<usize> {
        let table = self.build_export(filter)?;
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            ApiError::InternalError(format!("无法创建导出文件 {}: {}", path.display(), e))
        })?;
        table
            .write_csv(BufWriter::new(file))
            .map_err(|e| ApiError::InternalError(format!("导出写入失败: {}", e)))?;

        info!(path = %path.display(), rows = table.rows.len(), "明细已导出");
        Ok(table.rows.len())
    }
}
