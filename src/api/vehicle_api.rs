// ==========================================
// 整车产线流转跟踪系统 - 车辆 API
// ==========================================
// 职责: 车辆上线、工位状态更新（单车/批量）、删除、查询
// 输入: 操作员输入的原始字符串,由本层解析为领域类型
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::{StationStatus, VehicleModel};
use crate::domain::vehicle::VehicleRecord;
use crate::engine::filter::VehicleFilter;
use crate::repository::vehicle_repo::VehicleRecordStore;

// ==========================================
// 批量更新结果
// ==========================================

/// 批量更新中失败的单车
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub vehicle_id: String,
    pub code: String,
    pub message: String,
}

/// 批量更新报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpdateReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkUpdateReport {
    pub fn is_all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

// ==========================================
// VehicleApi - 车辆 API
// ==========================================
pub struct VehicleApi {
    store: Arc<VehicleRecordStore>,
}

impl VehicleApi {
    pub fn new(store: Arc<VehicleRecordStore>) -> Self {
        Self { store }
    }

    // ==========================================
    // 写操作
    // ==========================================

    /// 车辆上线
    ///
    /// # 参数
    /// - vehicle_id: 车辆编号（自动去空白并转大写）
    /// - model: 车型（如 "C43"）
    /// - start_date: 上线日期 YYYY-MM-DD,为空时取当前时间
    ///
    /// # 返回
    /// - Err(InvalidInput): 编号/车型/日期格式错误
    /// - Err(AlreadyExists): 编号已存在
    pub fn add_vehicle(
        &self,
        vehicle_id: &str,
        model: &str,
        start_date: Option<&str>,
    ) -> ApiResult<VehicleRecord> {
        let model = VehicleModel::from_db_str(model)?;
        let start_date = match start_date.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => Some(parse_date(raw)?),
        };

        let record = self
            .store
            .add_vehicle(vehicle_id, model, start_date, Utc::now())?;
        info!(vehicle_id = %record.id, "车辆已上线");
        Ok(record)
    }

    /// 更新单车某工位状态
    ///
    /// # 返回
    /// - Err(UnknownStation / UnknownStatus): 工位或状态无法识别
    /// - Err(InvalidStateTransition): 违反流转规则,记录不变
    pub fn update_status(
        &self,
        vehicle_id: &str,
        station: &str,
        status: &str,
    ) -> ApiResult<VehicleRecord> {
        let status = StationStatus::parse_target(status)?;
        let updated = self
            .store
            .transition(vehicle_id, station.trim(), status, Utc::now())?;
        Ok(updated)
    }

    /// 批量更新工位状态
    ///
    /// 工位或状态本身无法识别时整批拒绝；单车失败不影响其他车辆
    pub fn bulk_update_status(
        &self,
        vehicle_ids: &[String],
        station: &str,
        status: &str,
    ) -> ApiResult<BulkUpdateReport> {
        if vehicle_ids.is_empty() {
            return Err(ApiError::InvalidInput("未选择任何车辆".to_string()));
        }
        let status = StationStatus::parse_target(status)?;
        let station = station.trim();
        if !self.store.sequence().contains(station) {
            return Err(ApiError::UnknownStation(station.to_string()));
        }

        let outcomes = self
            .store
            .bulk_update(vehicle_ids, station, status, Utc::now())?;

        let mut report = BulkUpdateReport::default();
        for outcome in outcomes {
            match outcome.result {
                Ok(_) => report.succeeded.push(outcome.id),
                Err(e) => {
                    let api_err = ApiError::from(e);
                    report.failed.push(BulkFailure {
                        vehicle_id: outcome.id,
                        code: api_err.code().to_string(),
                        message: api_err.to_string(),
                    });
                }
            }
        }

        if !report.is_all_succeeded() {
            warn!(
                station,
                succeeded = report.succeeded.len(),
                failed = report.failed.len(),
                "批量更新部分失败"
            );
        }
        Ok(report)
    }

    /// 删除车辆
    pub fn delete_vehicle(&self, vehicle_id: &str) -> ApiResult<()> {
        self.store.delete(vehicle_id)?;
        Ok(())
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn get_vehicle(&self, vehicle_id: &str) -> ApiResult<VehicleRecord> {
        Ok(self.store.get(vehicle_id)?)
    }

    /// 查询车辆列表
    ///
    /// # 参数
    /// - status: 状态过滤（"Completed" 表示全部完工,其余按当前工位状态）
    /// - station: 当前工位过滤
    /// - search: 编号子串（不区分大小写）
    pub fn list_vehicles(
        &self,
        status: Option<&str>,
        station: Option<&str>,
        search: Option<&str>,
    ) -> ApiResult<Vec<VehicleRecord>> {
        let filter = self.build_filter(status, station, search)?;
        Ok(self.store.list(&filter)?)
    }

    /// 由原始输入构建过滤条件（空白输入视为不过滤）
    pub fn build_filter(
        &self,
        status: Option<&str>,
        station: Option<&str>,
        search: Option<&str>,
    ) -> ApiResult<VehicleFilter> {
        let mut filter = VehicleFilter::all();
        if let Some(raw) = status.map(str::trim).filter(|s| !s.is_empty()) {
            filter = filter.with_status(StationStatus::parse_target(raw)?);
        }
        if let Some(raw) = station.map(str::trim).filter(|s| !s.is_empty()) {
            if !self.store.sequence().contains(raw) {
                return Err(ApiError::UnknownStation(raw.to_string()));
            }
            filter = filter.at_station(raw);
        }
        if let Some(raw) = search.map(str::trim).filter(|s| !s.is_empty()) {
            filter = filter.id_contains(raw);
        }
        Ok(filter)
    }

    /// 工位列表（按流转顺序）
    pub fn list_stations(&self) -> Vec<String> {
        self.store.sequence().as_slice().to_vec()
    }

    /// 丢弃缓存,下次读取时从后端重新加载
    pub fn reload(&self) {
        self.store.invalidate();
    }
}

fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ApiError::InvalidInput(format!("日期格式错误 '{}': {}", raw, e)))
}
