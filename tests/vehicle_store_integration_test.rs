// ==========================================
// 车辆记录仓储集成测试
// ==========================================
// 测试范围:
// 1. SQLite / CSV 后端整表覆写后重新打开,记录完整恢复
// 2. 标准 14 工位全流程流转
// 3. 后端表格与工位配置不一致时打开失败
// ==========================================


use chrono::Duration;
use std::sync::Arc;
use tempfile::TempDir;
use vehicle_flow_tracker::domain::{StationStatus, VehicleModel};
use vehicle_flow_tracker::engine::VehicleFilter;
use vehicle_flow_tracker::repository::{
    CsvSheetBackend, RepositoryError, SheetBackend, SqliteSheetBackend, StoreOptions,
    VehicleRecordStore,
};

use test_helpers::{base_time, create_test_db, full_line, open_test_connection, short_line};

// ==========================================
// 持久化往返
// ==========================================

#[test]
fn test_sqlite_backend_survives_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let conn = open_test_connection(&db_path).unwrap();
    let t0 = base_time();

    {
        let backend = Arc::new(SqliteSheetBackend::from_connection(conn.clone()).unwrap());
        let store = VehicleRecordStore::open(backend, short_line(), StoreOptions::default())
            .unwrap();
        store.add_vehicle("AB123", VehicleModel::C43, None, t0).unwrap();
        store.add_vehicle("CD456", VehicleModel::C43, None, t0).unwrap();
        store
            .transition("AB123", "Body Shop", StationStatus::Completed, t0 + Duration::hours(1))
            .unwrap();
        store
            .transition("CD456", "Body Shop", StationStatus::RepairNeeded, t0 + Duration::hours(2))
            .unwrap();
    }

    // 新连接重新打开
    let backend = Arc::new(SqliteSheetBackend::new(&db_path).unwrap());
    let store = VehicleRecordStore::open(backend, short_line(), StoreOptions::default()).unwrap();

    let ids: Vec<String> = store
        .list(&VehicleFilter::all())
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["AB123", "CD456"]);

    let ab = store.get("ab123").unwrap();
    assert_eq!(ab.current_station, "Paint");
    assert_eq!(ab.status_at("Body Shop"), StationStatus::Completed);
    assert_eq!(ab.status_at("Paint"), StationStatus::InProgress);
    assert_eq!(ab.last_updated_at, t0 + Duration::hours(1));
    assert_eq!(
        ab.progress("Paint").and_then(|p| p.updated_at),
        Some(t0 + Duration::hours(1))
    );

    let cd = store.get("CD456").unwrap();
    assert_eq!(cd.current_station, "Body Shop");
    assert_eq!(cd.current_status(), StationStatus::RepairNeeded);
}

#[test]
fn test_csv_backend_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vehicles.csv");
    let t0 = base_time();

    {
        let store = VehicleRecordStore::open(
            Arc::new(CsvSheetBackend::new(&path)),
            short_line(),
            StoreOptions::default(),
        )
        .unwrap();
        store.add_vehicle("AB123", VehicleModel::C43, None, t0).unwrap();
        store.add_vehicle("CD456", VehicleModel::C43, None, t0).unwrap();
        store.delete("AB123").unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("id,model,current_station,started_at,last_updated_at,"));
    assert!(!text.contains("AB123"));

    let store = VehicleRecordStore::open(
        Arc::new(CsvSheetBackend::new(&path)),
        short_line(),
        StoreOptions::default(),
    )
    .unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.get("CD456").unwrap().started_at, t0);
}

// ==========================================
// 标准产线全流程
// ==========================================

#[test]
fn test_full_line_walkthrough() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let backend = Arc::new(SqliteSheetBackend::new(&db_path).unwrap());
    let line = full_line();
    let store = VehicleRecordStore::open(backend, line.clone(), StoreOptions::default()).unwrap();

    let mut now = base_time();
    store.add_vehicle("VF001", VehicleModel::C43, None, now).unwrap();

    for (i, station) in line.iter().enumerate() {
        now += Duration::minutes(30);
        let record = store
            .transition("VF001", station, StationStatus::Completed, now)
            .unwrap();
        match line.as_slice().get(i + 1) {
            Some(next) => {
                assert_eq!(&record.current_station, next);
                assert_eq!(record.current_status(), StationStatus::InProgress);
            }
            None => {
                assert_eq!(record.current_station, line.last());
                assert!(record.is_fully_completed());
            }
        }
    }

    let done = store
        .list(&VehicleFilter::all().with_status(StationStatus::Completed))
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].last_updated_at, now);
}

// ==========================================
// 表格与配置不一致
// ==========================================

#[test]
fn test_open_rejects_table_with_different_stations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vehicles.csv");

    VehicleRecordStore::open(
        Arc::new(CsvSheetBackend::new(&path)),
        short_line(),
        StoreOptions::default(),
    )
    .unwrap();

    // 同一文件换成 14 工位配置 → 缺少必需列
    let err = VehicleRecordStore::open(
        Arc::new(CsvSheetBackend::new(&path)),
        full_line(),
        StoreOptions::default(),
    )
    .err()
    .expect("工位不一致时应打开失败");
    assert!(matches!(err, RepositoryError::TableFormat { row: 1, .. }));
    assert!(err.is_persistence());
}

#[test]
fn test_corrupted_cell_reports_row_number() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vehicles.csv");
    let backend = Arc::new(CsvSheetBackend::new(&path));

    {
        let store =
            VehicleRecordStore::open(backend.clone(), short_line(), StoreOptions::default())
                .unwrap();
        store
            .add_vehicle("AB123", VehicleModel::C43, None, base_time())
            .unwrap();
    }

    let mut rows = backend.read_all().unwrap();
    // 第 2 行（首条数据）的当前工位改为未知值
    rows[1][2] = "Moon Base".to_string();
    backend.overwrite(&rows).unwrap();

    let err = VehicleRecordStore::open(backend, short_line(), StoreOptions::default())
        .err()
        .expect("损坏的表格应打开失败");
    assert!(matches!(err, RepositoryError::TableFormat { row: 2, .. }));
}
