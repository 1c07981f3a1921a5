// ==========================================
// 整车产线流转跟踪系统 - 车辆记录仓储
// ==========================================
// 红线: Repository 不含流转规则,流转由 TransitionEngine 计算
// 约束: 每次成功的 新增/修改/删除 都整表覆写后端
// 并发: 所有写操作经同一把进程内互斥锁串行化（读-改-整表写 原子）
//       读操作只克隆快照,不等待写操作的 I/O
//       缓存带代数: 读者仅在加载期间代数未变时才安装自己读到的表格
// 已知限制: 多进程同时写同一后端时后写覆盖先写（不处理）
// ==========================================

use crate::domain::error::DomainError;
use crate::domain::station::StationSequence;
use crate::domain::types::{StationStatus, VehicleModel};
use crate::domain::vehicle::{normalize_id, validate_id_with_len, VehicleRecord};
use crate::engine::filter::VehicleFilter;
use crate::engine::transition::TransitionEngine;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sheet_backend::SheetBackend;
use crate::repository::table_codec::TableCodec;
use anyhow::anyhow;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{debug, info, warn};

// ==========================================
// StoreOptions - 仓储参数
// ==========================================
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub vin_length: usize,          // 车辆编号长度
    pub cache_ttl: Option<Duration>, // 缓存有效期（None=写入前一直有效）
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            vin_length: crate::domain::vehicle::DEFAULT_VIN_LENGTH,
            cache_ttl: None,
        }
    }
}

// ==========================================
// TableCache - 已加载表格缓存
// ==========================================
// 规则: 读时缺失/过期则从后端加载；写成功后替换为写入的快照；写失败保持不变
#[derive(Debug, Clone)]
struct TableCache {
    records: Arc<Vec<VehicleRecord>>,
    loaded_at: DateTime<Utc>,
}

/// 缓存槽位
///
/// generation 在每次写入缓存或丢弃缓存时加一。读者在读后端之前记下代数,
/// 读完后代数已变化说明期间有写入或失效,读到的表格可能比缓存旧,不得安装
#[derive(Debug, Default)]
struct CacheSlot {
    generation: u64,
    table: Option<TableCache>,
}

/// 批量更新单车结果
#[derive(Debug)]
pub struct BulkOutcome {
    pub id: String,
    pub result: RepositoryResult<VehicleRecord>,
}

// ==========================================
// VehicleRecordStore - 车辆记录仓储
// ==========================================
pub struct VehicleRecordStore {
    backend: Arc<dyn SheetBackend>,
    engine: TransitionEngine,
    codec: TableCodec,
    options: StoreOptions,
    cache: RwLock<CacheSlot>,
    write_lock: Mutex<()>,
}

impl VehicleRecordStore {
    /// 打开仓储
    ///
    /// # 说明
    /// - 后端为完全空表时,只写入表头行
    /// - 打开时加载一次表格并校验格式,失败直接返回错误
    pub fn open(
        backend: Arc<dyn SheetBackend>,
        sequence: Arc<StationSequence>,
        options: StoreOptions,
    ) -> RepositoryResult<Self> {
        let codec = TableCodec::new(&sequence);
        let store = Self {
            backend,
            engine: TransitionEngine::new(sequence),
            codec,
            options,
            cache: RwLock::new(CacheSlot::default()),
            write_lock: Mutex::new(()),
        };

        {
            let _guard = store.lock_writes()?;
            let rows = store.backend.read_all()?;
            if rows.is_empty() {
                info!(backend = %store.backend.describe(), "后端表格为空,写入表头");
                store.backend.overwrite(&store.codec.encode_table(&[]))?;
            }
        }

        let records = store.snapshot()?;
        info!(
            backend = %store.backend.describe(),
            vehicles = records.len(),
            "车辆记录仓储已打开"
        );
        Ok(store)
    }

    pub fn sequence(&self) -> &StationSequence {
        self.engine.sequence()
    }

    fn lock_writes(&self) -> RepositoryResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 缓存
    // ==========================================

    /// 最近一次加载/写入缓存的时间（无缓存时为 None）
    pub fn cache_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.cache
            .read()
            .ok()
            .and_then(|slot| slot.table.as_ref().map(|c| c.loaded_at))
    }

    /// 丢弃缓存,下次读取时从后端重新加载
    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.cache.write() {
            slot.generation += 1;
            slot.table = None;
        }
    }

    fn is_fresh(&self, cache: &TableCache) -> bool {
        match self.options.cache_ttl {
            Some(ttl) => Utc::now() - cache.loaded_at < ttl,
            None => true,
        }
    }

    /// 当前全部记录的只读快照
    ///
    /// 缓存缺失或过期时从后端加载；加载失败直接返回错误,不回退到旧缓存
    pub fn snapshot(&self) -> RepositoryResult<Arc<Vec<VehicleRecord>>> {
        let generation = {
            let slot = self
                .cache
                .read()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            if let Some(cached) = slot.table.as_ref().filter(|c| self.is_fresh(c)) {
                return Ok(cached.records.clone());
            }
            slot.generation
        };

        let rows = self.backend.read_all()?;
        let records = Arc::new(self.codec.decode_table(&rows, self.sequence())?);
        debug!(vehicles = records.len(), generation, "从后端加载车辆表格");
        self.install_loaded(generation, records.clone())?;
        Ok(records)
    }

    /// 安装读者加载的表格（仅当加载期间缓存代数未变）
    fn install_loaded(
        &self,
        generation: u64,
        records: Arc<Vec<VehicleRecord>>,
    ) -> RepositoryResult<()> {
        let mut slot = self
            .cache
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        if slot.generation != generation {
            debug!(
                loaded_generation = generation,
                current_generation = slot.generation,
                "加载期间缓存已变化,丢弃本次加载结果"
            );
            return Ok(());
        }
        slot.generation += 1;
        slot.table = Some(TableCache {
            records,
            loaded_at: Utc::now(),
        });
        Ok(())
    }

    /// 写入成功后无条件替换缓存
    fn replace_cache(&self, records: Arc<Vec<VehicleRecord>>) -> RepositoryResult<()> {
        let mut slot = self
            .cache
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        slot.generation += 1;
        slot.table = Some(TableCache {
            records,
            loaded_at: Utc::now(),
        });
        Ok(())
    }

    /// 写锁内取得可修改的记录副本
    ///
    /// 持有写锁时后端不会被本进程其他写者改动,缺失/过期时直接读后端
    fn load_for_write(
        &self,
        _guard: &MutexGuard<'_, ()>,
    ) -> RepositoryResult<Vec<VehicleRecord>> {
        Ok(self.snapshot()?.as_ref().clone())
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按编号查询（编号会先归一化）
    pub fn get(&self, id: &str) -> RepositoryResult<VehicleRecord> {
        let id = normalize_id(id);
        self.snapshot()?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::vehicle_not_found(&id))
    }

    /// 按条件查询,保持表格行顺序
    pub fn list(&self, filter: &VehicleFilter) -> RepositoryResult<Vec<VehicleRecord>> {
        Ok(self
            .snapshot()?
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        Ok(self.snapshot()?.len())
    }

    // ==========================================
    // 写操作
    // ==========================================

    /// 串行化执行一次 读-改-整表写
    ///
    /// op 返回 Err 时不写后端；后端写失败时缓存保持为上一次持久化的内容
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Vec<VehicleRecord>) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let guard = self.lock_writes()?;

        let mut records = self.load_for_write(&guard)?;
        let value = op(&mut records)?;
        self.persist(records)?;
        Ok(value)
    }

    fn persist(&self, records: Vec<VehicleRecord>) -> RepositoryResult<()> {
        let table = self.codec.encode_table(&records);
        if let Err(e) = self.backend.overwrite(&table) {
            warn!(backend = %self.backend.describe(), error = %e, "整表覆写失败,内存缓存保持不变");
            return Err(e);
        }
        self.replace_cache(Arc::new(records))
    }

    /// 新增车辆记录
    ///
    /// # 返回
    /// - Err(InvalidFormat): 编号格式不合法
    /// - Err(AlreadyExists): 编号已存在
    pub fn add(&self, record: VehicleRecord) -> RepositoryResult<()> {
        let id = validate_id_with_len(&record.id, self.options.vin_length)?;
        if id != record.id {
            return Err(DomainError::InvalidFormat {
                raw: record.id.clone(),
                expected_len: self.options.vin_length,
            }
            .into());
        }
        self.check_layout(&record)?;

        self.mutate(|records| {
            if records.iter().any(|r| r.id == record.id) {
                return Err(RepositoryError::AlreadyExists {
                    entity: "Vehicle".to_string(),
                    id: record.id.clone(),
                });
            }
            info!(vehicle_id = %record.id, model = %record.model, "新增车辆");
            records.push(record);
            Ok(())
        })
    }

    /// 校验编号并创建初始记录后新增
    ///
    /// start_date 为空时以 now 作为上线时间,否则取该日零点（UTC）
    pub fn add_vehicle(
        &self,
        raw_id: &str,
        model: VehicleModel,
        start_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> RepositoryResult<VehicleRecord> {
        let id = validate_id_with_len(raw_id, self.options.vin_length)?;
        let started_at = start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .unwrap_or(now);

        let record = VehicleRecord::new(id, model, started_at, now, self.sequence());
        self.add(record.clone())?;
        Ok(record)
    }

    /// 用 mutation 的结果替换单条记录
    ///
    /// mutation 不得修改编号；仓储本身不实现流转规则
    pub fn update<F>(&self, id: &str, mutation: F) -> RepositoryResult<VehicleRecord>
    where
        F: FnOnce(&VehicleRecord) -> Result<VehicleRecord, DomainError>,
    {
        let id = normalize_id(id);
        self.mutate(|records| {
            let slot = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| RepositoryError::vehicle_not_found(&id))?;

            let updated = mutation(&*slot)?;
            if updated.id != slot.id {
                return Err(RepositoryError::Other(anyhow!(
                    "不允许修改车辆编号: {} -> {}",
                    slot.id,
                    updated.id
                )));
            }

            *slot = updated.clone();
            Ok(updated)
        })
    }

    /// 对单车应用工位状态变更
    pub fn transition(
        &self,
        id: &str,
        station: &str,
        status: StationStatus,
        now: DateTime<Utc>,
    ) -> RepositoryResult<VehicleRecord> {
        let updated = self.update(id, |record| {
            self.engine.apply_transition(record, station, status, now)
        })?;
        debug!(
            vehicle_id = %updated.id,
            station,
            status = %status,
            current_station = %updated.current_station,
            "工位状态已更新"
        );
        Ok(updated)
    }

    /// 删除车辆记录
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let id = normalize_id(id);
        self.mutate(|records| {
            let pos = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| RepositoryError::vehicle_not_found(&id))?;
            records.remove(pos);
            info!(vehicle_id = %id, "删除车辆");
            Ok(())
        })
    }

    /// 批量工位状态变更
    ///
    /// # 说明
    /// - 每个编号独立应用流转规则（以各自记录中的当前工位为准）
    /// - 允许部分失败,成功的不会因其他编号失败而回滚
    /// - 全部成功项在批次末尾一次整表覆写；覆写失败时成功项改报持久化失败
    ///
    /// # 返回
    /// - 与输入编号一一对应的结果列表
    pub fn bulk_update<I, S>(
        &self,
        ids: I,
        station: &str,
        status: StationStatus,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<BulkOutcome>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let guard = self.lock_writes()?;
        let mut records = self.load_for_write(&guard)?;

        let mut outcomes = Vec::new();
        for raw in ids {
            let id = normalize_id(raw.as_ref());
            let result = match records.iter_mut().find(|r| r.id == id) {
                None => Err(RepositoryError::vehicle_not_found(&id)),
                Some(slot) => match self.engine.apply_transition(slot, station, status, now) {
                    Ok(updated) => {
                        *slot = updated.clone();
                        Ok(updated)
                    }
                    Err(e) => Err(e.into()),
                },
            };
            outcomes.push(BulkOutcome { id, result });
        }

        let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        if succeeded > 0 {
            if let Err(e) = self.persist(records) {
                let message = e.to_string();
                for outcome in outcomes.iter_mut().filter(|o| o.result.is_ok()) {
                    outcome.result = Err(RepositoryError::PersistenceFailure(message.clone()));
                }
                return Ok(outcomes);
            }
        }

        info!(
            station,
            status = %status,
            total = outcomes.len(),
            succeeded,
            "批量工位状态更新完成"
        );
        Ok(outcomes)
    }

    /// 校验记录的工位列与工位序列一致
    fn check_layout(&self, record: &VehicleRecord) -> RepositoryResult<()> {
        let aligned = record.stations.len() == self.sequence().len()
            && record
                .stations
                .iter()
                .zip(self.sequence().iter())
                .all(|(p, s)| p.station == s);
        if !aligned || !self.sequence().contains(&record.current_station) {
            return Err(DomainError::UnknownStation(record.current_station.clone()).into());
        }
        Ok(())
    }
}
