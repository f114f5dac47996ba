// ==========================================
// 内存仓储实现 - 用于集成测试
// ==========================================
// 每个仓储统计调用次数；配色仓储支持按序号注入创建失败
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use knit_sample_tracker::domain::{
    ColorMatching, KnittingDetail, ProcessPatch, ProcessRecord, Rsn, Sample, Totals,
};
use knit_sample_tracker::engine::{HandoffContext, NavigationHandoff, NextRoute, SampleRepositories};
use knit_sample_tracker::repository::{
    ColorMatchingRepository, KnittingRepository, ProcessRepository, RepositoryError,
    RepositoryResult, SampleRepository,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 全部内存仓储共享的调用计数
#[derive(Default)]
pub struct CallCounter(AtomicUsize);

impl CallCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }
}

// ==========================================
// MemorySampleRepository
// ==========================================
pub struct MemorySampleRepository {
    rows: Mutex<BTreeMap<Rsn, Sample>>,
    calls: Arc<CallCounter>,
    fail_update_totals: Mutex<bool>,
}

#[async_trait]
impl SampleRepository for MemorySampleRepository {
    async fn create(&self, sample: Sample) -> RepositoryResult<Sample> {
        self.calls.hit();
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&sample.rsn) {
            return Err(RepositoryError::UniqueConstraintViolation(sample.rsn.to_string()));
        }
        rows.insert(sample.rsn, sample.clone());
        Ok(sample)
    }

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Option<Sample>> {
        self.calls.hit();
        Ok(self.rows.lock().unwrap().get(&rsn).cloned())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Sample>> {
        self.calls.hit();
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn update_totals(&self, rsn: Rsn, totals: Totals) -> RepositoryResult<Sample> {
        self.calls.hit();
        if *self.fail_update_totals.lock().unwrap() {
            return Err(RepositoryError::LockError("sample 表被占用".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let sample = rows
            .get_mut(&rsn)
            .ok_or_else(|| RepositoryError::not_found("sample", rsn))?;
        sample.total = totals;
        Ok(sample.clone())
    }
}

// ==========================================
// MemoryProcessRepository
// ==========================================
pub struct MemoryProcessRepository {
    rows: Mutex<Vec<ProcessRecord>>,
    calls: Arc<CallCounter>,
}

#[async_trait]
impl ProcessRepository for MemoryProcessRepository {
    async fn create(&self, record: ProcessRecord) -> RepositoryResult<ProcessRecord> {
        self.calls.hit();
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.rsn == record.rsn && r.process_name == record.process_name)
        {
            return Err(RepositoryError::UniqueConstraintViolation(record.process_name));
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        rsn: Rsn,
        process_name: &str,
        patch: ProcessPatch,
    ) -> RepositoryResult<ProcessRecord> {
        self.calls.hit();
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.rsn == rsn && r.process_name == process_name)
            .ok_or_else(|| RepositoryError::not_found("process", process_name))?;
        row.apply_patch(&patch);
        Ok(row.clone())
    }

    async fn delete(&self, rsn: Rsn, process_name: &str) -> RepositoryResult<()> {
        self.calls.hit();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.rsn == rsn && r.process_name == process_name));
        if rows.len() == before {
            return Err(RepositoryError::not_found("process", process_name));
        }
        Ok(())
    }

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Vec<ProcessRecord>> {
        self.calls.hit();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.rsn == rsn)
            .cloned()
            .collect())
    }
}

// ==========================================
// MemoryKnittingRepository
// ==========================================
pub struct MemoryKnittingRepository {
    rows: Mutex<BTreeMap<Rsn, KnittingDetail>>,
    calls: Arc<CallCounter>,
}

#[async_trait]
impl KnittingRepository for MemoryKnittingRepository {
    async fn upsert(&self, detail: KnittingDetail) -> RepositoryResult<KnittingDetail> {
        self.calls.hit();
        self.rows.lock().unwrap().insert(detail.rsn, detail.clone());
        Ok(detail)
    }

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Option<KnittingDetail>> {
        self.calls.hit();
        Ok(self.rows.lock().unwrap().get(&rsn).cloned())
    }
}

// ==========================================
// MemoryColorRepository
// ==========================================
pub struct MemoryColorRepository {
    rows: Mutex<Vec<ColorMatching>>,
    calls: Arc<CallCounter>,
    create_calls: AtomicUsize,
    /// 第 N 次 create 调用失败（从 1 开始）
    fail_create_on: Mutex<Option<usize>>,
    fail_delete_by_rsn: Mutex<bool>,
}

impl MemoryColorRepository {
    pub fn rows(&self) -> Vec<ColorMatching> {
        self.rows.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ColorMatchingRepository for MemoryColorRepository {
    async fn create(&self, record: ColorMatching) -> RepositoryResult<ColorMatching> {
        self.calls.hit();
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_create_on.lock().unwrap() == Some(n) {
            return Err(RepositoryError::Unavailable(format!("injected failure on create #{}", n)));
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.color_id == record.color_id) {
            return Err(RepositoryError::UniqueConstraintViolation(record.color_id));
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, color_id: &str) -> RepositoryResult<()> {
        self.calls.hit();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.color_id != color_id);
        if rows.len() == before {
            return Err(RepositoryError::not_found("color_matching", color_id));
        }
        Ok(())
    }

    async fn delete_by_rsn(&self, rsn: Rsn) -> RepositoryResult<usize> {
        self.calls.hit();
        if *self.fail_delete_by_rsn.lock().unwrap() {
            return Err(RepositoryError::Unavailable("injected delete failure".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.rsn != rsn);
        Ok(before - rows.len())
    }

    async fn find_by_rsn(&self, rsn: Rsn) -> RepositoryResult<Vec<ColorMatching>> {
        self.calls.hit();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.rsn == rsn)
            .cloned()
            .collect())
    }
}

// ==========================================
// MockRepositories - 内存仓储集合
// ==========================================
pub struct MockRepositories {
    pub calls: Arc<CallCounter>,
    pub samples: Arc<MemorySampleRepository>,
    pub processes: Arc<MemoryProcessRepository>,
    pub knitting: Arc<MemoryKnittingRepository>,
    pub colors: Arc<MemoryColorRepository>,
}

impl MockRepositories {
    /// 创建内存仓储，并预置给定样品
    pub fn with_samples(rsns: &[Rsn]) -> Self {
        let calls = Arc::new(CallCounter::default());
        let samples = rsns
            .iter()
            .map(|rsn| (*rsn, Sample::new(*rsn, None)))
            .collect();
        Self {
            samples: Arc::new(MemorySampleRepository {
                rows: Mutex::new(samples),
                calls: calls.clone(),
                fail_update_totals: Mutex::new(false),
            }),
            processes: Arc::new(MemoryProcessRepository {
                rows: Mutex::new(Vec::new()),
                calls: calls.clone(),
            }),
            knitting: Arc::new(MemoryKnittingRepository {
                rows: Mutex::new(BTreeMap::new()),
                calls: calls.clone(),
            }),
            colors: Arc::new(MemoryColorRepository {
                rows: Mutex::new(Vec::new()),
                calls: calls.clone(),
                create_calls: AtomicUsize::new(0),
                fail_create_on: Mutex::new(None),
                fail_delete_by_rsn: Mutex::new(false),
            }),
            calls,
        }
    }

    pub fn fail_color_create_on(&self, nth: usize) {
        *self.colors.fail_create_on.lock().unwrap() = Some(nth);
    }

    pub fn fail_sample_update_totals(&self, fail: bool) {
        *self.samples.fail_update_totals.lock().unwrap() = fail;
    }

    pub fn sample_total(&self, rsn: Rsn) -> Option<Totals> {
        self.samples.rows.lock().unwrap().get(&rsn).map(|s| s.total)
    }

    pub fn knitting_total(&self, rsn: Rsn) -> Option<Totals> {
        self.knitting.rows.lock().unwrap().get(&rsn).map(|k| k.total())
    }

    pub fn fail_color_delete_by_rsn(&self) {
        *self.colors.fail_delete_by_rsn.lock().unwrap() = true;
    }

    pub fn repos(&self) -> SampleRepositories {
        SampleRepositories::new(
            self.samples.clone(),
            self.processes.clone(),
            self.knitting.clone(),
            self.colors.clone(),
        )
    }
}

// ==========================================
// RecordingNavigation - 记录交接
// ==========================================
#[derive(Default)]
pub struct RecordingNavigation {
    pub handoffs: Mutex<Vec<(NextRoute, HandoffContext)>>,
}

impl RecordingNavigation {
    pub fn routes(&self) -> Vec<NextRoute> {
        self.handoffs
            .lock()
            .unwrap()
            .iter()
            .map(|(route, _)| route.clone())
            .collect()
    }
}

impl NavigationHandoff for RecordingNavigation {
    fn handoff(&self, route: NextRoute, context: HandoffContext) {
        self.handoffs.lock().unwrap().push((route, context));
    }
}
