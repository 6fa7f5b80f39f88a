use crate::app::batch::ImportBatch;
use crate::core::merge::MergeEngine;
use crate::core::persistence::{PersistedState, PersistenceGateway};
use crate::core::state::ChecklistState;
use crate::core::view::{RankTable, ViewPipeline};
use crate::domain::model::{
    Annotation, ColumnSet, ImportSummary, ProjectedRow, RowIndex, SortDirection, ViewSettings,
};
use crate::domain::ports::{BlobStore, ConfigProvider};
use crate::utils::error::Result;

/// 唯一的狀態擁有者；所有寫入都經過這裡並在完成後存檔
pub struct ChecklistApp<B: BlobStore> {
    state: ChecklistState,
    engine: MergeEngine,
    view: ViewPipeline,
    gateway: PersistenceGateway<B>,
}

impl<B: BlobStore> ChecklistApp<B> {
    /// 從空狀態開始，不讀取已儲存的資料
    pub fn new(gateway: PersistenceGateway<B>, engine: MergeEngine, view: ViewPipeline) -> Self {
        Self {
            state: ChecklistState::new(),
            engine,
            view,
            gateway,
        }
    }

    /// 啟動時還原上次儲存的狀態，讀不到就從空狀態開始
    pub async fn open(
        gateway: PersistenceGateway<B>,
        engine: MergeEngine,
        view: ViewPipeline,
    ) -> Self {
        let state = gateway.load().await.into_state();
        tracing::debug!(
            "📂 Checklist opened with {} rows ({} done)",
            state.rows().len(),
            state.annotations().completed()
        );
        Self {
            state,
            engine,
            view,
            gateway,
        }
    }

    pub async fn open_with_config<C: ConfigProvider>(store: B, config: &C) -> Self {
        let engine = MergeEngine::new(config.identity_key(), config.ingestion_policy())
            .with_excluded_columns(config.excluded_columns().to_vec());
        let view = ViewPipeline::new(RankTable::new(
            config.priority_column(),
            config.ranks().iter().cloned(),
        ));
        let gateway = PersistenceGateway::new(store, config.storage_key());
        Self::open(gateway, engine, view).await
    }

    pub fn state(&self) -> &ChecklistState {
        &self.state
    }

    pub fn columns(&self) -> &ColumnSet {
        self.state.rows().columns()
    }

    pub fn annotation(&self, index: RowIndex) -> Option<&Annotation> {
        self.state.annotations().get(index)
    }

    pub fn view_settings(&self) -> &ViewSettings {
        self.state.view()
    }

    pub fn gateway(&self) -> &PersistenceGateway<B> {
        &self.gateway
    }

    /// 排序按鈕是否可用 (需要有優先欄位)
    pub fn sort_available(&self) -> bool {
        self.state.rows().contains_column(self.view.ranks().column())
    }

    pub fn projection(&self) -> Vec<ProjectedRow<'_>> {
        self.view.project(
            self.state.rows(),
            self.state.annotations(),
            self.state.view(),
        )
    }

    pub async fn toggle_done(&mut self, index: RowIndex) -> Result<bool> {
        if !self.state.annotations.toggle_done(index) {
            tracing::debug!("Row {} does not exist, toggle ignored", index.display_number());
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    pub async fn set_note(&mut self, index: RowIndex, text: &str) -> Result<bool> {
        if !self.state.annotations.set_note(index, text) {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    /// 等整批檔案都解析完成後才合併
    pub async fn import_files(&mut self, batch: ImportBatch) -> Result<ImportSummary> {
        if !self.engine.accepts_import(&self.state) {
            tracing::info!("🔒 Import ignored: checklist is locked after the first batch");
            return Ok(ImportSummary::rejected(batch.len()));
        }

        tracing::info!("📥 Importing {} files", batch.len());
        let files = batch.parse_all().await;
        let summary = self.engine.merge(&mut self.state, files);

        if summary.appended > 0 || summary.new_columns > 0 {
            self.persist().await?;
        }
        Ok(summary)
    }

    /// 搜尋文字不保存，因此不會觸發存檔
    pub fn set_search(&mut self, text: &str) {
        self.state.view.search_text = text.to_string();
    }

    pub async fn cycle_sort(&mut self) -> Result<SortDirection> {
        let next = self.state.view.sort_direction.cycle();
        self.state.view.sort_direction = next;
        self.persist().await?;
        Ok(next)
    }

    /// 清空所有資料並刪除已儲存的 blob
    ///
    /// blob 刪除失敗時記憶體內的狀態保持不變。
    pub async fn remove_all(&mut self) -> Result<()> {
        let removed = self.state.rows().len();
        self.gateway.clear().await?;
        self.state.clear();
        tracing::info!("🗑️ Removed {} rows and saved state", removed);
        Ok(())
    }

    async fn persist(&self) -> Result<()> {
        self.gateway
            .save(&PersistedState::capture(&self.state))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv_source::InMemorySource;
    use crate::adapters::storage::MemoryBlobStore;
    use crate::core::persistence::{LoadOutcome, DEFAULT_STORAGE_KEY};
    use crate::domain::model::{IdentityKey, IngestionPolicy};

    fn app(store: MemoryBlobStore) -> ChecklistApp<MemoryBlobStore> {
        ChecklistApp::new(
            PersistenceGateway::new(store, DEFAULT_STORAGE_KEY),
            MergeEngine::default(),
            ViewPipeline::default(),
        )
    }

    fn batch(name: &str, csv: &str) -> ImportBatch {
        ImportBatch::new().with_source(InMemorySource::new(name, csv))
    }

    #[tokio::test]
    async fn test_every_mutation_is_saved() {
        let store = MemoryBlobStore::new();
        let mut checklist = app(store.clone());

        checklist
            .import_files(batch("a.csv", "Title,Difficulty\nTwo Sum,Easy\n"))
            .await
            .unwrap();
        assert!(store.contains(DEFAULT_STORAGE_KEY).await);

        checklist.toggle_done(RowIndex::new(0)).await.unwrap();
        checklist.set_note(RowIndex::new(0), "hash map").await.unwrap();
        checklist.cycle_sort().await.unwrap();

        let saved = checklist.gateway().load().await;
        let LoadOutcome::Restored(saved) = saved else {
            panic!("expected saved state");
        };
        assert_eq!(saved, PersistedState::capture(checklist.state()));
        assert_eq!(saved.sort_direction, SortDirection::Descending);
    }

    #[tokio::test]
    async fn test_out_of_range_annotation_is_noop() {
        let store = MemoryBlobStore::new();
        let mut checklist = app(store.clone());

        assert!(!checklist.toggle_done(RowIndex::new(0)).await.unwrap());
        assert!(!checklist.set_note(RowIndex::new(9), "x").await.unwrap());
        assert!(checklist.annotation(RowIndex::new(0)).is_none());
        assert!(!store.contains(DEFAULT_STORAGE_KEY).await);
    }

    #[tokio::test]
    async fn test_locked_import_skips_parsing() {
        let mut checklist = ChecklistApp::new(
            PersistenceGateway::new(MemoryBlobStore::new(), DEFAULT_STORAGE_KEY),
            MergeEngine::new(IdentityKey::Title, IngestionPolicy::SingleBatch),
            ViewPipeline::default(),
        );

        checklist
            .import_files(batch("a.csv", "Title\nTwo Sum\n"))
            .await
            .unwrap();
        let summary = checklist
            .import_files(batch("b.csv", "Title,URL\nLRU Cache,x\n"))
            .await
            .unwrap();

        assert!(summary.rejected);
        assert_eq!(summary.files, 1);
        assert_eq!(checklist.state().rows().len(), 1);
        assert_eq!(checklist.columns().len(), 1);
    }

    #[tokio::test]
    async fn test_sort_availability_follows_columns() {
        let mut checklist = app(MemoryBlobStore::new());
        assert!(!checklist.sort_available());

        checklist
            .import_files(batch("a.csv", "Title,Difficulty\nTwo Sum,Easy\n"))
            .await
            .unwrap();
        assert!(checklist.sort_available());
    }

    #[tokio::test]
    async fn test_remove_all_resets_memory_and_blob() {
        let store = MemoryBlobStore::new();
        let mut checklist = app(store.clone());
        checklist
            .import_files(batch("a.csv", "Title\nTwo Sum\n"))
            .await
            .unwrap();
        checklist.set_search("two");

        checklist.remove_all().await.unwrap();

        assert_eq!(checklist.state(), &ChecklistState::new());
        assert!(!store.contains(DEFAULT_STORAGE_KEY).await);
        assert!(checklist.projection().is_empty());
    }

    /// 可以讀寫但無法刪除的 store
    #[derive(Clone, Default)]
    struct UndeletableStore {
        inner: MemoryBlobStore,
    }

    impl BlobStore for UndeletableStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, data: &[u8]) -> Result<()> {
            self.inner.set(key, data).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            Err(crate::utils::error::ChecklistError::StorageError {
                key: key.to_string(),
                message: "permission denied".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_failed_remove_all_keeps_memory_and_blob_in_sync() {
        let store = UndeletableStore::default();
        let mut checklist = ChecklistApp::new(
            PersistenceGateway::new(store.clone(), DEFAULT_STORAGE_KEY),
            MergeEngine::default(),
            ViewPipeline::default(),
        );
        checklist
            .import_files(batch("a.csv", "Title\nTwo Sum\n"))
            .await
            .unwrap();
        checklist.toggle_done(RowIndex::new(0)).await.unwrap();

        assert!(checklist.remove_all().await.is_err());
        assert_eq!(checklist.state().rows().len(), 1);
        assert!(checklist.state().annotations().is_done(RowIndex::new(0)));

        let reopened = ChecklistApp::open(
            PersistenceGateway::new(store, DEFAULT_STORAGE_KEY),
            MergeEngine::default(),
            ViewPipeline::default(),
        )
        .await;
        assert_eq!(reopened.state(), checklist.state());
    }

    #[tokio::test]
    async fn test_search_does_not_write_blob() {
        let store = MemoryBlobStore::new();
        let mut checklist = app(store.clone());

        checklist.set_search("two");

        assert_eq!(checklist.view_settings().search_text, "two");
        assert!(!store.contains(DEFAULT_STORAGE_KEY).await);
    }
}
