use crate::core::annotations::AnnotationStore;
use crate::core::row_store::RowStore;
use crate::core::state::ChecklistState;
use crate::domain::model::{Annotation, ColumnSet, Row, RowIndex, SortDirection, ViewSettings};
use crate::domain::ports::BlobStore;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_STORAGE_KEY: &str = "leetcode_csv_data_v4";

/// 持久化的完整快照 (搜尋文字不保存)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub rows: Vec<Row>,
    pub columns: ColumnSet,
    pub annotations: BTreeMap<RowIndex, Annotation>,
    pub sort_direction: SortDirection,
}

impl PersistedState {
    pub fn capture(state: &ChecklistState) -> Self {
        Self {
            rows: state.rows().rows().to_vec(),
            columns: state.rows().columns().clone(),
            annotations: state
                .annotations()
                .iter()
                .map(|(index, annotation)| (index, annotation.clone()))
                .collect(),
            sort_direction: state.view().sort_direction,
        }
    }

    pub fn into_state(self) -> ChecklistState {
        let rows = RowStore::from_parts(self.rows, self.columns);
        let annotations = AnnotationStore::from_entries(self.annotations);
        let view = ViewSettings {
            sort_direction: self.sort_direction,
            search_text: String::new(),
        };
        ChecklistState::from_parts(rows, annotations, view)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let blob = PersistedBlob {
            data: self.rows.clone(),
            checked: self
                .annotations
                .iter()
                .map(|(index, annotation)| (index.get(), annotation.done))
                .collect(),
            notes: self
                .annotations
                .iter()
                .map(|(index, annotation)| (index.get(), annotation.note.clone()))
                .collect(),
            columns: self.columns.as_slice().to_vec(),
            sort_dir: self.sort_direction,
        };
        Ok(serde_json::to_vec(&blob)?)
    }

    /// 解碼後補齊 annotation，使其與資料列一一對應
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let blob: PersistedBlob = serde_json::from_slice(bytes)?;

        let annotations = (0..blob.data.len())
            .map(|position| {
                let annotation = Annotation {
                    done: blob.checked.get(&position).copied().unwrap_or(false),
                    note: blob.notes.get(&position).cloned().unwrap_or_default(),
                };
                (RowIndex::new(position), annotation)
            })
            .collect();

        Ok(Self {
            rows: blob.data,
            columns: blob.columns.iter().collect(),
            annotations,
            sort_direction: blob.sort_dir,
        })
    }
}

/// 儲存格式：`{ data, checked, notes, columns, sortDir }`
#[derive(Debug, Serialize, Deserialize)]
struct PersistedBlob {
    #[serde(default)]
    data: Vec<Row>,
    #[serde(default)]
    checked: BTreeMap<usize, bool>,
    #[serde(default)]
    notes: BTreeMap<usize, String>,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default, rename = "sortDir")]
    sort_dir: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored(PersistedState),
    NoPriorState,
}

impl LoadOutcome {
    pub fn into_state(self) -> ChecklistState {
        match self {
            LoadOutcome::Restored(state) => state.into_state(),
            LoadOutcome::NoPriorState => ChecklistState::new(),
        }
    }
}

/// 以固定 key 將整個狀態存成一個 blob
pub struct PersistenceGateway<B: BlobStore> {
    store: B,
    key: String,
}

impl<B: BlobStore> PersistenceGateway<B> {
    pub fn new(store: B, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    pub async fn save(&self, state: &PersistedState) -> Result<()> {
        let bytes = state.encode()?;
        tracing::debug!(
            "💾 Saving {} rows ({} bytes) under '{}'",
            state.rows.len(),
            bytes.len(),
            self.key
        );
        self.store.set(&self.key, &bytes).await
    }

    /// 讀取失敗或資料損毀時一律回傳 `NoPriorState`
    pub async fn load(&self) -> LoadOutcome {
        let bytes = match self.store.get(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("📭 No saved checklist under '{}'", self.key);
                return LoadOutcome::NoPriorState;
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not read saved checklist '{}': {}", self.key, e);
                return LoadOutcome::NoPriorState;
            }
        };

        match PersistedState::decode(&bytes) {
            Ok(state) => {
                tracing::debug!("📂 Restored {} rows from '{}'", state.rows.len(), self.key);
                LoadOutcome::Restored(state)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Saved checklist '{}' is corrupted, starting empty: {}",
                    self.key,
                    e
                );
                LoadOutcome::NoPriorState
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        tracing::debug!("🗑️ Removing saved checklist '{}'", self.key);
        self.store.remove(&self.key).await
    }
}
