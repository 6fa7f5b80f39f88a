use crate::domain::ports::BlobStore;
use crate::utils::error::{ChecklistError, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 每個 key 對應 base_path 下的一個 `<key>.json` 檔案
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    base_path: PathBuf,
}

impl FileBlobStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ChecklistError::StorageError {
                key: key.to_string(),
                message: format!("Failed to read blob: {}", e),
            }),
        }
    }

    async fn set(&self, key: &str, data: &[u8]) -> Result<()> {
        let full_path = self.path_for(key);
        tokio::fs::create_dir_all(&self.base_path).await?;

        // 先寫暫存檔再 rename，避免留下寫到一半的檔案
        let temp_path = full_path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| ChecklistError::StorageError {
                key: key.to_string(),
                message: format!("Failed to write blob: {}", e),
            })?;
        tokio::fs::rename(&temp_path, &full_path)
            .await
            .map_err(|e| ChecklistError::StorageError {
                key: key.to_string(),
                message: format!("Failed to replace blob: {}", e),
            })?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ChecklistError::StorageError {
                key: key.to_string(),
                message: format!("Failed to delete blob: {}", e),
            }),
        }
    }
}

/// 記憶體內的 blob store，clone 之後共用同一份資料
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.blobs.lock().await.contains_key(key)
    }
}

impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self.blobs.lock().await;
        Ok(blobs.get(key).cloned())
    }

    async fn set(&self, key: &str, data: &[u8]) -> Result<()> {
        let mut blobs = self.blobs.lock().await;
        blobs.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut blobs = self.blobs.lock().await;
        blobs.remove(key);
        Ok(())
    }
}
