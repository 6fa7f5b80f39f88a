use crate::domain::model::{IdentityKey, IngestionPolicy};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 以 key 存取整塊資料的儲存介面
pub trait BlobStore: Send + Sync {
    /// 不存在時回傳 `Ok(None)`
    fn get(&self, key: &str)
        -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn set(&self, key: &str, data: &[u8]) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 一個待匯入的 CSV 來源 (本機檔案、記憶體內容等)
#[async_trait]
pub trait ImportSource: Send + Sync {
    fn name(&self) -> &str;
    async fn read(&self) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn identity_key(&self) -> IdentityKey;
    fn ingestion_policy(&self) -> IngestionPolicy;
    fn excluded_columns(&self) -> &[String];
    fn priority_column(&self) -> &str;
    fn ranks(&self) -> &[String];
}
