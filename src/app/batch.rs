use crate::adapters::csv_source::parse_csv;
use crate::domain::model::ParsedFile;
use crate::domain::ports::ImportSource;
use tokio::task::JoinSet;

/// 一次匯入操作所選的檔案
///
/// 每個檔案在各自的 task 上讀取與解析；`parse_all` 等到全部完成才回傳，
/// 結果依加入順序排列，與完成的先後無關。
#[derive(Default)]
pub struct ImportBatch {
    sources: Vec<Box<dyn ImportSource>>,
}

impl ImportBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl ImportSource + 'static) -> Self {
        self.add_source(source);
        self
    }

    pub fn add_source(&mut self, source: impl ImportSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// 失敗的檔案以 `None` 佔位，不會阻擋其他檔案
    pub async fn parse_all(self) -> Vec<Option<ParsedFile>> {
        let mut slots: Vec<Option<ParsedFile>> = (0..self.sources.len()).map(|_| None).collect();
        let mut tasks = JoinSet::new();

        for (position, source) in self.sources.into_iter().enumerate() {
            tasks.spawn(async move {
                let name = source.name().to_string();
                let parsed = match source.read().await {
                    Ok(bytes) => parse_csv(&name, &bytes),
                    Err(e) => Err(e),
                };
                (position, name, parsed)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, _, Ok(file))) => slots[position] = Some(file),
                Ok((_, name, Err(e))) => {
                    tracing::warn!("⚠️ {}: skipped, {}", name, e);
                }
                Err(e) => {
                    tracing::warn!("⚠️ Import task aborted: {}", e);
                }
            }
        }

        slots
    }
}
