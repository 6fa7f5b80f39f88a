use crate::domain::model::{ParsedFile, Row};
use crate::domain::ports::ImportSource;
use crate::utils::error::{ChecklistError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const UTF8_BOM: char = '\u{feff}';

/// 將 CSV 內容切成欄位與資料列
///
/// 第一列是標題；空白或重複的標題只保留第一個。資料列欄位數不足時，
/// 缺少的欄位不會出現在 Row 中。
pub fn parse_csv(source_name: &str, bytes: &[u8]) -> Result<ParsedFile> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut columns: Vec<(usize, String)> = Vec::with_capacity(headers.len());
    for (position, header) in headers.iter().enumerate() {
        let name = if position == 0 {
            header.trim_start_matches(UTF8_BOM)
        } else {
            header
        };
        if name.is_empty() || columns.iter().any(|(_, existing)| existing == name) {
            continue;
        }
        columns.push((position, name.to_string()));
    }

    if columns.is_empty() {
        return Err(ChecklistError::ImportError {
            source_name: source_name.to_string(),
            message: "missing header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut row = Row::new();
        for (position, name) in &columns {
            if let Some(value) = record.get(*position) {
                row.insert(name.clone(), Some(value.to_string()));
            }
        }
        rows.push(row);
    }

    tracing::debug!(
        "📄 {}: parsed {} columns, {} rows",
        source_name,
        columns.len(),
        rows.len()
    );

    Ok(ParsedFile {
        source_name: source_name.to_string(),
        columns: columns.into_iter().map(|(_, name)| name).collect(),
        rows,
    })
}

/// 本機 CSV 檔案
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl ImportSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// 記憶體中的 CSV 內容
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    contents: Vec<u8>,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

#[async_trait]
impl ImportSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<Vec<u8>> {
        Ok(self.contents.clone())
    }
}
