use crate::core::state::ChecklistState;
use crate::domain::model::{
    ColumnSet, IdentityKey, ImportSummary, IngestionPolicy, ParsedFile, Row,
};
use std::collections::HashSet;

pub const TITLE_COLUMN: &str = "Title";
pub const DIFFICULTY_COLUMN: &str = "Difficulty";
pub const DEFAULT_EXCLUDED_COLUMNS: [&str; 2] = ["Acceptance %", "Frequency %"];

/// 去除前後空白並轉小寫
pub fn normalize(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_lowercase()
}

impl IdentityKey {
    /// 無法產生鍵值 (例如缺少 Title) 的列回傳 `None`
    pub fn key_for(self, row: &Row) -> Option<String> {
        let title = normalize(row.get(TITLE_COLUMN));
        if title.is_empty() {
            return None;
        }

        match self {
            IdentityKey::Title => Some(title),
            IdentityKey::TitleDifficulty => Some(format!(
                "{}::{}",
                title,
                normalize(row.get(DIFFICULTY_COLUMN))
            )),
        }
    }
}

/// 將一批已解析的檔案去重後合併進狀態
#[derive(Debug, Clone)]
pub struct MergeEngine {
    identity: IdentityKey,
    policy: IngestionPolicy,
    excluded_columns: Vec<String>,
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new(IdentityKey::default(), IngestionPolicy::default())
    }
}

impl MergeEngine {
    pub fn new(identity: IdentityKey, policy: IngestionPolicy) -> Self {
        Self {
            identity,
            policy,
            excluded_columns: DEFAULT_EXCLUDED_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    pub fn with_excluded_columns(mut self, columns: Vec<String>) -> Self {
        self.excluded_columns = columns;
        self
    }

    pub fn identity(&self) -> IdentityKey {
        self.identity
    }

    pub fn policy(&self) -> IngestionPolicy {
        self.policy
    }

    /// 目前狀態是否還接受匯入
    pub fn accepts_import(&self, state: &ChecklistState) -> bool {
        !(self.policy == IngestionPolicy::SingleBatch && !state.is_empty())
    }

    fn is_excluded(&self, column: &str) -> bool {
        self.excluded_columns.iter().any(|c| c == column)
    }

    /// 合併一整批檔案
    ///
    /// `files` 依檔案清單順序排列；`None` 代表該檔案解析失敗，視為零筆資料。
    /// 只有在整批都解析完成後才能呼叫。
    pub fn merge(
        &self,
        state: &mut ChecklistState,
        files: Vec<Option<ParsedFile>>,
    ) -> ImportSummary {
        let mut summary = ImportSummary {
            files: files.len(),
            ..ImportSummary::default()
        };

        if !self.accepts_import(state) {
            tracing::info!(
                "🔒 Import rejected: checklist already holds {} rows (single_batch policy)",
                state.rows().len()
            );
            return ImportSummary::rejected(files.len());
        }

        let mut seen: HashSet<String> = match self.policy {
            IngestionPolicy::Replace => HashSet::new(),
            IngestionPolicy::Accumulate | IngestionPolicy::SingleBatch => state
                .rows()
                .rows()
                .iter()
                .filter_map(|row| self.identity.key_for(row))
                .collect(),
        };

        let mut batch_columns = ColumnSet::new();
        let mut novel_rows = Vec::new();

        for file in files {
            let Some(file) = file else {
                summary.files_failed += 1;
                continue;
            };

            // 沒有資料列的檔案不貢獻欄位
            if file.rows.is_empty() {
                tracing::debug!("📭 {}: no data rows, skipped", file.source_name);
                continue;
            }

            batch_columns.merge(file.columns.iter().filter(|c| !self.is_excluded(c)));
            summary.parsed_rows += file.rows.len();

            let before = novel_rows.len();
            for mut row in file.rows {
                for column in &self.excluded_columns {
                    row.remove(column);
                }

                match self.identity.key_for(&row) {
                    None => summary.dropped_without_key += 1,
                    Some(key) => {
                        if seen.insert(key) {
                            novel_rows.push(row);
                        } else {
                            summary.duplicates += 1;
                        }
                    }
                }
            }

            tracing::debug!(
                "📄 {}: {} new rows",
                file.source_name,
                novel_rows.len() - before
            );
        }

        if self.policy == IngestionPolicy::Replace {
            if novel_rows.is_empty() {
                // 整批都沒有可用資料時保留原本的清單
                tracing::warn!(
                    "⚠️ Replace import produced no rows, keeping existing checklist"
                );
                return summary;
            }
            state.clear();
        }

        summary.new_columns = state.rows.import_columns(batch_columns.iter());
        summary.appended = novel_rows.len();
        if !novel_rows.is_empty() {
            state.append_rows(novel_rows);
        }

        tracing::info!(
            "✅ Merged {} files: {} appended, {} duplicates, {} without key, {} failed",
            summary.files,
            summary.appended,
            summary.duplicates,
            summary.dropped_without_key,
            summary.files_failed
        );
        summary
    }
}
