use crate::core::annotations::AnnotationStore;
use crate::core::merge::DIFFICULTY_COLUMN;
use crate::core::row_store::RowStore;
use crate::domain::model::{ProjectedRow, Row, SortDirection, ViewSettings};

/// 優先欄位的排序表，例如 Easy -> 1, Medium -> 2, Hard -> 3
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    column: String,
    levels: Vec<String>,
}

impl Default for RankTable {
    fn default() -> Self {
        Self::new(DIFFICULTY_COLUMN, ["Easy", "Medium", "Hard"])
    }
}

impl RankTable {
    pub fn new<I, S>(column: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// 不在表內的值排在最後 (levels.len() + 1)
    pub fn rank(&self, row: &Row) -> usize {
        row.get(&self.column)
            .and_then(|value| self.levels.iter().position(|level| level == value))
            .map(|position| position + 1)
            .unwrap_or(self.levels.len() + 1)
    }
}

/// 由 Row Store 與檢視設定推導出要顯示的列，不修改任何狀態
#[derive(Debug, Clone, Default)]
pub struct ViewPipeline {
    ranks: RankTable,
}

impl ViewPipeline {
    pub fn new(ranks: RankTable) -> Self {
        Self { ranks }
    }

    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// 先排序再過濾
    pub fn project<'a>(
        &self,
        rows: &'a RowStore,
        annotations: &AnnotationStore,
        settings: &ViewSettings,
    ) -> Vec<ProjectedRow<'a>> {
        let mut projection: Vec<ProjectedRow<'a>> = rows
            .iter()
            .map(|(index, row)| ProjectedRow { index, row })
            .collect();

        self.sort(&mut projection, rows, settings.sort_direction);
        self.filter(projection, rows, annotations, &settings.search_text)
    }

    pub fn sort_active(&self, rows: &RowStore, direction: SortDirection) -> bool {
        direction != SortDirection::Unordered && rows.contains_column(self.ranks.column())
    }

    fn sort(&self, projection: &mut [ProjectedRow<'_>], rows: &RowStore, direction: SortDirection) {
        if !self.sort_active(rows, direction) {
            return;
        }

        // sort_by 是穩定排序，同 rank 保留原始順序
        match direction {
            SortDirection::Ascending => {
                projection.sort_by(|a, b| self.ranks.rank(a.row).cmp(&self.ranks.rank(b.row)))
            }
            SortDirection::Descending => {
                projection.sort_by(|a, b| self.ranks.rank(b.row).cmp(&self.ranks.rank(a.row)))
            }
            SortDirection::Unordered => {}
        }
    }

    fn filter<'a>(
        &self,
        projection: Vec<ProjectedRow<'a>>,
        rows: &RowStore,
        annotations: &AnnotationStore,
        search_text: &str,
    ) -> Vec<ProjectedRow<'a>> {
        let needle = search_text.trim().to_lowercase();
        if needle.is_empty() {
            return projection;
        }

        projection
            .into_iter()
            .filter(|entry| {
                rows.columns().iter().any(|column| {
                    entry
                        .row
                        .get(column)
                        .map(|value| value.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                }) || annotations
                    .note(entry.index)
                    .to_lowercase()
                    .contains(&needle)
            })
            .collect()
    }
}
