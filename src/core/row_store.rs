use crate::domain::model::{ColumnSet, Row, RowIndex};
use std::ops::Range;

/// 匯入資料的正式序列，只能附加不能修改
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowStore {
    rows: Vec<Row>,
    columns: ColumnSet,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(rows: Vec<Row>, columns: ColumnSet) -> Self {
        Self { rows, columns }
    }

    /// 合併新檔案的欄位，回傳新增的欄位數
    pub fn import_columns<I, S>(&mut self, columns: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns.merge(columns)
    }

    /// 依輸入順序附加資料列，回傳新指派的 index 範圍
    ///
    /// 呼叫者必須在任何檢視讀取之前為這個範圍建立預設 annotation。
    pub(crate) fn append_rows(&mut self, rows: Vec<Row>) -> Range<usize> {
        let start = self.rows.len();
        self.rows.extend(rows);
        start..self.rows.len()
    }

    pub fn get(&self, index: RowIndex) -> Option<&Row> {
        self.rows.get(index.get())
    }

    pub fn contains(&self, index: RowIndex) -> bool {
        index.get() < self.rows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowIndex, &Row)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(position, row)| (RowIndex::new(position), row))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
        self.columns = ColumnSet::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_columns_keeps_first_seen_order() {
        let mut store = RowStore::new();
        assert_eq!(store.import_columns(["ID", "Title", "Difficulty"]), 3);
        assert_eq!(store.import_columns(["Title", "URL", "ID"]), 1);

        let columns: Vec<&str> = store.columns().iter().collect();
        assert_eq!(columns, vec!["ID", "Title", "Difficulty", "URL"]);
    }

    #[test]
    fn test_append_rows_assigns_sequential_indices() {
        let mut store = RowStore::new();
        let first = store.append_rows(vec![Row::new().with("Title", "Two Sum")]);
        let second = store.append_rows(vec![
            Row::new().with("Title", "LRU Cache"),
            Row::new().with("Title", "Median Finder"),
        ]);

        assert_eq!(first, 0..1);
        assert_eq!(second, 1..3);
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(RowIndex::new(0)).and_then(|row| row.get("Title")),
            Some("Two Sum")
        );
        assert!(store.get(RowIndex::new(3)).is_none());
    }

    #[test]
    fn test_iter_yields_original_indices() {
        let mut store = RowStore::new();
        store.append_rows(vec![
            Row::new().with("Title", "A"),
            Row::new().with("Title", "B"),
        ]);

        let indices: Vec<usize> = store.iter().map(|(index, _)| index.get()).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
