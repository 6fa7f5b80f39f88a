use crate::core::annotations::AnnotationStore;
use crate::core::row_store::RowStore;
use crate::domain::model::{Row, RowIndex, ViewSettings};
use std::ops::Range;

/// 應用程式的完整狀態，只能透過這裡的方法寫入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistState {
    pub(crate) rows: RowStore,
    pub(crate) annotations: AnnotationStore,
    pub(crate) view: ViewSettings,
}

impl ChecklistState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        rows: RowStore,
        annotations: AnnotationStore,
        view: ViewSettings,
    ) -> Self {
        Self {
            rows,
            annotations,
            view,
        }
    }

    /// 附加資料列並同步建立預設 annotation
    pub(crate) fn append_rows(&mut self, rows: Vec<Row>) -> Range<RowIndex> {
        let positions = self.rows.append_rows(rows);
        self.annotations.extend_defaults(positions.clone());
        RowIndex::new(positions.start)..RowIndex::new(positions.end)
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
        self.annotations.clear();
        self.view = ViewSettings::default();
    }

    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
