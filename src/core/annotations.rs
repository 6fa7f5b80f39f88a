use crate::domain::model::{Annotation, RowIndex};
use std::collections::BTreeMap;
use std::ops::Range;

/// 每一列的完成狀態與筆記，以 RowIndex 定址
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationStore {
    entries: BTreeMap<RowIndex, Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: BTreeMap<RowIndex, Annotation>) -> Self {
        Self { entries }
    }

    /// 為新附加的列建立預設值，已存在的項目不受影響
    pub(crate) fn extend_defaults(&mut self, positions: Range<usize>) {
        for position in positions {
            self.entries.entry(RowIndex::new(position)).or_default();
        }
    }

    /// 切換完成狀態；index 不存在時不做任何事
    pub fn toggle_done(&mut self, index: RowIndex) -> bool {
        match self.entries.get_mut(&index) {
            Some(annotation) => {
                annotation.done = !annotation.done;
                true
            }
            None => false,
        }
    }

    /// 覆寫筆記，回傳內容是否有變動
    pub fn set_note(&mut self, index: RowIndex, text: &str) -> bool {
        match self.entries.get_mut(&index) {
            Some(annotation) if annotation.note != text => {
                annotation.note = text.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, index: RowIndex) -> Option<&Annotation> {
        self.entries.get(&index)
    }

    pub fn is_done(&self, index: RowIndex) -> bool {
        self.get(index).map(|a| a.done).unwrap_or(false)
    }

    pub fn note(&self, index: RowIndex) -> &str {
        self.get(index).map(|a| a.note.as_str()).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowIndex, &Annotation)> {
        self.entries.iter().map(|(index, annotation)| (*index, annotation))
    }

    pub fn completed(&self) -> usize {
        self.entries.values().filter(|a| a.done).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
