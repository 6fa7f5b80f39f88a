use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row 在 Row Store 中的位置，附加時指派後不再變動
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowIndex(usize);

impl RowIndex {
    pub const fn new(position: usize) -> Self {
        Self(position)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// 給使用者看的列號 (1 起算)
    pub const fn display_number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 一筆匯入的題目紀錄：欄位名稱 -> 值
///
/// 缺少的欄位與 `null` 都以 `None` 表示；欄位保留 CSV 中的順序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Option<String>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(column.into(), Some(value.into()));
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.fields.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|value| value.as_deref())
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        self.fields.shift_remove(column).flatten()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect();
        Self { fields }
    }
}

/// 有序、不重複的欄位集合，保留首次出現的順序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSet {
    names: Vec<String>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以聯集方式合併欄位，回傳新增的欄位數
    pub fn merge<I, S>(&mut self, columns: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for column in columns {
            let column = column.as_ref();
            if !self.contains(column) {
                self.names.push(column.to_string());
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, column: &str) -> bool {
        self.names.iter().any(|name| name == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ColumnSet::new();
        set.merge(iter);
        set
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub done: bool,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
    #[serde(rename = "none")]
    Unordered,
}

impl SortDirection {
    /// asc -> desc -> none -> asc
    pub fn cycle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Unordered,
            SortDirection::Unordered => SortDirection::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
            SortDirection::Unordered => "none",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSettings {
    pub sort_direction: SortDirection,
    pub search_text: String,
}

/// 判斷兩筆資料是否為同一題目的鍵值策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum IdentityKey {
    #[default]
    Title,
    #[cfg_attr(feature = "cli", value(name = "title_difficulty"))]
    TitleDifficulty,
}

/// 匯入策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum IngestionPolicy {
    /// 只加入新題目，保留既有資料與檢視設定
    #[default]
    Accumulate,
    /// 整批取代既有資料，檢視設定回到預設
    Replace,
    /// 只允許第一次匯入，之後的匯入一律忽略
    #[cfg_attr(feature = "cli", value(name = "single_batch"))]
    SingleBatch,
}

/// CSV tokenizer 的輸出：一個檔案的欄位與資料列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    pub source_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedRow<'a> {
    pub index: RowIndex,
    pub row: &'a Row,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub files: usize,
    pub files_failed: usize,
    pub parsed_rows: usize,
    pub appended: usize,
    pub duplicates: usize,
    pub dropped_without_key: usize,
    pub new_columns: usize,
    pub rejected: bool,
}

impl ImportSummary {
    pub fn rejected(files: usize) -> Self {
        Self {
            files,
            rejected: true,
            ..Self::default()
        }
    }
}
