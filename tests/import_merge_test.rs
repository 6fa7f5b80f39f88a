use anyhow::Result;
use async_trait::async_trait;
use problem_checklist::core::merge::MergeEngine;
use problem_checklist::core::persistence::{PersistenceGateway, DEFAULT_STORAGE_KEY};
use problem_checklist::core::view::ViewPipeline;
use problem_checklist::domain::ports::ImportSource;
use problem_checklist::{
    Annotation, ChecklistApp, FileSource, IdentityKey, ImportBatch, InMemorySource,
    IngestionPolicy, MemoryBlobStore, RowIndex,
};
use std::time::Duration;
use tempfile::TempDir;

const FILE_A: &str = "Title,Difficulty\nTwo Sum,Easy\nLRU Cache,Medium\n";
const FILE_B: &str = "Title,Difficulty\ntwo sum ,Easy\nMedian Finder,Hard\n";

fn checklist(identity: IdentityKey, policy: IngestionPolicy) -> ChecklistApp<MemoryBlobStore> {
    ChecklistApp::new(
        PersistenceGateway::new(MemoryBlobStore::new(), DEFAULT_STORAGE_KEY),
        MergeEngine::new(identity, policy),
        ViewPipeline::default(),
    )
}

fn titles(app: &ChecklistApp<MemoryBlobStore>) -> Vec<String> {
    app.state()
        .rows()
        .iter()
        .map(|(_, row)| row.get("Title").unwrap_or_default().to_string())
        .collect()
}

/// 延遲一段時間才回傳內容，用來打亂完成順序
struct DelayedSource {
    name: String,
    contents: String,
    delay: Duration,
}

impl DelayedSource {
    fn new(name: &str, contents: &str, delay_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            contents: contents.to_string(),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[async_trait]
impl ImportSource for DelayedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> problem_checklist::Result<Vec<u8>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.contents.as_bytes().to_vec())
    }
}

#[tokio::test]
async fn test_second_import_only_adds_new_titles() -> Result<()> {
    let mut app = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);

    app.import_files(ImportBatch::new().with_source(InMemorySource::new("a.csv", FILE_A)))
        .await?;
    let summary = app
        .import_files(ImportBatch::new().with_source(InMemorySource::new("b.csv", FILE_B)))
        .await?;

    assert_eq!(summary.appended, 1);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(titles(&app), vec!["Two Sum", "LRU Cache", "Median Finder"]);
    Ok(())
}

#[tokio::test]
async fn test_reimporting_same_file_is_idempotent() -> Result<()> {
    let mut once = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);
    once.import_files(ImportBatch::new().with_source(InMemorySource::new("a.csv", FILE_A)))
        .await?;

    let mut twice_same_batch = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);
    twice_same_batch
        .import_files(
            ImportBatch::new()
                .with_source(InMemorySource::new("a.csv", FILE_A))
                .with_source(InMemorySource::new("a-copy.csv", FILE_A)),
        )
        .await?;

    let mut twice_separate = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);
    for _ in 0..2 {
        twice_separate
            .import_files(ImportBatch::new().with_source(InMemorySource::new("a.csv", FILE_A)))
            .await?;
    }

    assert_eq!(once.state().rows(), twice_same_batch.state().rows());
    assert_eq!(once.state().rows(), twice_separate.state().rows());
    Ok(())
}

#[tokio::test]
async fn test_batch_order_ignores_completion_timing() -> Result<()> {
    let first = "Title\nAlpha\nShared\n";
    let second = "Title\nshared\nBeta\n";
    let third = "Title\nGamma\nALPHA\n";

    let mut slow_first = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);
    slow_first
        .import_files(
            ImportBatch::new()
                .with_source(DelayedSource::new("1.csv", first, 60))
                .with_source(DelayedSource::new("2.csv", second, 30))
                .with_source(DelayedSource::new("3.csv", third, 0)),
        )
        .await?;

    let mut fast_first = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);
    fast_first
        .import_files(
            ImportBatch::new()
                .with_source(DelayedSource::new("1.csv", first, 0))
                .with_source(DelayedSource::new("2.csv", second, 30))
                .with_source(DelayedSource::new("3.csv", third, 60)),
        )
        .await?;

    assert_eq!(titles(&slow_first), vec!["Alpha", "Shared", "Beta", "Gamma"]);
    assert_eq!(titles(&slow_first), titles(&fast_first));
    Ok(())
}

#[tokio::test]
async fn test_annotations_stay_in_lockstep() -> Result<()> {
    let mut app = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);

    app.import_files(ImportBatch::new().with_source(InMemorySource::new("a.csv", FILE_A)))
        .await?;
    app.toggle_done(RowIndex::new(1)).await?;
    app.set_note(RowIndex::new(1), "O(1) get/put").await?;

    app.import_files(ImportBatch::new().with_source(InMemorySource::new("b.csv", FILE_B)))
        .await?;

    let state = app.state();
    assert_eq!(state.rows().len(), state.annotations().len());
    assert_eq!(
        app.annotation(RowIndex::new(1)),
        Some(&Annotation {
            done: true,
            note: "O(1) get/put".to_string(),
        })
    );
    assert_eq!(app.annotation(RowIndex::new(2)), Some(&Annotation::default()));
    Ok(())
}

#[tokio::test]
async fn test_title_difficulty_identity() -> Result<()> {
    let mut app = checklist(IdentityKey::TitleDifficulty, IngestionPolicy::Accumulate);

    app.import_files(
        ImportBatch::new()
            .with_source(InMemorySource::new("a.csv", FILE_A))
            .with_source(InMemorySource::new(
                "c.csv",
                "Title,Difficulty\nTwo Sum,Medium\n TWO SUM , easy \n",
            )),
    )
    .await?;

    assert_eq!(titles(&app), vec!["Two Sum", "LRU Cache", "Two Sum"]);
    Ok(())
}

#[tokio::test]
async fn test_broken_files_do_not_block_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let good = temp_dir.path().join("good.csv");
    tokio::fs::write(&good, FILE_A).await?;

    let mut app = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);
    let summary = app
        .import_files(
            ImportBatch::new()
                .with_source(FileSource::new(temp_dir.path().join("missing.csv")))
                .with_source(InMemorySource::new("empty.csv", ""))
                .with_source(InMemorySource::new("header-only.csv", "Title,Company\n"))
                .with_source(FileSource::new(&good)),
        )
        .await?;

    assert_eq!(summary.files, 4);
    assert_eq!(summary.files_failed, 2);
    assert_eq!(summary.appended, 2);
    let columns: Vec<&str> = app.columns().iter().collect();
    assert_eq!(columns, vec!["Title", "Difficulty"]);
    Ok(())
}

#[tokio::test]
async fn test_column_union_strips_excluded_columns() -> Result<()> {
    let mut app = checklist(IdentityKey::Title, IngestionPolicy::Accumulate);

    app.import_files(
        ImportBatch::new()
            .with_source(InMemorySource::new(
                "company-a.csv",
                "ID,Title,Acceptance %,Difficulty\n1,Two Sum,49%,Easy\n",
            ))
            .with_source(InMemorySource::new(
                "company-b.csv",
                "Title,Frequency %,URL,ID\nLRU Cache,88%,https://leetcode.com/problems/lru-cache,146\n",
            )),
    )
    .await?;

    let columns: Vec<&str> = app.columns().iter().collect();
    assert_eq!(columns, vec!["ID", "Title", "Difficulty", "URL"]);
    Ok(())
}

#[tokio::test]
async fn test_single_batch_policy_locks_after_first_import() -> Result<()> {
    let mut app = checklist(IdentityKey::Title, IngestionPolicy::SingleBatch);

    app.import_files(ImportBatch::new().with_source(InMemorySource::new("a.csv", FILE_A)))
        .await?;
    let before = app.state().clone();

    let summary = app
        .import_files(ImportBatch::new().with_source(InMemorySource::new("b.csv", FILE_B)))
        .await?;

    assert!(summary.rejected);
    assert_eq!(app.state(), &before);
    Ok(())
}
