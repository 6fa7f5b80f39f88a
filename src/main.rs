use clap::Parser;
use problem_checklist::adapters::csv_export::export_projection;
use problem_checklist::core::ConfigProvider;
use problem_checklist::utils::error::ErrorSeverity;
use problem_checklist::utils::logger;
use problem_checklist::utils::validation::validate_file_extensions;
use problem_checklist::{
    ChecklistApp, ChecklistError, CliConfig, Command, FileBlobStore, FileSource, ImportBatch,
    ImportSummary, Result, RowIndex,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_format);

    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let store = FileBlobStore::new(config.data_dir());
    let mut app = ChecklistApp::open_with_config(store, &config).await;

    if let Err(e) = run(&mut app, cli.command).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

fn exit_code(error: &ChecklistError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(app: &mut ChecklistApp<FileBlobStore>, command: Command) -> Result<()> {
    match command {
        Command::Import { files } => {
            validate_file_extensions("files", &files, &["csv"])?;
            let mut batch = ImportBatch::new();
            for file in &files {
                batch.add_source(FileSource::new(file));
            }
            let summary = app.import_files(batch).await?;
            print_summary(&summary);
        }
        Command::List { search } => {
            if let Some(search) = search {
                app.set_search(&search);
            }
            print_checklist(app);
        }
        Command::Toggle { row } => {
            let toggled = match to_index(row) {
                Some(index) => app.toggle_done(index).await?,
                None => false,
            };
            match to_index(row).and_then(|index| app.annotation(index)) {
                Some(annotation) if toggled => {
                    let state = if annotation.done { "done" } else { "not done" };
                    println!("Row {} marked {}", row, state);
                }
                _ => println!("Row {} not found", row),
            }
        }
        Command::Note { row, text } => match to_index(row) {
            Some(index) if app.annotation(index).is_some() => {
                app.set_note(index, &text).await?;
                println!("Note saved for row {}", row);
            }
            _ => println!("Row {} not found", row),
        },
        Command::Sort => {
            if !app.sort_available() {
                println!("No difficulty column to sort by");
                return Ok(());
            }
            let direction = app.cycle_sort().await?;
            println!("Sort: difficulty {}", direction);
        }
        Command::Export { output, search } => {
            if let Some(search) = search {
                app.set_search(&search);
            }
            let path = output.unwrap_or_else(|| {
                format!(
                    "checklist_{}.csv",
                    chrono::Local::now().format("%Y%m%d_%H%M%S")
                )
            });
            let projection = app.projection();
            let bytes = export_projection(app.columns(), &projection, app.state().annotations())?;
            tokio::fs::write(&path, bytes).await?;
            println!("📁 Exported {} rows to {}", projection.len(), path);
        }
        Command::RemoveAll => {
            app.remove_all().await?;
            println!("All rows, notes and saved state removed");
        }
    }
    Ok(())
}

/// 使用者看到的列號從 1 開始
fn to_index(row: usize) -> Option<RowIndex> {
    row.checked_sub(1).map(RowIndex::new)
}

fn print_summary(summary: &ImportSummary) {
    if summary.rejected {
        println!("🔒 Import ignored: this checklist only accepts a single import");
        return;
    }
    println!(
        "✅ Imported {} new rows from {} files ({} duplicates skipped, {} without title)",
        summary.appended, summary.files, summary.duplicates, summary.dropped_without_key
    );
    if summary.files_failed > 0 {
        println!("⚠️ {} files could not be read", summary.files_failed);
    }
}

fn print_checklist(app: &ChecklistApp<FileBlobStore>) {
    let projection = app.projection();
    if projection.is_empty() {
        println!("No data found.");
        return;
    }

    let columns: Vec<&str> = app.columns().iter().collect();
    println!("#\tDone\t{}\tNotes", columns.join("\t"));

    for entry in &projection {
        let annotation = app.annotation(entry.index);
        let done = annotation.map(|a| a.done).unwrap_or(false);
        let values: Vec<&str> = columns
            .iter()
            .map(|column| entry.row.get(column).unwrap_or(""))
            .collect();
        println!(
            "{}\t[{}]\t{}\t{}",
            entry.index.display_number(),
            if done { "x" } else { " " },
            values.join("\t"),
            annotation.map(|a| a.note.as_str()).unwrap_or("")
        );
    }

    let settings = app.view_settings();
    println!(
        "\n{} of {} rows shown, {} done (sort: {})",
        projection.len(),
        app.state().rows().len(),
        app.state().annotations().completed(),
        settings.sort_direction
    );
}
