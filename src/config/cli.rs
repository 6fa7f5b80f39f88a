use crate::config::toml_config::TomlConfig;
use crate::domain::model::{IdentityKey, IngestionPolicy};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "problem-checklist")]
#[command(about = "Merge coding-practice CSV exports into one persistent checklist")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the data directory from config
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Override the identity key policy from config
    #[arg(long, value_enum, global = true)]
    pub identity: Option<IdentityKey>,

    /// Override the ingestion policy from config
    #[arg(long, value_enum, global = true)]
    pub policy: Option<IngestionPolicy>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Import one or more CSV exports as a single batch
    Import {
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Show the checklist
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Flip the done flag of a row
    Toggle { row: usize },
    /// Replace the note of a row (an empty string clears it)
    Note { row: usize, text: String },
    /// Cycle the difficulty sort: asc -> desc -> none
    Sort,
    /// Write the current view to a CSV file
    Export {
        #[arg(short, long)]
        output: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Erase all rows, annotations and saved state
    RemoveAll,
}

impl CliConfig {
    /// 載入 TOML 配置 (未指定時使用預設值) 並套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(identity) = self.identity {
            config.ingest.identity = identity;
        }
        if let Some(policy) = self.policy {
            config.ingest.policy = policy;
        }

        config.validate()?;
        Ok(config)
    }
}
