use crate::core::merge::{DEFAULT_EXCLUDED_COLUMNS, DIFFICULTY_COLUMN};
use crate::core::persistence::DEFAULT_STORAGE_KEY;
use crate::core::ConfigProvider;
use crate::domain::model::{IdentityKey, IngestionPolicy};
use crate::utils::error::{ChecklistError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_DIR: &str = "./.checklist";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub identity: IdentityKey,
    pub policy: IngestionPolicy,
    pub excluded_columns: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            identity: IdentityKey::default(),
            policy: IngestionPolicy::default(),
            excluded_columns: DEFAULT_EXCLUDED_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub priority_column: String,
    pub ranks: Vec<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            priority_column: DIFFICULTY_COLUMN.to_string(),
            ranks: vec!["Easy".to_string(), "Medium".to_string(), "Hard".to_string()],
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ChecklistError::MissingConfigError {
                field: format!("config file {}", path.display()),
            },
            _ => ChecklistError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ChecklistError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CHECKLIST_DIR})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ChecklistError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_non_empty_string("storage.key", &self.storage.key)?;

        // key 直接當成檔名使用
        if self
            .storage
            .key
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '\0') || c.is_control())
        {
            return Err(ChecklistError::InvalidConfigValueError {
                field: "storage.key".to_string(),
                value: self.storage.key.clone(),
                reason: "Key cannot contain path separators or control characters".to_string(),
            });
        }

        validation::validate_non_empty_string("view.priority_column", &self.view.priority_column)?;
        validation::validate_unique_values("view.ranks", &self.view.ranks)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn storage_key(&self) -> &str {
        &self.storage.key
    }

    fn identity_key(&self) -> IdentityKey {
        self.ingest.identity
    }

    fn ingestion_policy(&self) -> IngestionPolicy {
        self.ingest.policy
    }

    fn excluded_columns(&self) -> &[String] {
        &self.ingest.excluded_columns
    }

    fn priority_column(&self) -> &str {
        &self.view.priority_column
    }

    fn ranks(&self) -> &[String] {
        &self.view.ranks
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
