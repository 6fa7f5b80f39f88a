use crate::utils::error::{ChecklistError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ChecklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ChecklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<String> = allowed_extensions
        .iter()
        .map(|ext| ext.to_ascii_lowercase())
        .collect();

    for file in files {
        match std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(extension) => {
                if !allowed_set.contains(&extension.to_ascii_lowercase()) {
                    return Err(ChecklistError::InvalidConfigValueError {
                        field: field_name.to_string(),
                        value: file.clone(),
                        reason: format!(
                            "Unsupported file extension: {}. Allowed extensions: {}",
                            extension,
                            allowed_extensions.join(", ")
                        ),
                    });
                }
            }
            None => {
                return Err(ChecklistError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ChecklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unique_values(field_name: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(ChecklistError::ConfigValidationError {
            field: field_name.to_string(),
            message: "At least one value is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for value in values {
        validate_non_empty_string(field_name, value)?;
        if !seen.insert(value.as_str()) {
            return Err(ChecklistError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.clone(),
                reason: "Duplicate value".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.data_dir", "./.checklist").is_ok());
        assert!(validate_path("storage.data_dir", "").is_err());
        assert!(validate_path("storage.data_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["top-interview.csv".to_string(), "Blind75.CSV".to_string()];
        assert!(validate_file_extensions("import.files", &files, &["csv"]).is_ok());

        let invalid_files = vec!["problems.xlsx".to_string()];
        assert!(validate_file_extensions("import.files", &invalid_files, &["csv"]).is_err());

        let no_extension = vec!["problems".to_string()];
        assert!(validate_file_extensions("import.files", &no_extension, &["csv"]).is_err());
    }

    #[test]
    fn test_validate_unique_values() {
        let ranks = vec!["Easy".to_string(), "Medium".to_string(), "Hard".to_string()];
        assert!(validate_unique_values("view.ranks", &ranks).is_ok());

        let duplicated = vec!["Easy".to_string(), "Easy".to_string()];
        assert!(validate_unique_values("view.ranks", &duplicated).is_err());

        assert!(validate_unique_values("view.ranks", &[]).is_err());
        assert!(validate_unique_values("view.ranks", &["  ".to_string()]).is_err());
    }
}
