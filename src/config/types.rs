use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::format::{
    DEFAULT_CONVERSIONS,
    FLAG_CHARS,
    LENGTH_CHARS,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "importer.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Formats validation errors as a numbered list.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Target language.
    /// If unset, derived from the process locale, then `"es"`.
    pub language: Option<String>,

    pub placeholder: PlaceholderConfig,

    /// Template store file, relative to the configuration directory.
    pub template_store: String,
    /// Translation store file, relative to the configuration directory.
    pub translation_store: String,

    pub importer: ImporterConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceholderConfig {
    /// Conversion characters that terminate a placeholder.
    pub conversions: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self { conversions: DEFAULT_CONVERSIONS.to_string() }
    }
}

/// Which C sources the scraper reads, relative to the source root.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImporterConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec![
                "Python/*.c".to_string(),
                "Objects/*.c".to_string(),
                "Modules/*.c".to_string(),
            ],
            exclude_patterns: vec!["Python/errors.c".to_string()],
        }
    }
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Conversion set overlaps the rest of the placeholder grammar
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(language) = &self.language
            && language.trim().is_empty()
        {
            errors.push(ValidationError::new(
                "language",
                "The language cannot be empty. \
                 Please specify a code (e.g., \"es\"), or remove this field",
            ));
        }

        let conversions = &self.placeholder.conversions;
        if conversions.is_empty() {
            errors.push(ValidationError::new(
                "placeholder.conversions",
                "At least one conversion character is required. Example: \"sd\"",
            ));
        }
        let reserved: String = conversions
            .chars()
            .filter(|c| {
                *c == '%'
                    || *c == '.'
                    || *c == '*'
                    || c.is_ascii_digit()
                    || FLAG_CHARS.contains(*c)
                    || LENGTH_CHARS.contains(*c)
            })
            .collect();
        if !reserved.is_empty() {
            errors.push(ValidationError::new(
                "placeholder.conversions",
                format!("Characters '{reserved}' are reserved by the placeholder syntax"),
            ));
        }

        for (field, path) in
            [(&self.template_store, "templateStore"), (&self.translation_store, "translationStore")]
        {
            if field.is_empty() {
                errors.push(ValidationError::new(path, "The store path cannot be empty"));
            }
        }

        if self.importer.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "importer.includePatterns",
                "At least one pattern is required. Example: [\"Objects/*.c\"]",
            ));
        }

        for (index, pattern) in self.importer.include_patterns.iter().enumerate() {
            if let Err(e) = super::matcher::check_pattern(pattern) {
                errors.push(ValidationError::new(
                    format!("importer.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.importer.exclude_patterns.iter().enumerate() {
            if let Err(e) = super::matcher::check_pattern(pattern) {
                errors.push(ValidationError::new(
                    format!("importer.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            language: None,
            placeholder: PlaceholderConfig::default(),
            template_store: "templates.json".to_string(),
            translation_store: "translations.json".to_string(),
            importer: ImporterConfig::default(),
        }
    }
}
