//! Core types used throughout the project.

use serde::{
    Deserialize,
    Serialize,
};

/// A format template registered under an error category.
///
/// Ordering is by category, then text, which is the order the matcher walks
/// candidates in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Template {
    /// Error kind name, e.g. `NameError`.
    pub category: String,
    /// printf-style format string, e.g. `name '%.200s' is not defined`.
    pub text: String,
}

impl Template {
    #[must_use]
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self { category: category.into(), text: text.into() }
    }
}

/// A per-language counterpart of a template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub category: String,
    /// Must equal the `text` of a [`Template`] in the same category to be reachable.
    pub source_text: String,
    /// Short language code such as `es`.
    pub language: String,
    /// Format string receiving the extracted values in order.
    pub translated_text: String,
}

impl TranslationRecord {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        source_text: impl Into<String>,
        language: impl Into<String>,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            source_text: source_text.into(),
            language: language.into(),
            translated_text: translated_text.into(),
        }
    }
}

/// Result of deformatting a message: the originating template and the values
/// that were substituted into it, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub template: &'a Template,
    pub values: Vec<String>,
}
