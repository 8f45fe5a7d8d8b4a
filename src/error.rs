//! Errors returned by [`crate::Translator`].

use thiserror::Error;

use crate::format::RenderError;

/// Why a single `translate` call failed.
///
/// Every variant is recoverable; callers typically fall back to the
/// untranslated message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The category has no templates, or none of them matches the message.
    #[error("No known '{category}' template matches the message")]
    Unsupported { category: String },

    /// The template is known but has no translation for the language.
    #[error("No '{language}' translation for {category} template '{template}'")]
    MissingTranslation { category: String, template: String, language: String },

    /// The translated template does not fit the extracted values.
    #[error("Failed to render translation: {0}")]
    Render(#[from] RenderError),
}

impl TranslateError {
    /// Returns true for the outcomes that only mean "not translatable",
    /// as opposed to broken translation data.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::MissingTranslation { .. })
    }
}
