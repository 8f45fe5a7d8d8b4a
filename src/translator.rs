//! Message translation: match, extract, look up, re-render.

use std::sync::Arc;

use crate::error::TranslateError;
use crate::format::{
    PatternCompiler,
    PlaceholderSyntax,
    render,
};
use crate::matcher::Matcher;
use crate::store::{
    TemplateStore,
    TranslationStore,
};

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "es";

/// Translates rendered error messages through the template and translation stores.
///
/// The stores are shared read-only, so clones are cheap and may be handed to
/// other threads. The target language is fixed per instance; use
/// [`Translator::with_language`] for another default or
/// [`Translator::translate_to`] for a one-off language.
#[derive(Debug, Clone)]
pub struct Translator {
    templates: Arc<TemplateStore>,
    translations: Arc<TranslationStore>,
    /// Shared so clones reuse compiled patterns.
    compiler: Arc<PatternCompiler>,
    language: String,
}

impl Translator {
    #[must_use]
    pub fn new(
        templates: impl Into<Arc<TemplateStore>>,
        translations: impl Into<Arc<TranslationStore>>,
    ) -> Self {
        Self {
            templates: templates.into(),
            translations: translations.into(),
            compiler: Arc::new(PatternCompiler::default()),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Returns a translator targeting `language`, sharing stores and pattern cache.
    #[must_use]
    pub fn with_language(self, language: impl Into<String>) -> Self {
        Self { language: language.into(), ..self }
    }

    /// Returns a translator recognising the given placeholder syntax.
    ///
    /// Starts with an empty pattern cache.
    #[must_use]
    pub fn with_syntax(self, syntax: PlaceholderSyntax) -> Self {
        Self { compiler: Arc::new(PatternCompiler::new(syntax)), ..self }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    #[must_use]
    pub fn translations(&self) -> &TranslationStore {
        &self.translations
    }

    #[must_use]
    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.templates, &self.compiler)
    }

    /// Translates `message` of `category` into this translator's language.
    ///
    /// # Errors
    /// - [`TranslateError::Unsupported`]: no template of `category` matches
    /// - [`TranslateError::MissingTranslation`]: no translation for the language
    /// - [`TranslateError::Render`]: the translation's placeholders do not fit the values
    pub fn translate(&self, category: &str, message: &str) -> Result<String, TranslateError> {
        self.translate_to(category, message, &self.language)
    }

    /// Translates `message` of `category` into `language`.
    ///
    /// Values are substituted in the order they were extracted; a translation
    /// whose placeholders need a different argument order will read wrong.
    pub fn translate_to(
        &self,
        category: &str,
        message: &str,
        language: &str,
    ) -> Result<String, TranslateError> {
        let found = self
            .matcher()
            .find(category, message)
            .ok_or_else(|| TranslateError::Unsupported { category: category.to_string() })?;

        let record = self.translations.get(category, &found.template.text, language).ok_or_else(
            || TranslateError::MissingTranslation {
                category: category.to_string(),
                template: found.template.text.clone(),
                language: language.to_string(),
            },
        )?;

        tracing::trace!(
            category,
            language,
            template = %found.template.text,
            "Rendering translation"
        );
        Ok(render(self.compiler.syntax(), &record.translated_text, &found.values)?)
    }
}
