//! Recovers the template a message was rendered from.

use std::sync::Arc;

use crate::format::{
    CompiledPattern,
    PatternCompiler,
};
use crate::store::TemplateStore;
use crate::types::{
    MatchResult,
    Template,
};

/// Searches a category's templates for one that produced a message.
///
/// Candidates are tried in lexicographic order of template text and the first
/// match wins. When several templates of a category can render the same
/// message (e.g. `%s failed` and `open %s failed` for `open x failed`), the
/// winner is the lexicographically smallest, not the most specific.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    templates: &'a TemplateStore,
    compiler: &'a PatternCompiler,
}

impl<'a> Matcher<'a> {
    #[must_use]
    pub const fn new(templates: &'a TemplateStore, compiler: &'a PatternCompiler) -> Self {
        Self { templates, compiler }
    }

    /// Returns the template that `message` was rendered from, if any.
    #[must_use]
    pub fn search(&self, category: &str, message: &str) -> Option<&'a Template> {
        self.candidates(category)
            .find(|(_, pattern)| pattern.is_match(message))
            .map(|(template, _)| template)
    }

    /// Like [`Matcher::search`], also returning the extracted values.
    #[must_use]
    pub fn find(&self, category: &str, message: &str) -> Option<MatchResult<'a>> {
        self.candidates(category).find_map(|(template, pattern)| {
            pattern.extract(message).map(|values| MatchResult { template, values })
        })
    }

    /// Extracts the values substituted into `template` to produce `message`.
    #[must_use]
    pub fn extract(&self, template: &Template, message: &str) -> Option<Vec<String>> {
        self.compiler.compile(&template.text).ok()?.extract(message)
    }

    /// Templates of `category` paired with their compiled patterns.
    ///
    /// Templates whose pattern cannot be built are skipped.
    fn candidates(
        &self,
        category: &str,
    ) -> impl Iterator<Item = (&'a Template, Arc<CompiledPattern>)> {
        let compiler = self.compiler;
        let templates = self.templates.filter(Some(category));
        if templates.is_empty() {
            tracing::trace!(category, "No templates for category");
        }
        templates.into_iter().filter_map(move |template| match compiler.compile(&template.text) {
            Ok(pattern) => Some((template, pattern)),
            Err(err) => {
                tracing::warn!(category = %template.category, %err, "Skipping template");
                None
            }
        })
    }
}
