//! Template to regex compilation.

use std::collections::HashMap;
use std::sync::{
    Arc,
    RwLock,
};

use regex::Regex;

use super::placeholder::{
    PlaceholderSyntax,
    Segment,
};

/// Wildcard standing in for each placeholder.
const CAPTURE: &str = "(.*?)";

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Failed to compile pattern for template '{template}': {source}")]
    Compile {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// A template compiled into an anchored matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Source template text.
    template: String,
    /// Directives in order of occurrence, as written in the template.
    placeholders: Vec<String>,
    /// Escaped literals joined by [`CAPTURE`], anchored at both ends.
    regex: Regex,
}

impl CompiledPattern {
    /// Builds the matcher for `template`.
    ///
    /// Literal fragments are escaped, so characters such as `(` or `.` in the
    /// template only ever match themselves.
    pub fn compile(template: &str, syntax: &PlaceholderSyntax) -> Result<Self, PatternError> {
        let mut pattern = String::from(r"(?s)\A");
        let mut placeholders = Vec::new();

        for segment in syntax.parse(template) {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(&text)),
                Segment::Placeholder(placeholder) => {
                    pattern.push_str(CAPTURE);
                    placeholders.push(placeholder.raw);
                }
            }
        }
        pattern.push_str(r"\z");

        let regex = Regex::new(&pattern).map_err(|source| PatternError::Compile {
            template: template.to_string(),
            source,
        })?;

        Ok(Self { template: template.to_string(), placeholders, regex })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    #[must_use]
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns true if `message` could have been rendered from this template.
    #[must_use]
    pub fn is_match(&self, message: &str) -> bool {
        message == self.template || self.regex.is_match(message)
    }

    /// Extracts the substituted values from `message`, in placeholder order.
    ///
    /// A message identical to the template yields each directive's own text.
    /// Returns `None` when the message does not match.
    #[must_use]
    pub fn extract(&self, message: &str) -> Option<Vec<String>> {
        if message == self.template {
            return Some(self.placeholders.clone());
        }

        let captures = self.regex.captures(message)?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}

/// Compiles templates and caches the result by template text.
#[derive(Debug, Default)]
pub struct PatternCompiler {
    syntax: PlaceholderSyntax,
    /// Compiled patterns keyed by template text.
    cache: RwLock<HashMap<String, Arc<CompiledPattern>>>,
}

impl PatternCompiler {
    #[must_use]
    pub fn new(syntax: PlaceholderSyntax) -> Self {
        Self { syntax, cache: RwLock::new(HashMap::new()) }
    }

    #[must_use]
    pub const fn syntax(&self) -> &PlaceholderSyntax {
        &self.syntax
    }

    /// Returns the compiled pattern for `template`, compiling it on first use.
    pub fn compile(&self, template: &str) -> Result<Arc<CompiledPattern>, PatternError> {
        if let Ok(cache) = self.cache.read()
            && let Some(pattern) = cache.get(template)
        {
            return Ok(Arc::clone(pattern));
        }

        tracing::trace!(template, "Compiling template pattern");
        let pattern = Arc::new(CompiledPattern::compile(template, &self.syntax)?);

        match self.cache.write() {
            Ok(mut cache) => {
                cache.insert(template.to_string(), Arc::clone(&pattern));
            }
            Err(_) => tracing::debug!("Pattern cache lock poisoned, skipping cache"),
        }

        Ok(pattern)
    }

    /// Number of cached patterns.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.read().map_or(0, |cache| cache.len())
    }
}
