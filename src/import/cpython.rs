//! Template scraper for the CPython C sources.
//!
//! Finds `PyErr_SetString`, `PyErr_Format` and `FORMAT_EXCEPTION` calls and
//! turns each into a template: the category comes from the `PyExc_*` argument
//! and the text is the concatenation of the call's string literals.

use std::collections::BTreeSet;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::LazyLock;

use ignore::WalkBuilder;
use regex::Regex;
use thiserror::Error;

use crate::config::{
    FileMatcher,
    ImporterConfig,
    MatcherError,
};
use crate::store::TemplateStore;
use crate::types::Template;

/// Call patterns that raise an exception with a message, up to the closing `;`.
#[allow(clippy::expect_used)]
static BLOCK_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?s)PyErr_SetString.*?;",
        r"(?s)PyErr_Format\(.*?PyExc.*?;",
        r"(?s)FORMAT_EXCEPTION\(.*?PyExc.*?;",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid block pattern"))
});

#[allow(clippy::expect_used)]
static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\\n]|\\.)*)""#).expect("valid string literal pattern")
});

#[allow(clippy::expect_used)]
static EXCEPTION_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PyExc_(\w+)").expect("valid exception type pattern"));

/// A block that names no exception type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No PyExc_* exception type in: {block}")]
pub struct ParseError {
    pub block: String,
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

/// Splits C source into blocks that each raise one exception.
#[must_use]
pub fn c_block_finder(text: &str) -> BTreeSet<String> {
    BLOCK_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(text))
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Builds the template raised by one block.
pub fn parse_c_code(block: &str) -> Result<Template, ParseError> {
    let category = EXCEPTION_TYPE
        .captures(block)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| ParseError { block: block.to_string() })?;

    let text: String = STRING_LITERAL
        .captures_iter(block)
        .filter_map(|captures| captures.get(1))
        .map(|literal| unescape_c(literal.as_str()))
        .collect();

    Ok(Template::new(category.as_str(), text))
}

/// Resolves the simple C escapes a message literal can contain.
fn unescape_c(literal: &str) -> String {
    let mut output = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some(other) => output.push(other),
            None => output.push('\\'),
        }
    }
    output
}

/// Collects the templates of one C file.
///
/// Blocks without an exception type are logged and skipped.
pub fn parse_c_file(path: &Path) -> Result<BTreeSet<Template>, ImportError> {
    let bytes = std::fs::read(path)
        .map_err(|source| ImportError::Io { path: path.to_path_buf(), source })?;
    let text = String::from_utf8_lossy(&bytes);

    let mut templates = BTreeSet::new();
    for block in c_block_finder(&text) {
        match parse_c_code(&block) {
            Ok(template) => {
                templates.insert(template);
            }
            Err(err) => {
                tracing::warn!(file = %path.display(), %err, "Can't parse an exception");
            }
        }
    }
    Ok(templates)
}

/// NameError messages the interpreter formats outside the helper calls.
#[must_use]
pub fn fixed_templates() -> Vec<Template> {
    [
        "name '%.200s' is not defined",
        "global name '%.200s' is not defined",
        "local variable '%.200s' referenced before assignment",
        "free variable '%.200s' referenced before assignment in enclosing scope",
    ]
    .into_iter()
    .map(|text| Template::new("NameError", text))
    .collect()
}

/// Imports templates from a CPython source tree.
#[derive(Debug, Clone)]
pub struct CPythonImporter {
    matcher: FileMatcher,
}

impl CPythonImporter {
    /// # Errors
    /// Invalid include or exclude pattern.
    pub fn new(source_root: PathBuf, config: &ImporterConfig) -> Result<Self, ImportError> {
        Ok(Self { matcher: FileMatcher::new(source_root, config)? })
    }

    #[must_use]
    pub fn source_root(&self) -> &Path {
        self.matcher.source_root()
    }

    /// Lists the C files to scrape, sorted.
    #[must_use]
    pub fn find_source_files(&self) -> Vec<PathBuf> {
        let mut found_files = Vec::new();

        for result in WalkBuilder::new(self.source_root())
            .hidden(false)
            .git_ignore(false)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if self.matcher.is_source_file(entry.path()) {
                found_files.push(entry.path().to_path_buf());
            }
        }

        found_files.sort();
        found_files
    }

    /// Scrapes every matching file plus [`fixed_templates`].
    ///
    /// Unreadable files are logged and skipped.
    #[must_use]
    pub fn do_import(&self) -> TemplateStore {
        let files = self.find_source_files();
        tracing::debug!(root = %self.source_root().display(), files = files.len(), "Scraping");

        let mut store = TemplateStore::new();
        for file in &files {
            match parse_c_file(file) {
                Ok(templates) => store.extend(templates),
                Err(err) => tracing::warn!(%err, "Skipping source file"),
            }
        }
        store.extend(fixed_templates());

        tracing::debug!(templates = store.len(), "Scraped templates");
        store
    }
}
