//! File pattern matcher for the C source scraper.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::ImporterConfig;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidIncludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches source files against the importer's glob patterns.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    source_root: PathBuf,
    include_set: GlobSet,
    exclude_set: GlobSet,
}

impl FileMatcher {
    /// Creates a new matcher from settings.
    pub fn new(source_root: PathBuf, config: &ImporterConfig) -> Result<Self, MatcherError> {
        let include_set = Self::build_glob_set(&config.include_patterns, |pattern, source| {
            MatcherError::InvalidIncludePattern { pattern, source }
        })?;

        let exclude_set = Self::build_glob_set(&config.exclude_patterns, |pattern, source| {
            MatcherError::InvalidExcludePattern { pattern, source }
        })?;

        Ok(Self { source_root, include_set, exclude_set })
    }

    /// Compiles `patterns` into one set, mapping the first bad pattern with `make_error`.
    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            // `Python/*.c` must not reach into `Python/sub/x.c`
            let glob = globset::GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Returns true if the path matches `includePatterns` but not `excludePatterns`.
    ///
    /// The path must be absolute and under the source root.
    #[must_use]
    pub fn is_source_file(&self, absolute_path: &Path) -> bool {
        let Some(relative_path) = absolute_path.strip_prefix(&self.source_root).ok() else {
            return false;
        };

        self.is_source_file_relative(relative_path)
    }

    /// Returns true if the path matches `includePatterns` but not `excludePatterns`.
    ///
    /// The path must be relative to the source root.
    #[must_use]
    pub fn is_source_file_relative(&self, relative_path: &Path) -> bool {
        self.include_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}

/// Checks a pattern the same way [`FileMatcher`] compiles it.
pub(super) fn check_pattern(pattern: &str) -> Result<Glob, globset::Error> {
    globset::GlobBuilder::new(pattern).literal_separator(true).build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use rstest::rstest;

    use super::*;

    fn create_config(include: &[&str], exclude: &[&str]) -> ImporterConfig {
        ImporterConfig {
            include_patterns: include.iter().copied().map(String::from).collect(),
            exclude_patterns: exclude.iter().copied().map(String::from).collect(),
        }
    }

    #[rstest]
    fn is_source_file_with_default_patterns() {
        let matcher = FileMatcher::new(PathBuf::from("/cpython"), &ImporterConfig::default())
            .expect("valid patterns");

        assert!(matcher.is_source_file(Path::new("/cpython/Python/ceval.c")));
        assert!(matcher.is_source_file(Path::new("/cpython/Objects/listobject.c")));
        assert!(matcher.is_source_file(Path::new("/cpython/Modules/posixmodule.c")));

        assert!(!matcher.is_source_file(Path::new("/cpython/Python/errors.c")));
        assert!(!matcher.is_source_file(Path::new("/cpython/Include/object.h")));
        assert!(!matcher.is_source_file(Path::new("/cpython/Modules/_io/fileio.c")));
    }

    #[rstest]
    fn is_source_file_outside_root() {
        let matcher = FileMatcher::new(PathBuf::from("/cpython"), &ImporterConfig::default())
            .expect("valid patterns");

        assert!(!matcher.is_source_file(Path::new("/other/Python/ceval.c")));
    }

    #[rstest]
    fn is_source_file_relative_with_custom_patterns() {
        let config = create_config(&["**/*.c"], &["**/test_*.c"]);
        let matcher = FileMatcher::new(PathBuf::from("/src"), &config).expect("valid patterns");

        assert!(matcher.is_source_file_relative(Path::new("Modules/_io/fileio.c")));
        assert!(!matcher.is_source_file_relative(Path::new("Modules/test_io.c")));
    }

    #[rstest]
    fn new_with_invalid_include_pattern() {
        let config = create_config(&["**/*.{c,h"], &[]);

        let err = FileMatcher::new(PathBuf::from("/src"), &config).unwrap_err();

        assert!(matches!(err, MatcherError::InvalidIncludePattern { .. }));
    }

    #[rstest]
    fn new_with_invalid_exclude_pattern() {
        let config = create_config(&["**/*.c"], &["[invalid"]);

        let err = FileMatcher::new(PathBuf::from("/src"), &config).unwrap_err();

        assert!(matches!(err, MatcherError::InvalidExcludePattern { .. }));
    }

    #[rstest]
    fn source_root_accessor() {
        let matcher = FileMatcher::new(PathBuf::from("/cpython"), &ImporterConfig::default())
            .expect("valid patterns");

        assert_eq!(matcher.source_root(), Path::new("/cpython"));
    }
}
