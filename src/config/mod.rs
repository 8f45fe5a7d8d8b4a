//! Settings file, validation and locale handling.
/// Locale to language code
mod locale;
/// Configuration manager
mod manager;
/// Source file pattern matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use locale::{
    LOCALE_ENV_VARS,
    language_from_env,
    language_from_locale,
};
pub use manager::{
    CONFIG_FILE_NAME,
    ConfigManager,
};
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    ConfigError,
    I18nSettings,
    ImporterConfig,
    PlaceholderConfig,
    ValidationError,
};
