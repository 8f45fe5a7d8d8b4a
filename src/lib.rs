//! exc-i18n
//!
//! Deformats runtime error messages back into the printf-style template that
//! produced them and renders the extracted values into a translated template.
//!
//! ```
//! use exc_i18n::{Template, TemplateStore, TranslationRecord, TranslationStore, Translator};
//!
//! let templates: TemplateStore =
//!     [Template::new("NameError", "name %s is not defined")].into_iter().collect();
//! let translations: TranslationStore = [TranslationRecord::new(
//!     "NameError",
//!     "name %s is not defined",
//!     "es",
//!     "el nombre %s no está definido",
//! )]
//! .into_iter()
//! .collect();
//!
//! let translator = Translator::new(templates, translations).with_language("es");
//! assert_eq!(
//!     translator.translate("NameError", "name 'x' is not defined").ok().as_deref(),
//!     Some("el nombre 'x' no está definido"),
//! );
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod import;
pub mod matcher;
pub mod store;
pub mod translator;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use error::TranslateError;
pub use matcher::Matcher;
pub use store::{
    StoreError,
    TemplateStore,
    TranslationStore,
};
pub use translator::Translator;
pub use types::{
    MatchResult,
    Template,
    TranslationRecord,
};
