//! In-memory template and translation stores.
/// Template store
mod template;
/// Translation store
mod translation;

pub use template::TemplateStore;
use thiserror::Error;
pub use translation::TranslationStore;

/// Errors raised while dumping or loading a store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access store data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize store: {0}")]
    Serialization(#[from] serde_json::Error),
}
