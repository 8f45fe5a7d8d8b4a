//! Producers and consumers of store contents outside the core.
/// CPython C source scraper
pub mod cpython;
/// gettext PO interchange
pub mod po;

pub use cpython::{
    CPythonImporter,
    ImportError,
};
pub use po::{
    PoEntry,
    PoError,
    export_po,
    import_po,
    parse_po,
};
