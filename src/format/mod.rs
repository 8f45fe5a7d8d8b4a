//! printf-style template handling: placeholder scanning, pattern compilation and rendering.
/// Template to regex compilation
mod pattern;
/// Placeholder grammar
mod placeholder;
/// Value substitution
mod render;

pub use pattern::{
    CompiledPattern,
    PatternCompiler,
    PatternError,
};
pub use placeholder::{
    DEFAULT_CONVERSIONS,
    FLAG_CHARS,
    LENGTH_CHARS,
    Placeholder,
    PlaceholderSyntax,
    Segment,
};
pub use render::{
    MAX_WIDTH,
    RenderError,
    render,
};
