//! printf-style placeholder scanning.

use std::iter::Peekable;
use std::str::CharIndices;

/// Conversion characters recognised by default.
///
/// Covers C printf plus the extensions `PyErr_Format` accepts (`R`, `S`, `U`, `V`, `A`).
pub const DEFAULT_CONVERSIONS: &str = "diouxXeEfFgGcrsaASRUVp";

/// Flag characters that may follow `%`.
pub const FLAG_CHARS: &str = "-+ #0";

/// Length modifier characters (`hh`, `l`, `ll`, `z`, ...).
pub const LENGTH_CHARS: &str = "hlLqjzt";

/// Conversions whose precision truncates the rendered value.
const STRING_CONVERSIONS: &str = "sraASRUV";

/// One directive such as `%-10.200s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The directive exactly as written in the template.
    pub raw: String,
    pub left_align: bool,
    /// `None` when absent or given as `*`.
    pub width: Option<usize>,
    /// `None` when absent or given as `*`. An empty precision (`%.s`) is zero.
    pub precision: Option<usize>,
    pub conversion: char,
}

impl Placeholder {
    /// Returns true if precision limits the number of characters printed.
    #[must_use]
    pub fn is_string_like(&self) -> bool {
        STRING_CONVERSIONS.contains(self.conversion)
    }
}

/// A piece of a template: literal text or a placeholder.
///
/// `%%` is already collapsed to `%` inside literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Placeholder grammar with a configurable conversion set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSyntax {
    /// Characters accepted as the terminating conversion.
    conversions: String,
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        Self { conversions: DEFAULT_CONVERSIONS.to_string() }
    }
}

impl PlaceholderSyntax {
    #[must_use]
    pub fn new(conversions: impl Into<String>) -> Self {
        Self { conversions: conversions.into() }
    }

    #[must_use]
    pub fn conversions(&self) -> &str {
        &self.conversions
    }

    /// Splits a template into literal and placeholder segments, in order.
    ///
    /// Adjacent literal text is merged, so two placeholders are always
    /// separated by at most one literal. A `%` that does not start a valid
    /// directive is kept as literal text.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.next_if(|&(_, next)| next == '%').is_some() {
                literal.push('%');
                continue;
            }

            let mut probe = chars.clone();
            let Some(mut placeholder) = self.scan_directive(&mut probe) else {
                literal.push('%');
                continue;
            };
            let end = probe.peek().map_or(text.len(), |&(index, _)| index);
            placeholder.raw = text.get(start..end).unwrap_or_default().to_string();
            chars = probe;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(placeholder));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        segments
    }

    /// Returns the placeholders of a template in order of occurrence.
    #[must_use]
    pub fn placeholders(&self, text: &str) -> Vec<Placeholder> {
        self.parse(text)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(placeholder) => Some(placeholder),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        self.placeholders(text).len()
    }

    /// Scans flags, width, precision, length and conversion after a `%`.
    ///
    /// `raw` is left empty; the caller fills it from the source text.
    fn scan_directive(&self, chars: &mut Peekable<CharIndices<'_>>) -> Option<Placeholder> {
        let mut left_align = false;
        while let Some((_, flag)) = chars.next_if(|&(_, c)| FLAG_CHARS.contains(c)) {
            left_align |= flag == '-';
        }

        let width =
            if chars.next_if(|&(_, c)| c == '*').is_some() { None } else { scan_digits(chars) };

        let precision = if chars.next_if(|&(_, c)| c == '.').is_some() {
            if chars.next_if(|&(_, c)| c == '*').is_some() {
                None
            } else {
                // printf treats a bare `.` as precision zero
                Some(scan_digits(chars).unwrap_or(0))
            }
        } else {
            None
        };

        for _ in 0..2 {
            if chars.next_if(|&(_, c)| LENGTH_CHARS.contains(c)).is_none() {
                break;
            }
        }

        let (_, conversion) = chars.next_if(|&(_, c)| self.conversions.contains(c))?;
        Some(Placeholder { raw: String::new(), left_align, width, precision, conversion })
    }
}

/// Consumes a run of ASCII digits, saturating at `usize::MAX`.
///
/// Returns `None` only when there are no digits.
fn scan_digits(chars: &mut Peekable<CharIndices<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some((_, digit)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        let digit = digit.to_digit(10).and_then(|d| usize::try_from(d).ok()).unwrap_or_default();
        value = Some(value.unwrap_or_default().saturating_mul(10).saturating_add(digit));
    }
    value
}
