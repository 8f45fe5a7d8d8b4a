//! Substitution of extracted values into a (translated) template.

use super::placeholder::{
    Placeholder,
    PlaceholderSyntax,
    Segment,
};

/// Widest field a placeholder may pad to.
pub const MAX_WIDTH: usize = 65_535;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Template '{template}' has {expected} placeholder(s) but {provided} value(s) were given")]
    ArgumentCount { template: String, expected: usize, provided: usize },

    #[error("Template '{template}' asks for width {width}, the limit is {}", MAX_WIDTH)]
    Width { template: String, width: usize },
}

/// Renders `template` by substituting `values` into its placeholders in order.
///
/// The placeholder count and field widths are checked before anything is
/// written, so bad data never yields partial output. Width pads and precision
/// truncates string conversions; the value text is otherwise used verbatim
/// whatever the conversion character.
pub fn render<S: AsRef<str>>(
    syntax: &PlaceholderSyntax,
    template: &str,
    values: &[S],
) -> Result<String, RenderError> {
    let segments = syntax.parse(template);
    let expected =
        segments.iter().filter(|segment| matches!(segment, Segment::Placeholder(_))).count();
    if expected != values.len() {
        return Err(RenderError::ArgumentCount {
            template: template.to_string(),
            expected,
            provided: values.len(),
        });
    }

    if let Some(width) = segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => placeholder.width,
            Segment::Literal(_) => None,
        })
        .find(|&width| width > MAX_WIDTH)
    {
        return Err(RenderError::Width { template: template.to_string(), width });
    }

    let mut values = values.iter();
    let mut output = String::with_capacity(template.len());
    for segment in &segments {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Placeholder(placeholder) => {
                let value = values.next().map_or("", AsRef::as_ref);
                output.push_str(&format_value(placeholder, value));
            }
        }
    }
    Ok(output)
}

/// Applies precision and width of `placeholder` to `value`.
fn format_value(placeholder: &Placeholder, value: &str) -> String {
    let value: String = match placeholder.precision {
        Some(precision) if placeholder.is_string_like() => value.chars().take(precision).collect(),
        _ => value.to_string(),
    };

    let padding = placeholder
        .width
        .map_or(0, |width| width.saturating_sub(value.chars().count()))
        .min(MAX_WIDTH);
    if padding == 0 {
        return value;
    }

    let fill = " ".repeat(padding);
    if placeholder.left_align { value + &fill } else { fill + &value }
}
