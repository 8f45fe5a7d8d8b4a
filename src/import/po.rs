//! gettext PO interchange.
//!
//! Templates are exported with their category as the reference comment
//! (`#: NameError`) and the template text as `msgid`. Translated PO files are
//! read back into [`TranslationRecord`]s for one language.

use std::collections::BTreeMap;
use std::io::{
    BufRead,
    Write,
};

use thiserror::Error;

use crate::store::TemplateStore;
use crate::types::TranslationRecord;

#[derive(Error, Debug)]
pub enum PoError {
    #[error("Failed to access PO data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid PO syntax at line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl PoError {
    /// Shorthand for a syntax error.
    fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax { line, message: message.into() }
    }
}

/// One PO entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoEntry {
    /// Values of `#:` comments.
    pub references: Vec<String>,
    pub flags: Vec<String>,
    pub context: Option<String>,
    pub msgid: String,
    /// `msgstr`, or `msgstr[0]` for plural entries.
    pub msgstr: String,
}

impl PoEntry {
    #[must_use]
    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|flag| flag == "fuzzy")
    }

    /// Categories named by the entry: its references, then its context.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.references.iter().map(String::as_str).collect();
        if let Some(context) = &self.context
            && !categories.contains(&context.as_str())
        {
            categories.push(context);
        }
        categories
    }
}

/// Field receiving continuation lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    Str,
    /// `msgid_plural` and `msgstr[n]` for n > 0, which are not kept.
    Ignored,
}

/// Entry being assembled while parsing.
#[derive(Debug, Default)]
struct PendingEntry {
    /// Entry fields collected so far.
    entry: PoEntry,
    /// Set once a `msgid` keyword was read.
    has_msgid: bool,
    /// Target of the last keyword.
    field: Option<Field>,
}

impl PendingEntry {
    /// Appends a string to the current field.
    fn append(&mut self, line: usize, text: &str) -> Result<(), PoError> {
        match self.field {
            Some(Field::Context) => {
                self.entry.context.get_or_insert_with(String::new).push_str(text);
            }
            Some(Field::Id) => self.entry.msgid.push_str(text),
            Some(Field::Str) => self.entry.msgstr.push_str(text),
            Some(Field::Ignored) => {}
            None => return Err(PoError::syntax(line, "string without a keyword")),
        }
        Ok(())
    }

    /// Moves the completed entry into `entries`, if there is one.
    fn finish(&mut self, line: usize, entries: &mut Vec<PoEntry>) -> Result<(), PoError> {
        let pending = std::mem::take(self);
        if pending.has_msgid {
            entries.push(pending.entry);
        } else if pending.entry.context.is_some() {
            return Err(PoError::syntax(line, "msgctxt without msgid"));
        }
        Ok(())
    }
}

/// Parses every entry of a PO file, including the header entry.
pub fn parse_po<R: BufRead>(reader: R) -> Result<Vec<PoEntry>, PoError> {
    let mut entries = Vec::new();
    let mut pending = PendingEntry::default();
    let mut number = 0;

    for line in reader.lines() {
        number += 1;
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            pending.finish(number, &mut entries)?;
            continue;
        }
        if line.starts_with("#~") {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if pending.has_msgid {
                pending.finish(number, &mut entries)?;
            }
            parse_comment(comment, &mut pending.entry);
            continue;
        }
        if line.starts_with('"') {
            pending.append(number, &unquote(number, line)?)?;
            continue;
        }

        let (keyword, value) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| PoError::syntax(number, format!("unexpected '{line}'")))?;
        let field = match keyword {
            "msgctxt" => Field::Context,
            "msgid" => Field::Id,
            "msgstr" | "msgstr[0]" => Field::Str,
            "msgid_plural" => Field::Ignored,
            _ if keyword.starts_with("msgstr[") => Field::Ignored,
            _ => return Err(PoError::syntax(number, format!("unknown keyword '{keyword}'"))),
        };

        match field {
            Field::Context | Field::Id if pending.has_msgid => {
                pending.finish(number, &mut entries)?;
            }
            Field::Str if !pending.has_msgid => {
                return Err(PoError::syntax(number, "msgstr without msgid"));
            }
            _ => {}
        }
        if field == Field::Context {
            pending.entry.context = Some(String::new());
        }
        pending.has_msgid |= field == Field::Id;
        pending.field = Some(field);
        pending.append(number, &unquote(number, value.trim())?)?;
    }

    pending.finish(number, &mut entries)?;
    Ok(entries)
}

/// Reads reference and flag comments into `entry`; other comments are ignored.
fn parse_comment(comment: &str, entry: &mut PoEntry) {
    if let Some(references) = comment.strip_prefix(':') {
        entry.references.extend(references.split_whitespace().map(strip_line_number));
    } else if let Some(flags) = comment.strip_prefix(',') {
        entry.flags.extend(
            flags.split(',').map(str::trim).filter(|flag| !flag.is_empty()).map(String::from),
        );
    }
}

/// `NameError:12` -> `NameError`; references without a line number are kept.
fn strip_line_number(reference: &str) -> String {
    match reference.rsplit_once(':') {
        Some((name, line)) if !name.is_empty() && line.chars().all(|c| c.is_ascii_digit()) => {
            name.to_string()
        }
        _ => reference.to_string(),
    }
}

/// Decodes a double-quoted PO string.
fn unquote(line: usize, quoted: &str) -> Result<String, PoError> {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| PoError::syntax(line, format!("expected a quoted string, got {quoted}")))?;

    let mut output = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '"' {
            return Err(PoError::syntax(line, "unescaped quote"));
        }
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some('r') => output.push('\r'),
            Some(escaped @ ('"' | '\\')) => output.push(escaped),
            other => {
                let escaped = other.map(String::from).unwrap_or_default();
                return Err(PoError::syntax(line, format!("invalid escape '\\{escaped}'")));
            }
        }
    }
    Ok(output)
}

/// Encodes `text` as a double-quoted PO string.
fn quote(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 2);
    output.push('"');
    for c in text.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\t' => output.push_str("\\t"),
            '\r' => output.push_str("\\r"),
            _ => output.push(c),
        }
    }
    output.push('"');
    output
}

/// Reads translation records for `language` from a PO file.
///
/// The header, untranslated and fuzzy entries are skipped, as are entries
/// naming no category.
pub fn import_po<R: BufRead>(
    reader: R,
    language: &str,
) -> Result<Vec<TranslationRecord>, PoError> {
    let mut records = Vec::new();
    for entry in parse_po(reader)? {
        if entry.msgid.is_empty() || entry.msgstr.is_empty() || entry.is_fuzzy() {
            continue;
        }
        let categories = entry.categories();
        if categories.is_empty() {
            tracing::warn!(msgid = %entry.msgid, "Skipping PO entry without a category reference");
            continue;
        }
        records.extend(categories.into_iter().map(|category| {
            TranslationRecord::new(category, &entry.msgid, language, &entry.msgstr)
        }));
    }
    tracing::debug!(count = records.len(), language, "Imported translations from PO");
    Ok(records)
}

/// Writes every template as an untranslated PO entry.
///
/// A text shared by several categories becomes a single entry listing all of
/// them, keeping `msgid`s unique.
pub fn export_po<W: Write>(templates: &TemplateStore, mut writer: W) -> Result<(), PoError> {
    let mut by_text: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for template in templates.iter() {
        by_text.entry(template.text.as_str()).or_default().push(template.category.as_str());
    }

    writeln!(writer, "msgid \"\"")?;
    writeln!(writer, "msgstr \"\"")?;
    writeln!(writer, "{}", quote("Content-Type: text/plain; charset=UTF-8\n"))?;

    for (text, categories) in by_text {
        writeln!(writer)?;
        writeln!(writer, "#: {}", categories.join(" "))?;
        writeln!(writer, "msgid {}", quote(text))?;
        writeln!(writer, "msgstr \"\"")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::types::Template;

    const SOME_ES: &str = r#"# Spanish translations
msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

#: NameError
msgid "name '%.200s' is not defined"
msgstr "el nombre '%.200s' no está definido"

#: ValueError TypeError
msgid "%s too long"
msgstr "%s es demasiado "
"largo"

#: SyntaxError
msgid "EOL while scanning string literal"
msgstr ""

#: KeyError
#, fuzzy
msgid "missing %s"
msgstr "falta %s"

#~ msgid "old"
#~ msgstr "viejo"
"#;

    #[rstest]
    fn parse_po_reads_entries() {
        let entries = parse_po(SOME_ES.as_bytes()).unwrap();

        assert_that!(entries.len(), eq(5));
        assert_that!(entries[0].msgid, eq(""));
        assert_that!(entries[0].msgstr, eq("Content-Type: text/plain; charset=UTF-8\n"));
        assert_that!(entries[2].references, elements_are![eq("ValueError"), eq("TypeError")]);
        assert_that!(entries[2].msgstr, eq("%s es demasiado largo"));
        assert_that!(entries[4].is_fuzzy(), eq(true));
    }

    #[rstest]
    fn import_po_skips_untranslated_and_fuzzy() {
        let records = import_po(SOME_ES.as_bytes(), "es").unwrap();

        assert_eq!(
            records,
            vec![
                TranslationRecord::new(
                    "NameError",
                    "name '%.200s' is not defined",
                    "es",
                    "el nombre '%.200s' no está definido"
                ),
                TranslationRecord::new("ValueError", "%s too long", "es", "%s es demasiado largo"),
                TranslationRecord::new("TypeError", "%s too long", "es", "%s es demasiado largo"),
            ]
        );
    }

    #[rstest]
    fn context_and_line_numbers_name_categories() {
        let po = "#: OSError:120\nmsgctxt \"IOError\"\nmsgid \"%s\"\nmsgstr \"%s!\"\n";

        let records = import_po(po.as_bytes(), "es").unwrap();

        let categories: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["OSError", "IOError"]);
    }

    #[rstest]
    fn entries_without_blank_separator() {
        let po = "#: A\nmsgid \"a\"\nmsgstr \"x\"\n#: B\nmsgid \"b\"\nmsgstr \"y\"\n";

        let entries = parse_po(po.as_bytes()).unwrap();

        assert_that!(entries.len(), eq(2));
        assert_that!(entries[1].references, elements_are![eq("B")]);
    }

    #[rstest]
    fn escapes_are_decoded() {
        let po = r#"msgid "say \"%s\"\n"
msgstr "di \"%s\"\t\\"
"#;

        let entries = parse_po(po.as_bytes()).unwrap();

        assert_that!(entries[0].msgid, eq("say \"%s\"\n"));
        assert_that!(entries[0].msgstr, eq("di \"%s\"\t\\"));
    }

    #[rstest]
    #[case::continuation_first("\"orphan\"\n", 1)]
    #[case::unknown_keyword("msgid \"a\"\nmsgfoo \"b\"\n", 2)]
    #[case::unterminated("msgid \"a\n", 1)]
    #[case::bad_escape("msgid \"a\\q\"\n", 1)]
    #[case::msgstr_first("msgstr \"a\"\n", 1)]
    fn syntax_errors_report_line(#[case] po: &str, #[case] expected_line: usize) {
        let result = parse_po(po.as_bytes());

        assert!(
            matches!(result, Err(PoError::Syntax { line, .. }) if line == expected_line),
            "unexpected result: {result:?}"
        );
    }

    #[rstest]
    fn export_po_writes_reference_and_msgid() {
        let templates: TemplateStore = [
            Template::new("ValueError", "%s too long"),
            Template::new("NameError", "%s does not exists"),
            Template::new("NameError", "%s not exists"),
            Template::new("NameError", "%s does not exists"),
        ]
        .into_iter()
        .collect();

        let mut buffer = Vec::new();
        export_po(&templates, &mut buffer).unwrap();
        let data = String::from_utf8(buffer).unwrap();

        assert_that!(
            data,
            contains_substring("#: NameError\nmsgid \"%s does not exists\"\nmsgstr \"\"")
        );
        assert_that!(data.matches("msgid \"%s does not exists\"").count(), eq(1));
        assert_that!(data, starts_with("msgid \"\"\nmsgstr \"\"\n"));
    }

    #[rstest]
    fn export_po_merges_categories_of_shared_text() {
        let templates: TemplateStore =
            [Template::new("TypeError", "bad \"%s\""), Template::new("ValueError", "bad \"%s\"")]
                .into_iter()
                .collect();

        let mut buffer = Vec::new();
        export_po(&templates, &mut buffer).unwrap();
        let data = String::from_utf8(buffer).unwrap();

        assert_that!(
            data,
            contains_substring("#: TypeError ValueError\nmsgid \"bad \\\"%s\\\"\"\n")
        );
    }

    #[rstest]
    fn exported_file_parses_back() {
        let templates: TemplateStore =
            [Template::new("NameError", "name '%.200s' is not defined")].into_iter().collect();
        let mut buffer = Vec::new();
        export_po(&templates, &mut buffer).unwrap();

        let entries = parse_po(buffer.as_slice()).unwrap();

        assert_that!(entries.len(), eq(2));
        assert_that!(entries[1].msgid, eq("name '%.200s' is not defined"));
        assert_that!(entries[1].categories(), elements_are![eq(&"NameError")]);
    }
}
