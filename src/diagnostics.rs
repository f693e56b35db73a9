//! Load-error diagnostics with source context.
//!
//! Wraps a [`LoadError`] into a `miette` diagnostic that points at the offending part of the input text: the
//! parse position for malformed text, or the key of the rejected field.
//!
//! Keys are located by scanning the text for the quoted key followed by a colon. The loader checks accounts in
//! index order and stops at the first failure, so every account before the failing one carries all of its
//! keys, and counting occurrences after `LabUserDatas` finds the right entry.
//!
//! The source shown in a diagnostic is the input with every sensitive value (see [`keys::FieldInfo::sensitive`])
//! replaced by `*` of the same byte length. Spans computed on the raw text stay valid on the masked text.

use std::fmt;
use std::path::Path;

use cachecompat_core::{Absence, LoadError, keys};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource};
use thiserror::Error;

/// A load failure bound to the text it came from.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(cachecompat::load))]
pub struct InputDiagnostic {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label(collection)]
    labels: Vec<LabeledSpan>,
    #[help]
    help: Option<String>,
}

impl InputDiagnostic {
    pub fn new(path: &Path, raw: &str, error: &LoadError) -> Self {
        let labels = locate(raw, error)
            .map(|(offset, len)| LabeledSpan::new(Some(error.kind().to_string()), offset, len))
            .into_iter()
            .collect();

        InputDiagnostic {
            message: error.to_string(),
            src: NamedSource::new(path.display().to_string(), mask_sensitive(raw)),
            labels,
            help: Some(help_for(error)),
        }
    }

    /// Byte spans highlighted in the source.
    pub fn labels(&self) -> &[LabeledSpan] {
        &self.labels
    }
}

/// Render with the terminal's default theme.
pub fn render(diagnostic: &InputDiagnostic) -> String {
    render_with(GraphicalReportHandler::new(), diagnostic)
}

/// Render without colors or line wrapping, for logs and tests.
pub fn render_plain(diagnostic: &InputDiagnostic) -> String {
    render_with(
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor()).with_width(400),
        diagnostic,
    )
}

fn render_with(handler: GraphicalReportHandler, diagnostic: &InputDiagnostic) -> String {
    let mut out = String::new();
    match handler.render_report(&mut out, diagnostic) {
        Ok(()) => out,
        Err(fmt::Error) => diagnostic.to_string(),
    }
}

/// Byte span `(offset, len)` of the text `error` is about, when it can be found.
///
/// Absent fields and a wrongly-shaped root have nothing to point at and yield `None`.
pub fn locate(raw: &str, error: &LoadError) -> Option<(usize, usize)> {
    match error {
        LoadError::MalformedInput { line, column, .. } => {
            let offset = offset_of(raw, *line, *column);
            let len = raw[offset..].chars().next().map_or(0, char::len_utf8);
            Some((offset, len))
        }
        LoadError::MissingField {
            absence: Absence::Absent,
            ..
        } => None,
        LoadError::MissingField { field, .. } | LoadError::TypeMismatch { field, .. } => {
            if field == keys::ROOT {
                return None;
            }
            locate_key(raw, field)
        }
    }
}

/// Find the quoted key for a field path such as `Scope` or `LabUserDatas[1].ClientId`.
fn locate_key(raw: &str, field: &str) -> Option<(usize, usize)> {
    let (top, rest) = match field.split_once('[') {
        Some((top, rest)) => (top, Some(rest)),
        None => (field, None),
    };
    let top_at = find_key(raw, top, 0)?;

    let Some((index, sub)) = rest.and_then(|r| r.split_once("].")) else {
        // Top-level field, or a whole account entry: point at the top-level key
        return Some((top_at, top.len() + 2));
    };
    let index: usize = index.parse().ok()?;

    let mut from = top_at;
    let mut found = None;
    for _ in 0..=index {
        let at = find_key(raw, sub, from)?;
        found = Some(at);
        from = at + 1;
    }
    found.map(|at| (at, sub.len() + 2))
}

/// Byte offset of the next `"key"` at or after `from` that is used as an object key.
fn find_key(raw: &str, key: &str, from: usize) -> Option<usize> {
    let quoted = format!("\"{}\"", key);
    let mut from = from;
    loop {
        let at = raw.get(from..)?.find(&quoted)? + from;
        let after = at + quoted.len();
        if raw[after..].trim_start().starts_with(':') {
            return Some(at);
        }
        from = after;
    }
}

/// Copy of `raw` with the string value of every sensitive key overwritten by `*`.
///
/// Masking is byte-for-byte (a multi-byte char becomes that many `*`), so offsets into `raw` stay valid. An
/// unterminated value is masked to the end of the text.
pub fn mask_sensitive(raw: &str) -> String {
    let mut masked = raw.as_bytes().to_vec();
    for info in keys::FIELDS.iter().filter(|f| f.sensitive) {
        let mut from = 0;
        while let Some(at) = find_key(raw, info.key, from) {
            let after_key = at + info.key.len() + 2;
            from = after_key;
            let Some(value_start) = string_value_start(raw, after_key) else {
                continue;
            };
            let value_end = string_value_end(raw, value_start);
            masked[value_start..value_end].fill(b'*');
            from = value_end;
        }
    }
    // Only whole UTF-8 sequences inside string values were replaced by ASCII
    String::from_utf8(masked).unwrap_or_else(|_| "*".repeat(raw.len()))
}

/// Offset just past the opening quote of the string value following a key at `after_key`.
fn string_value_start(raw: &str, after_key: usize) -> Option<usize> {
    let rest = raw[after_key..].trim_start().strip_prefix(':')?;
    let value = rest.trim_start().strip_prefix('"')?;
    Some(raw.len() - value.len())
}

/// Offset of the closing quote of a string value starting at `start`, or the end of the text.
fn string_value_end(raw: &str, start: usize) -> usize {
    let bytes = raw.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Convert a 1-based line/column into a byte offset clamped to a char boundary.
fn offset_of(raw: &str, line: usize, column: usize) -> usize {
    let line_start: usize = raw
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(raw.len());
    while !raw.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn help_for(error: &LoadError) -> String {
    match error {
        LoadError::MalformedInput { .. } => "the test input must be a single JSON object".to_string(),
        LoadError::MissingField {
            field,
            absence: Absence::Absent,
        } => format!("add `{}` to the test input", field),
        LoadError::MissingField {
            field,
            absence: Absence::Empty,
        } => format!("`{}` must not be empty", field),
        LoadError::TypeMismatch { field, expected, .. } => format!("`{}` must be a {}", field, expected),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cachecompat_core::load;

    const TWO_USERS: &str = r#"{
  "Scope": "User.Read",
  "CacheFilePath": "cache.bin",
  "ResultsFilePath": "results.json",
  "LabUserDatas": [
    {"Upn": "a@b.com", "Password": "p", "Authority": "https://login.example.com/t", "ClientId": "one"},
    {"Upn": "c@d.com", "Password": "p", "Authority": "https://login.example.com/t", "ClientId": 2}
  ]
}"#;

    fn span_text<'a>(raw: &'a str, err: &LoadError) -> &'a str {
        let (offset, len) = locate(raw, err).unwrap();
        &raw[offset..offset + len]
    }

    #[test]
    fn test_locates_second_account_key() {
        let err = load(TWO_USERS).unwrap_err();
        assert_eq!(err.field(), Some("LabUserDatas[1].ClientId"));
        let (offset, _) = locate(TWO_USERS, &err).unwrap();
        assert_eq!(span_text(TWO_USERS, &err), "\"ClientId\"");
        // Must be the second occurrence, not the first
        assert!(offset > TWO_USERS.find("\"one\"").unwrap());
    }

    #[test]
    fn test_locates_top_level_key() {
        let raw = r#"{"Scope": "", "CacheFilePath": "c", "ResultsFilePath": "r", "LabUserDatas": []}"#;
        let err = load(raw).unwrap_err();
        assert_eq!(span_text(raw, &err), "\"Scope\"");
    }

    #[test]
    fn test_absent_field_has_no_span() {
        let raw = r#"{"CacheFilePath": "c"}"#;
        let err = load(raw).unwrap_err();
        assert_eq!(locate(raw, &err), None);
        let diagnostic = InputDiagnostic::new(Path::new("input.json"), raw, &err);
        assert!(diagnostic.labels().is_empty());
    }

    #[test]
    fn test_malformed_points_at_offending_line() {
        let raw = "{\n  \"Scope\": \"s\",\n  \"CacheFilePath\": oops\n}";
        let err = load(raw).unwrap_err();
        let (offset, _) = locate(raw, &err).unwrap();
        let line_start = raw.find("  \"CacheFilePath\"").unwrap();
        assert!(offset >= line_start, "offset {} before line start {}", offset, line_start);
    }

    #[test]
    fn test_malformed_empty_input_span_is_in_bounds() {
        let err = load("").unwrap_err();
        assert_eq!(locate("", &err), Some((0, 0)));
    }

    #[test]
    fn test_offset_of_clamps_to_char_boundary() {
        let raw = "{\"é\"";
        let offset = offset_of(raw, 1, 4);
        assert!(raw.is_char_boundary(offset));
    }

    // ========================================
    // Sensitive values
    // ========================================

    #[test]
    fn test_single_line_render_masks_every_password() {
        let raw = r#"{"Scope":"User.Read","CacheFilePath":"/tmp/cache.bin","ResultsFilePath":"/tmp/results.json","LabUserDatas":[{"Upn":"a@b.com","Password":"TOPSECRET","Authority":"https://login.example.com/tenant","ClientId":""},{"Upn":"c@d.com","Password":"ALSOSECRET","Authority":"https://login.example.com/tenant","ClientId":"cid"}]}"#;
        let err = load(raw).unwrap_err();
        assert_eq!(err.field(), Some("LabUserDatas[0].ClientId"));

        let rendered = render_plain(&InputDiagnostic::new(Path::new("input.json"), raw, &err));
        assert!(!rendered.contains("TOPSECRET"), "{}", rendered);
        assert!(!rendered.contains("ALSOSECRET"), "{}", rendered);
        assert!(rendered.contains("*********"), "{}", rendered);
    }

    #[test]
    fn test_context_lines_never_show_password() {
        let raw = include_str!("../tests/fixtures/invalid/relative_authority.json");
        let err = load(raw).unwrap_err();
        assert_eq!(err.field(), Some("LabUserDatas[0].Authority"));

        let rendered = render_plain(&InputDiagnostic::new(Path::new("relative_authority.json"), raw, &err));
        assert!(!rendered.contains("lab-secret-one"), "{}", rendered);
        assert!(rendered.contains("organizations"), "{}", rendered);
    }

    #[test]
    fn test_mask_preserves_byte_offsets() {
        let raw = "{\"Password\" : \"p\u{e9}\\\"x\", \"Upn\":\"a@b.com\"}";
        let masked = mask_sensitive(raw);
        assert_eq!(masked.len(), raw.len());
        assert_eq!(masked.find("\"Upn\""), raw.find("\"Upn\""));
        assert!(masked.contains("\"Password\" : \"******\""), "{}", masked);
    }

    #[test]
    fn test_mask_handles_unterminated_password() {
        let raw = r#"{"Password": "hunter"#;
        let masked = mask_sensitive(raw);
        assert_eq!(masked, r#"{"Password": "******"#);
    }

    #[test]
    fn test_key_text_inside_value_is_not_a_key() {
        let raw = r#"{"Scope":"s","CacheFilePath":"c","ResultsFilePath":"r","LabUserDatas":[{"ClientId":"Upn","Upn":"","Password":"p","Authority":"https://login.example.com/t"}]}"#;
        let err = load(raw).unwrap_err();
        assert_eq!(err.field(), Some("LabUserDatas[0].Upn"));
        let (offset, _) = locate(raw, &err).unwrap();
        assert_eq!(offset, raw.find("\"Upn\":").unwrap());
    }

    #[test]
    fn test_render_plain_mentions_path_field_and_help() {
        let err = load(TWO_USERS).unwrap_err();
        let diagnostic = InputDiagnostic::new(Path::new("inputs/msal_v3.json"), TWO_USERS, &err);
        let rendered = render_plain(&diagnostic);
        assert!(rendered.contains("inputs/msal_v3.json"), "{}", rendered);
        assert!(rendered.contains("LabUserDatas[1].ClientId"), "{}", rendered);
        assert!(rendered.contains("must be a string"), "{}", rendered);
    }
}
