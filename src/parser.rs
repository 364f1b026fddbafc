//! Parser for the raw database files.
//!
//! Each line of `pending.data` / `completed.data` looks like
//!
//! ```text
//! [description:"buy milk" entry:"1360000000" status:"pending" tags:"home,errand" uuid:"…"]
//! ```
//!
//! Timestamps stay as raw epoch strings, which is why these files are read
//! directly instead of relying on the tool's export alone.

use crate::error::{Error, LineError, Result, Warning};
use crate::record::{Record, Value, TAGS};
use crate::tokenizer;
use std::path::Path;

/// A successfully parsed line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    /// The fields found on the line.
    pub record: Record,
    /// Tokens that were skipped.
    pub warnings: Vec<Warning>,
}

/// Parse one database line.
///
/// # Errors
///
/// Returns a [`LineError`] if the line is not bracketed or its quoting is
/// broken. Tokens without a `:` are skipped and reported as warnings.
pub fn parse_line(line: &str) -> std::result::Result<ParsedLine, LineError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(LineError::NotBracketed)?;

    let mut record = Record::new();
    let mut warnings = Vec::new();
    for token in tokenizer::split(inner)? {
        let Some((key, value)) = token.split_once(':') else {
            tracing::warn!(token = %token, "Malformed database token");
            warnings.push(Warning::MalformedToken(token));
            continue;
        };
        record.insert(key, decode_value(key, value));
    }

    Ok(ParsedLine { record, warnings })
}

fn decode_value(key: &str, raw: &str) -> Value {
    let value = raw.replace("\\/", "/");
    if key == TAGS {
        Value::Tags(value.split(',').filter(|tag| !tag.is_empty()).map(str::to_string).collect())
    } else {
        Value::Text(value)
    }
}

/// Parse the full contents of a database file.
///
/// Blank lines are ignored. Any rejected line fails the whole file.
///
/// # Errors
///
/// Returns [`Error::Format`] naming `path` and the first bad line.
pub fn parse_database(path: &Path, contents: &[u8]) -> Result<(Vec<Record>, Vec<Warning>)> {
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (index, raw) in contents.split(|&b| b == b'\n').enumerate() {
        let format_error = |reason| Error::Format { path: path.to_path_buf(), line: index + 1, reason };

        let line = std::str::from_utf8(raw).map_err(|_| format_error(LineError::InvalidUtf8))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let parsed = parse_line(line).map_err(format_error)?;
        records.push(parsed.record);
        warnings.extend(parsed.warnings);
    }

    Ok((records, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_line_fields_in_order() {
        let parsed = parse_line(
            r#"[description:"buy milk" entry:"1360000000" status:"pending" uuid:"a1b2"]"#,
        )
        .unwrap();

        let fields: Vec<(&str, String)> =
            parsed.record.iter().map(|(k, v)| (k, v.to_string())).collect();
        assert_eq!(
            fields,
            vec![
                ("description", "buy milk".to_string()),
                ("entry", "1360000000".to_string()),
                ("status", "pending".to_string()),
                ("uuid", "a1b2".to_string()),
            ]
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_parse_line_explodes_tags() {
        let parsed = parse_line(r#"[tags:"a,b,,c" uuid:"x"]"#).unwrap();
        assert_eq!(parsed.record.tags(), ["a", "b", "c"]);
    }

    #[test]
    fn test_parse_line_missing_tags_reads_empty() {
        let parsed = parse_line(r#"[uuid:"x"]"#).unwrap();
        assert!(parsed.record.tags().is_empty());
    }

    #[test]
    fn test_parse_line_unescapes_slashes() {
        let parsed = parse_line(r#"[annotation_1:"see http:\/\/example.com\/a"]"#).unwrap();
        assert_eq!(parsed.record.text("annotation_1"), Some("see http://example.com/a"));
    }

    #[test]
    fn test_parse_line_value_keeps_extra_colons() {
        let parsed = parse_line(r#"[description:"meet at 10:30"]"#).unwrap();
        assert_eq!(parsed.record.text("description"), Some("meet at 10:30"));
    }

    #[test]
    fn test_parse_line_skips_token_without_separator() {
        let parsed = parse_line(r#"[uuid:"x" garbage status:"pending"]"#).unwrap();
        assert_eq!(parsed.warnings, vec![Warning::MalformedToken("garbage".to_string())]);
        assert_eq!(parsed.record.len(), 2);
        assert_eq!(parsed.record.text("status"), Some("pending"));
    }

    #[test]
    fn test_parse_line_preserves_unknown_fields() {
        let parsed = parse_line(r#"[uuid:"x" udafield:"custom value"]"#).unwrap();
        assert_eq!(parsed.record.text("udafield"), Some("custom value"));
    }

    #[test]
    fn test_parse_line_requires_brackets() {
        assert_eq!(parse_line(r#"[uuid:"x""#), Err(LineError::NotBracketed));
        assert_eq!(parse_line(r#"uuid:"x"]"#), Err(LineError::NotBracketed));
        assert_eq!(parse_line(""), Err(LineError::NotBracketed));
    }

    #[test]
    fn test_parse_line_unterminated_quote() {
        assert_eq!(parse_line(r#"[uuid:"x]"#), Err(LineError::UnterminatedQuote));
    }

    #[test]
    fn test_parse_database_skips_blank_lines() {
        let path = PathBuf::from("/data/pending.data");
        let contents = b"[uuid:\"a\"]\n\n[uuid:\"b\"]\n";
        let (records, warnings) = parse_database(&path, contents).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].uuid(), Some("b"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_database_empty_file() {
        let (records, _) = parse_database(Path::new("pending.data"), b"").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_database_bad_line_names_file_and_line() {
        let path = PathBuf::from("/data/pending.data");
        let contents = b"[uuid:\"a\"]\n[uuid:\"b\"\n";
        match parse_database(&path, contents) {
            Err(Error::Format { path: bad, line, reason }) => {
                assert_eq!(bad, path);
                assert_eq!(line, 2);
                assert_eq!(reason, LineError::NotBracketed);
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_database_invalid_utf8() {
        let result = parse_database(Path::new("x"), b"[uuid:\"\xff\"]\n");
        assert!(matches!(result, Err(Error::Format { reason: LineError::InvalidUtf8, .. })));
    }

    fn encode(value: &str) -> String {
        let mut out = String::from("\"");
        for c in value.chars() {
            match c {
                '"' | '\\' => {
                    out.push('\\');
                    out.push(c);
                }
                '/' => out.push_str("\\/"),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }

    proptest! {
        #[test]
        fn prop_reencoded_line_keeps_fields(
            fields in proptest::collection::btree_map("[a-z_]{1,8}", "[ -~]{0,16}", 0..6)
        ) {
            let fields: Vec<(String, String)> =
                fields.into_iter().filter(|(k, _)| k != TAGS).collect();
            let line = format!(
                "[{}]",
                fields.iter().map(|(k, v)| format!("{k}:{}", encode(v))).collect::<Vec<_>>().join(" ")
            );

            let parsed = parse_line(&line).unwrap();
            prop_assert!(parsed.warnings.is_empty());
            prop_assert_eq!(parsed.record.len(), fields.len());
            for (key, value) in &fields {
                prop_assert_eq!(parsed.record.text(key), Some(value.as_str()));
            }
        }
    }
}
