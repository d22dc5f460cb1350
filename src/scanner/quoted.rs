// src/scanner/quoted.rs

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single,
    Double,
}

/// Reads the opening quote at `pos` and returns it with its width in bytes.
///
/// A backslash-escaped double quote (`\"`, as found in JSON embedded in
/// HTML) reads as a plain double quote.
fn quote_at(content: &str, pos: usize) -> Option<(Quote, usize)> {
    let bytes = content.as_bytes();
    match bytes.get(pos)? {
        b'\'' => Some((Quote::Single, 1)),
        b'"' => Some((Quote::Double, 1)),
        b'\\' if bytes.get(pos + 1) == Some(&b'"') => Some((Quote::Double, 2)),
        _ => None,
    }
}

pub fn has_quote_at(content: &str, pos: usize) -> bool {
    quote_at(content, pos).is_some()
}

/// Extracts the quoted attribute value that opens at `pos`.
///
/// Returns the value and the offset just past the closing quote. Both a
/// missing opening quote and a missing closing quote are `MalformedMarkup`.
pub fn extract_quoted(content: &str, pos: usize) -> AppResult<(String, usize)> {
    let (quote, width) = quote_at(content, pos)
        .ok_or_else(|| AppError::malformed("expected an opening quote", content, pos))?;
    let start = pos + width;
    let rest = &content[start..];

    let (value_end, close_end) = match quote {
        Quote::Single => rest.find('\'').map(|i| (i, i + 1)),
        Quote::Double => rest.find('"').map(|i| {
            if i > 0 && rest.as_bytes()[i - 1] == b'\\' {
                (i - 1, i + 1)
            } else {
                (i, i + 1)
            }
        }),
    }
    .ok_or_else(|| AppError::malformed("unterminated quoted value", content, start))?;

    let value = rest[..value_end].replace("\\\"", "\"");
    Ok((value, start + close_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_double_and_single_quotes() {
        let content = r#"<a href="notes.pdf">x</a>"#;
        let (value, end) = extract_quoted(content, 8).unwrap();
        assert_eq!(value, "notes.pdf");
        assert_eq!(&content[end..end + 1], ">");

        let content = "<a href='a b.pdf' class=x>";
        let (value, end) = extract_quoted(content, 8).unwrap();
        assert_eq!(value, "a b.pdf");
        assert_eq!(end, 17);
    }

    #[test]
    fn test_extract_backslash_escaped_quotes() {
        let content = r#"data-src=\"http://x/y\" data-srclang=\"en\""#;
        let (value, end) = extract_quoted(content, 9).unwrap();
        assert_eq!(value, "http://x/y");
        assert_eq!(&content[end..end + 14], " data-srclang=");
    }

    #[test]
    fn test_single_quoted_value_keeps_escaped_double_quote_as_plain() {
        let (value, _) = extract_quoted(r#"'say \"hi\"'"#, 0).unwrap();
        assert_eq!(value, r#"say "hi""#);
    }

    #[test]
    fn test_missing_opening_quote_is_malformed() {
        let err = extract_quoted("<a href=notes.pdf>", 8).unwrap_err();
        assert!(matches!(err, AppError::MalformedMarkup { .. }));
        assert!(!has_quote_at("<a href=notes.pdf>", 8));
        // past the end of the content
        assert!(extract_quoted("<a href=", 8).is_err());
    }

    #[test]
    fn test_unterminated_value_is_malformed() {
        let err = extract_quoted(r#"<a href="notes.pdf>"#, 8).unwrap_err();
        match err {
            AppError::MalformedMarkup { reason, .. } => assert!(reason.contains("unterminated")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_value() {
        let (value, end) = extract_quoted(r#"src="" next"#, 4).unwrap();
        assert_eq!(value, "");
        assert_eq!(end, 6);
    }
}
