#![forbid(unsafe_code)]

//! Entity escaping for C14N output.
//!
//! Per the C14N spec:
//! - Text nodes: `&` → `&amp;`, `<` → `&lt;`, `>` → `&gt;`, `\r` → `&#xD;`
//! - Attribute values: `&` → `&amp;`, `<` → `&lt;`, `"` → `&quot;`,
//!   `\t` → `&#x9;`, `\n` → `&#xA;`, `\r` → `&#xD;`
//! - PI data: `\r` → `&#xD;`
//!
//! Everything writes straight into the output sink so the digest path
//! never materializes intermediate strings.

use crate::output::CanonicalOutput;

/// Escape text node content per C14N rules.
pub fn escape_text<O: CanonicalOutput + ?Sized>(s: &str, out: &mut O) {
    write_escaped(s, out, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#xD;"),
        _ => None,
    });
}

/// Escape attribute value content per C14N rules.
pub fn escape_attr<O: CanonicalOutput + ?Sized>(s: &str, out: &mut O) {
    write_escaped(s, out, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#x9;"),
        '\n' => Some("&#xA;"),
        '\r' => Some("&#xD;"),
        _ => None,
    });
}

/// Escape processing instruction data.
pub fn escape_pi<O: CanonicalOutput + ?Sized>(s: &str, out: &mut O) {
    write_escaped(s, out, |ch| match ch {
        '\r' => Some("&#xD;"),
        _ => None,
    });
}

/// Write `s`, replacing each character `subst` maps with its entity.
/// Untouched runs go out as single slices.
fn write_escaped<O, F>(s: &str, out: &mut O, subst: F)
where
    O: CanonicalOutput + ?Sized,
    F: Fn(char) -> Option<&'static str>,
{
    let mut run_start = 0;
    for (idx, ch) in s.char_indices() {
        if let Some(entity) = subst(ch) {
            if run_start < idx {
                out.write_str(&s[run_start..idx]);
            }
            out.write_str(entity);
            run_start = idx + ch.len_utf8();
        }
    }
    if run_start < s.len() {
        out.write_str(&s[run_start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> String {
        let mut out = Vec::new();
        escape_text(s, &mut out);
        String::from_utf8(out).unwrap()
    }

    fn attr(s: &str) -> String {
        let mut out = Vec::new();
        escape_attr(s, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(text("hello"), "hello");
        assert_eq!(text("a&b<c>d"), "a&amp;b&lt;c&gt;d");
        assert_eq!(text("line\rend"), "line&#xD;end");
        // Quotes and tabs pass through in text content
        assert_eq!(text("a\"b\tc"), "a\"b\tc");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(attr("hello"), "hello");
        assert_eq!(attr("a&b\"c"), "a&amp;b&quot;c");
        assert_eq!(attr("a\tb\nc\rd"), "a&#x9;b&#xA;c&#xD;d");
        assert_eq!(attr("<"), "&lt;");
        // `>` is not escaped in attribute values
        assert_eq!(attr(">"), ">");
    }

    #[test]
    fn test_escape_pi() {
        let mut out = Vec::new();
        escape_pi("a\rb", &mut out);
        assert_eq!(String::from_utf8(out).unwrap(), "a&#xD;b");
    }

    #[test]
    fn test_multibyte_runs() {
        assert_eq!(text("å&ö"), "å&amp;ö");
    }
}
