//! Application state embedded in server-rendered pages.

use serde::Serialize;

use crate::SsrError;

/// Serializes `state` to JSON that can be inlined in a `<script>` tag.
///
/// `<`, `>` and `&` are written as unicode escapes so the payload can't close
/// the script element, and U+2028/U+2029 are escaped because they terminate
/// lines in older script parsers.
///
/// # Errors
///
/// Returns [`SsrError::State`] when `state` can't be serialized.
pub fn serialize_state<T: Serialize + ?Sized>(state: &T) -> Result<String, SsrError> {
    let json = serde_json::to_string(state)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct State<'a> {
        title: &'a str,
        count: u32,
    }

    #[test]
    fn escapes_script_breaking_characters() {
        let state = State {
            title: "</script><b>&\u{2028}",
            count: 3,
        };
        let json = serialize_state(&state).unwrap();
        assert_eq!(
            json,
            r#"{"title":"\u003c/script\u003e\u003cb\u003e\u0026\u2028","count":3}"#
        );
        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back["title"], "</script><b>&\u{2028}");
    }
}
