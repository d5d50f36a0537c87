//! Bulletin board response sanitization (spec §4.A "Bulletins").
//!
//! NiFi occasionally emits raw, unescaped newlines inside JSON string
//! literals in `/flow/bulletin-board` responses. `serde_json` rejects that
//! outright, so the response must be fetched as raw text and have embedded
//! newlines escaped before parsing.

/// Escape bare `\n`/`\r` that occur *inside* a JSON string literal, leaving
/// structural whitespace (between tokens) untouched. Tracks string-literal
/// state and escape-sequence state by scanning character by character.
pub fn sanitize_bulletin_json(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in raw.chars() {
        if in_string {
            if escaped {
                out.push(ch);
                escaped = false;
                continue;
            }
            match ch {
                '\\' => {
                    out.push(ch);
                    escaped = true;
                }
                '"' => {
                    out.push(ch);
                    in_string = false;
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                _ => out.push(ch),
            }
        } else {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_newline_inside_string_literal() {
        let raw = "{\"message\": \"line one\nline two\"}";
        let sanitized = sanitize_bulletin_json(raw);
        let parsed: serde_json::Value = serde_json::from_str(&sanitized).unwrap();
        assert_eq!(parsed["message"], "line one\nline two");
    }

    #[test]
    fn leaves_structural_whitespace_alone() {
        let raw = "{\n  \"message\": \"ok\"\n}";
        let sanitized = sanitize_bulletin_json(raw);
        let parsed: serde_json::Value = serde_json::from_str(&sanitized).unwrap();
        assert_eq!(parsed["message"], "ok");
    }

    #[test]
    fn respects_escaped_quotes_within_string() {
        let raw = "{\"message\": \"he said \\\"hi\\\"\nbye\"}";
        let sanitized = sanitize_bulletin_json(raw);
        let parsed: serde_json::Value = serde_json::from_str(&sanitized).unwrap();
        assert_eq!(parsed["message"], "he said \"hi\"\nbye");
    }
}
