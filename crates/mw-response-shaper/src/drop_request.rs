//! Shapes a drop-request outcome into a compact summary, parsing NiFi's
//! `"N / M bytes"` queue-size string form into numeric fields (spec §4.E
//! "Drop request summary").

use serde_json::{json, Value};

/// Parses a string like `"5 / 1200 bytes"` into `(count, size_bytes)`.
/// Returns `None` if the string doesn't match the expected shape.
fn parse_count_and_size(raw: &str) -> Option<(i64, i64)> {
    let (count_part, rest) = raw.split_once('/')?;
    let count = count_part.trim().parse::<i64>().ok()?;
    let size_part = rest.trim().trim_end_matches("bytes").trim();
    let size = size_part.parse::<i64>().ok()?;
    Some((count, size))
}

pub fn shape_drop_request_summary(
    success: bool,
    message: Option<&str>,
    original_queue_size: Option<&str>,
    current_queue_size: Option<&str>,
    per_connection_results: Option<&Value>,
) -> Value {
    let original = original_queue_size.and_then(parse_count_and_size);
    let current = current_queue_size.and_then(parse_count_and_size);

    json!({
        "success": success,
        "message": message,
        "originalQueueCount": original.map(|(c, _)| c),
        "originalQueueSizeBytes": original.map(|(_, s)| s),
        "currentQueueCount": current.map(|(c, _)| c),
        "currentQueueSizeBytes": current.map(|(_, s)| s),
        "perConnectionResults": per_connection_results.cloned().unwrap_or(Value::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_count_and_size_string() {
        assert_eq!(parse_count_and_size("5 / 1200 bytes"), Some((5, 1200)));
    }

    #[test]
    fn returns_none_for_malformed_string() {
        assert_eq!(parse_count_and_size("not a queue size"), None);
    }

    #[test]
    fn shapes_successful_purge() {
        let shaped = shape_drop_request_summary(true, None, Some("5 / 1200 bytes"), Some("0 / 0 bytes"), None);
        assert_eq!(shaped["originalQueueCount"], 5);
        assert_eq!(shaped["currentQueueSizeBytes"], 0);
    }
}
