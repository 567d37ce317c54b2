//! Normalization of upstream payloads.

use serde_json::Value;

/// Pull the generated text out of an upstream payload.
///
/// Order: top-level `output_text`, then `output[0].content[0].text`, then the
/// whole payload as compact JSON. A field counts as present unless it is
/// missing or `null`; non-string values are serialized.
pub fn extract_output(payload: &Value) -> String {
    let nested = || {
        payload
            .get("output")
            .and_then(|o| o.get(0))
            .and_then(|o| o.get("content"))
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("text"))
    };

    match payload
        .get("output_text")
        .filter(|v| !v.is_null())
        .or_else(|| nested().filter(|v| !v.is_null()))
    {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => payload.to_string(),
    }
}

/// First `limit` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_output_text() {
        let payload = json!({"output_text": "hello", "output": [{"content": [{"text": "nested"}]}]});
        assert_eq!(extract_output(&payload), "hello");
    }

    #[test]
    fn test_nested_content_text() {
        let payload = json!({"output": [{"content": [{"text": "hi"}]}]});
        assert_eq!(extract_output(&payload), "hi");
    }

    #[test]
    fn test_null_output_text_falls_through() {
        let payload = json!({"output_text": null, "output": [{"content": [{"text": "hi"}]}]});
        assert_eq!(extract_output(&payload), "hi");
    }

    #[test]
    fn test_empty_output_text_is_kept() {
        let payload = json!({"output_text": "", "output": [{"content": [{"text": "hi"}]}]});
        assert_eq!(extract_output(&payload), "");
    }

    #[test]
    fn test_fallback_to_serialized_payload() {
        let payload = json!({"id": "resp_1", "output": []});
        assert_eq!(extract_output(&payload), r#"{"id":"resp_1","output":[]}"#);
    }

    #[test]
    fn test_non_string_text_is_serialized() {
        let payload = json!({"output_text": 42});
        assert_eq!(extract_output(&payload), "42");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("rate limited", 4), "rate");
        assert_eq!(truncate_chars("short", 2000), "short");
        // Multi-byte characters count once each.
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 0), "");
    }
}
