//! Encoding between the list-of-strings tag representation and the text
//! column it is persisted in.
//!
//! The stored form is a JSON array, or NULL when the note has no tags.
//! Decoding is total: data written by a looser writer (for example a plain
//! comma-separated string) falls back to comma-split-and-trim, so reads
//! never fail on a malformed tag column.

/// Encode tags for storage. Empty input encodes to "no tags", not `[]`.
pub fn encode(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    // Serializing a Vec<String> cannot fail.
    Some(serde_json::to_string(tags).unwrap_or_default())
}

/// Decode a stored tag column back into a list.
///
/// Valid JSON arrays decode as-is; anything else is split on commas with
/// whitespace trimmed and blank segments discarded.
pub fn decode(stored: Option<&str>) -> Vec<String> {
    let Some(raw) = stored else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(tags) => tags,
        Err(_) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nonempty_tags() {
        let tags = vec!["work".to_string(), "urgent".to_string()];
        let stored = encode(&tags);
        assert_eq!(decode(stored.as_deref()), tags);
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        let stored = encode(&tags);
        assert_eq!(decode(stored.as_deref()), tags);
    }

    #[test]
    fn empty_tags_encode_to_absent() {
        assert_eq!(encode(&[]), None);
        assert!(decode(None).is_empty());
    }

    #[test]
    fn malformed_stored_value_falls_back_to_comma_split() {
        assert_eq!(decode(Some("a, b ,c")), vec!["a", "b", "c"]);
    }

    #[test]
    fn comma_fallback_discards_blank_segments() {
        assert_eq!(decode(Some("a,, ,b")), vec!["a", "b"]);
    }

    #[test]
    fn valid_json_is_not_comma_split() {
        assert_eq!(decode(Some(r#"["a,b"]"#)), vec!["a,b"]);
    }
}
