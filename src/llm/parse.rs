//! Parsing of completion output into a structured note.
//!
//! The completion service is asked for a JSON object with `Title`, `Notes`
//! and `Tags` keys, but models wrap their answers in prose or code fences
//! often enough that a strict parse alone is not reliable. Parsing is a
//! two-stage pipeline: strict parse of the entire response first, then a
//! scan for the first balanced `{...}` substring. The caller learns which
//! stage succeeded via [`Extraction`].

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Could not parse JSON from LLM response")]
    NoObject,
    #[error("Generated note is missing required fields")]
    MissingFields,
}

/// Which parsing stage produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The whole response was a JSON object.
    Strict,
    /// The object was extracted from surrounding text.
    Fallback,
}

/// The note shape expected from the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Parse raw completion output into a [`StructuredNote`].
///
/// Fails if no JSON object can be located, or if the object lacks a
/// `Title` or `Notes` field. `Tags` is optional and defaults to empty;
/// non-string tag entries are discarded.
pub fn parse_generated_note(raw: &str) -> Result<(StructuredNote, Extraction), ParseError> {
    let (value, extraction) = extract_object(raw)?;

    let obj = match value.as_object() {
        Some(obj) => obj,
        None => return Err(ParseError::NoObject),
    };

    let title = obj.get("Title").and_then(Value::as_str);
    let content = obj.get("Notes").and_then(Value::as_str);
    let (Some(title), Some(content)) = (title, content) else {
        return Err(ParseError::MissingFields);
    };

    let tags = obj
        .get("Tags")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok((
        StructuredNote {
            title: title.to_string(),
            content: content.to_string(),
            tags,
        },
        extraction,
    ))
}

fn extract_object(raw: &str) -> Result<(Value, Extraction), ParseError> {
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(raw) {
        return Ok((value, Extraction::Strict));
    }

    let candidate = balanced_object(raw).ok_or(ParseError::NoObject)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => Ok((value, Extraction::Fallback)),
        _ => Err(ParseError::NoObject),
    }
}

/// Find the first balanced `{...}` substring, ignoring braces inside JSON
/// string literals.
fn balanced_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
