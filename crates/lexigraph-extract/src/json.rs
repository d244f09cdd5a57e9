//! Parsing of JSON replies from the completion backend.
//!
//! Models are asked for bare JSON but often wrap it in markdown fences or
//! a sentence of prose. Both are tolerated; anything else is a parse error.

use lexigraph_core::ExtractionError;
use serde::de::DeserializeOwned;

/// Parse a reply expected to hold a JSON array of `T`.
pub fn parse_json_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, ExtractionError> {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<Vec<T>>(cleaned) {
        Ok(items) => Ok(items),
        Err(direct) => {
            let inner = outermost_array(cleaned)
                .ok_or_else(|| ExtractionError::Parse(direct.to_string()))?;
            serde_json::from_str::<Vec<T>>(inner).map_err(|e| ExtractionError::Parse(e.to_string()))
        }
    }
}

/// Strip ```json ... ``` or ``` ... ``` around a reply.
fn strip_code_fences(s: &str) -> &str {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("```json") {
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }
    if let Some(rest) = s.strip_prefix("```") {
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }

    s
}

/// The text between the first `[` and the last `]`, inclusive.
fn outermost_array(s: &str) -> Option<&str> {
    let start = s.find('[')?;
    let end = s.rfind(']')?;
    if end > start {
        Some(&s[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_array() {
        let items: Vec<u32> = parse_json_array("[1, 2, 3]").unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_code_fenced_array() {
        let raw = "```json\n[{\"a\": 1}]\n```";
        let items: Vec<serde_json::Value> = parse_json_array(raw).unwrap();
        assert_eq!(items[0]["a"], 1);
    }

    #[test]
    fn test_array_inside_prose() {
        let raw = "Here are the entities:\n[\"x\", \"y\"]\nLet me know if you need more.";
        let items: Vec<String> = parse_json_array(raw).unwrap();
        assert_eq!(items, vec!["x", "y"]);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = parse_json_array::<u32>("I could not find anything.").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse(_)));
    }

    #[test]
    fn test_object_instead_of_array_is_error() {
        assert!(parse_json_array::<u32>("{\"entities\": []}").is_err());
    }
}
