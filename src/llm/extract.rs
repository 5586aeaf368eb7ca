//! Pull a JSON fragment out of free-text model output
//!
//! The fragment runs from the first `{` or `[` to the LAST closing bracket of
//! the same kind. Prompts ask for JSON only, so the widest match is what we
//! want; surrounding prose is discarded.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("No JSON found in response")]
    NoJsonFound,

    #[error("Malformed JSON in response: {0}")]
    MalformedJson(String),
}

/// Locate the JSON-looking substring without parsing it
pub fn locate(raw: &str) -> Result<&str, ExtractionError> {
    let start = raw
        .find(|c| c == '{' || c == '[')
        .ok_or(ExtractionError::NoJsonFound)?;
    let close = if raw[start..].starts_with('{') { '}' } else { ']' };
    let end = raw
        .rfind(close)
        .filter(|&end| end > start)
        .ok_or(ExtractionError::NoJsonFound)?;
    Ok(&raw[start..=end])
}

/// Locate and parse the JSON fragment
pub fn extract(raw: &str) -> Result<Value, ExtractionError> {
    let fragment = locate(raw)?;
    serde_json::from_str(fragment).map_err(|e| ExtractionError::MalformedJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_json_simple() {
        let response = r#"{"intent": "smile", "parameters": []}"#;
        assert_eq!(locate(response).unwrap(), response);
        assert_eq!(extract(response).unwrap()["intent"], "smile");
    }

    #[test]
    fn test_extract_with_surrounding_text() {
        let response = r#"Here is the result:
{"parameters": [{"category": "face", "name": "happy", "value": 1.0}], "feedback": "Smiling."}
Let me know if you need anything else."#;
        let value = extract(response).unwrap();
        assert_eq!(value["feedback"], "Smiling.");
        assert_eq!(value["parameters"][0]["name"], "happy");
    }

    #[test]
    fn test_extract_keeps_floats_exact() {
        let value = extract("Result: [0.9092887787788425] done").unwrap();
        assert_eq!(value[0].as_f64(), Some(0.9092887787788425));
        assert_eq!(value.to_string(), "[0.9092887787788425]");
    }

    #[test]
    fn test_extract_array() {
        let response = r#"Sure! [{"category":"pose","name":"headRotationY","value":1.5}]"#;
        let value = extract(response).unwrap();
        assert_eq!(
            value,
            json!([{"category": "pose", "name": "headRotationY", "value": 1.5}])
        );
    }

    #[test]
    fn test_extract_from_code_fence() {
        let response = "```json\n[{\"category\": \"face\", \"name\": \"sad\", \"value\": 0.8}]\n```";
        assert_eq!(extract(response).unwrap()[0]["value"], 0.8);
    }

    #[test]
    fn test_first_opener_decides_kind() {
        // the object opens first, so the whole object (with its inner array) is taken
        let response = r#"{"parameters": [1, 2]} trailing ]"#;
        assert_eq!(locate(response).unwrap(), r#"{"parameters": [1, 2]}"#);
    }

    #[test]
    fn test_widest_match_spans_two_objects() {
        let response = r#"{"a": 1} and {"b": 2}"#;
        assert_eq!(locate(response).unwrap(), response);
        assert!(matches!(
            extract(response),
            Err(ExtractionError::MalformedJson(_))
        ));
    }

    #[test]
    fn test_extract_no_json() {
        assert_eq!(
            extract("I don't understand that command"),
            Err(ExtractionError::NoJsonFound)
        );
    }

    #[test]
    fn test_unclosed_bracket() {
        assert_eq!(extract("oops { never closed"), Err(ExtractionError::NoJsonFound));
        assert_eq!(extract("} backwards {"), Err(ExtractionError::NoJsonFound));
    }

    #[test]
    fn test_malformed_json() {
        let result = extract("result: {category: face}");
        assert!(matches!(result, Err(ExtractionError::MalformedJson(_))));
    }
}
