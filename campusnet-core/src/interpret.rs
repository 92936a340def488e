//! Response interpretation.
//!
//! Raw model output is never trusted: structured payloads are parsed,
//! checked against their [`SchemaDescriptor`] and only then converted into
//! the caller's type.

use crate::error::AiError;
use crate::schema::SchemaDescriptor;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Returned for a free-text call whose payload came back empty.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that request.";

/// Interpret a free-text reply.
pub fn interpret_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        raw.to_string()
    }
}

/// Parse, validate and convert a structured reply.
pub fn interpret_object<T: DeserializeOwned>(
    raw: &str,
    schema: &SchemaDescriptor,
) -> Result<T, AiError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    validate(schema.json_schema(), &value, "$")?;
    serde_json::from_value(value)
        .map_err(|e| AiError::schema_violation(format!("{}: {}", schema.name(), e)))
}

/// Remove a surrounding Markdown code fence, which JSON-mode endpoints
/// sometimes add.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`), whether or not a newline follows it.
    let tag_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(body.len());
    body[tag_len..].trim()
}

/// Check `value` against a JSON Schema, reporting the first mismatch with
/// its path.
///
/// Understands the keywords derived response types produce: `type`
/// (including `["T", "null"]`), `properties`, `required`, `items`,
/// `minItems`/`maxItems`, `minimum`/`maximum` and `enum`.
pub fn validate(schema: &Value, value: &Value, path: &str) -> Result<(), AiError> {
    let Value::Object(schema) = schema else {
        return Ok(());
    };

    if let Some(expected) = schema.get("type") {
        let allowed: Vec<&str> = match expected {
            Value::String(t) => vec![t.as_str()],
            Value::Array(ts) => ts.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if !allowed.is_empty() && !allowed.iter().any(|t| has_type(value, t)) {
            return Err(AiError::schema_violation(format!(
                "{}: expected {}, found {}",
                path,
                allowed.join(" or "),
                json_type_name(value)
            )));
        }
    }

    if let Some(options) = schema.get("enum").and_then(Value::as_array) {
        if !options.contains(value) {
            return Err(AiError::schema_violation(format!(
                "{}: {} is not one of {}",
                path,
                value,
                Value::Array(options.clone())
            )));
        }
    }

    match value {
        Value::Number(n) => {
            let Some(n) = n.as_f64() else {
                return Err(AiError::schema_violation(format!(
                    "{}: number out of representable range",
                    path
                )));
            };
            check_range(
                path,
                n,
                schema.get("minimum").and_then(Value::as_f64),
                schema.get("maximum").and_then(Value::as_f64),
            )
        }
        Value::Array(elements) => {
            let len = elements.len() as u64;
            if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
                if len < min {
                    return Err(AiError::schema_violation(format!(
                        "{}: expected at least {} item(s), found {}",
                        path, min, len
                    )));
                }
            }
            if let Some(max) = schema.get("maxItems").and_then(Value::as_u64) {
                if len > max {
                    return Err(AiError::schema_violation(format!(
                        "{}: expected at most {} item(s), found {}",
                        path, max, len
                    )));
                }
            }
            match schema.get("items") {
                Some(items) => elements.iter().enumerate().try_for_each(|(i, element)| {
                    validate(items, element, &format!("{}[{}]", path, i))
                }),
                None => Ok(()),
            }
        }
        Value::Object(map) => {
            if let Some(required) = schema.get("required").and_then(Value::as_array) {
                for name in required.iter().filter_map(Value::as_str) {
                    if !map.contains_key(name) {
                        return Err(AiError::schema_violation(format!(
                            "{}.{}: required field missing",
                            path, name
                        )));
                    }
                }
            }
            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                for (name, property) in properties {
                    if let Some(v) = map.get(name) {
                        validate(property, v, &format!("{}.{}", path, name))?;
                    }
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn has_type(value: &Value, ty: &str) -> bool {
    match (ty, value) {
        ("null", Value::Null)
        | ("boolean", Value::Bool(_))
        | ("string", Value::String(_))
        | ("number", Value::Number(_))
        | ("array", Value::Array(_))
        | ("object", Value::Object(_)) => true,
        ("integer", Value::Number(n)) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}

fn check_range(path: &str, n: f64, min: Option<f64>, max: Option<f64>) -> Result<(), AiError> {
    if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
        return Err(AiError::schema_violation(format!(
            "{}: {} outside [{}, {}]",
            path,
            n,
            min.map_or("-inf".to_string(), |m| m.to_string()),
            max.map_or("inf".to_string(), |m| m.to_string()),
        )));
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq, JsonSchema)]
    struct Review {
        #[schemars(range(min = 0.0, max = 100.0))]
        score: f64,
        #[schemars(length(min = 1))]
        notes: Vec<String>,
    }

    fn review_schema() -> SchemaDescriptor {
        SchemaDescriptor::of::<Review>("review")
    }

    #[test]
    fn test_text_passes_through_verbatim() {
        assert_eq!(interpret_text("  **Hi** there\n"), "  **Hi** there\n");
        assert_eq!(interpret_text(" \n "), EMPTY_REPLY);
    }

    #[test]
    fn test_valid_object_is_converted() {
        let review: Review =
            interpret_object(r#"{"score": 82, "notes": ["Add more keywords"]}"#, &review_schema())
                .unwrap();
        assert_eq!(
            review,
            Review {
                score: 82.0,
                notes: vec!["Add more keywords".to_string()]
            }
        );
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let raw = "```json\n{\"score\": 10, \"notes\": [\"a\"]}\n```";
        let review: Review = interpret_object(raw, &review_schema()).unwrap();
        assert_eq!(review.score, 10.0);
    }

    #[test]
    fn test_single_line_fence_is_accepted() {
        for raw in [
            "```json {\"score\": 10, \"notes\": [\"a\"]}```",
            "```{\"score\": 10, \"notes\": [\"a\"]}```",
            "```\n{\"score\": 10,\n\"notes\": [\"a\"]}\n```",
        ] {
            let review: Review = interpret_object(raw, &review_schema()).unwrap();
            assert_eq!(review.notes, vec!["a"], "payload {:?}", raw);
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        for raw in ["", "{", "not json", "{\"score\": }"] {
            let err = interpret_object::<Review>(raw, &review_schema()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "payload {:?}", raw);
        }
    }

    #[test]
    fn test_shape_mismatches_are_violations() {
        let cases = [
            (r#"{"notes": ["a"]}"#, "$.score"),
            (r#"{"score": null, "notes": ["a"]}"#, "$.score"),
            (r#"{"score": "high", "notes": ["a"]}"#, "$.score"),
            (r#"{"score": 101, "notes": ["a"]}"#, "$.score"),
            (r#"{"score": -1, "notes": ["a"]}"#, "$.score"),
            (r#"{"score": 50, "notes": []}"#, "$.notes"),
            (r#"{"score": 50, "notes": ["a", 3]}"#, "$.notes[1]"),
            (r#"[1, 2]"#, "$"),
        ];

        for (raw, path) in cases {
            let err = interpret_object::<Review>(raw, &review_schema()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::SchemaViolation, "payload {}", raw);
            assert!(err.to_string().contains(path), "{} should mention {}", err, path);
        }
    }

    #[test]
    fn test_optional_fields_and_extras_are_tolerated() {
        #[derive(Debug, Deserialize, JsonSchema)]
        #[allow(dead_code)]
        struct Tagged {
            name: String,
            #[serde(default)]
            rank: Option<i64>,
        }

        let schema = SchemaDescriptor::of::<Tagged>("tagged");
        let value: Value = interpret_object(r#"{"name": "x", "extra": true}"#, &schema).unwrap();
        assert_eq!(value["name"], "x");
        let value: Value = interpret_object(r#"{"name": "x", "rank": null}"#, &schema).unwrap();
        assert!(value["rank"].is_null());

        let err = interpret_object::<Value>(r#"{"name": "x", "rank": 2.5}"#, &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert!(err.to_string().contains("$.rank"));
    }

    #[test]
    fn test_enum_values_are_checked() {
        let schema = SchemaDescriptor::new(
            "level",
            serde_json::json!({"type": "string", "enum": ["junior", "senior"]}),
        );
        interpret_object::<Value>(r#""senior""#, &schema).unwrap();
        let err = interpret_object::<Value>(r#""lead""#, &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    }
}
