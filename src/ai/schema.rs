use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::warn;

/// A response shape a generative task asks the model for.
pub trait ResponseSchema: DeserializeOwned {
    /// Schema sent to the provider (OpenAPI subset, upper-case type names).
    fn schema() -> Value;

    /// Semantic checks serde cannot express, such as non-empty lists.
    fn is_complete(&self) -> bool {
        true
    }
}

pub fn string() -> Value {
    json!({ "type": "STRING" })
}

pub fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

/// Object schema with every field required, in declaration order.
pub fn object(fields: &[(&str, Value)]) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|(name, schema)| (name.to_string(), schema.clone()))
        .collect();
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": names,
        "propertyOrdering": names,
    })
}

/// Parses model output into `T`. Non-conforming output is an absent result, not an error.
pub fn parse_response<T: ResponseSchema>(text: &str) -> Option<T> {
    match serde_json::from_str::<T>(strip_code_fence(text)) {
        Ok(value) if value.is_complete() => Some(value),
        Ok(_) => {
            warn!("model response is missing required content");
            None
        }
        Err(e) => {
            warn!(error = %e, "model response does not match schema");
            None
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

#[cfg(test)]
mod schema_tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        name: String,
        tags: Vec<String>,
    }

    impl ResponseSchema for Pair {
        fn schema() -> Value {
            object(&[("name", string()), ("tags", string_array())])
        }

        fn is_complete(&self) -> bool {
            !self.tags.is_empty()
        }
    }

    #[test]
    fn object_schema_requires_all_fields() {
        let schema = Pair::schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!(["name", "tags"]));
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "STRING");
    }

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain: Pair = parse_response(r#"{"name":"a","tags":["x"]}"#).unwrap();
        assert_eq!(plain.name, "a");
        let fenced: Pair = parse_response("```json\n{\"name\":\"b\",\"tags\":[\"y\"]}\n```").unwrap();
        assert_eq!(fenced.tags, vec!["y"]);
    }

    #[test]
    fn malformed_or_incomplete_is_absent() {
        assert!(parse_response::<Pair>("Sure! Here is your recipe").is_none());
        assert!(parse_response::<Pair>(r#"{"name":"a"}"#).is_none());
        assert!(parse_response::<Pair>(r#"{"name":"a","tags":[]}"#).is_none());
    }
}
