//! Parameter schema generation from Rust types.

use serde_json::json;

/// JSON Schema (draft-07) describing `T`, for use as tool `parameters`.
pub fn json_schema_from_type<T: schemars::JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    #[derive(schemars::JsonSchema)]
    struct Annotated {
        answer: String,
        note: Option<String>,
    }

    #[test]
    fn test_schema_from_struct() {
        let schema = json_schema_from_type::<Annotated>();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["answer"]));
        assert_eq!(schema["properties"]["answer"]["type"], "string");
        assert!(schema["$schema"].as_str().unwrap().contains("draft-07"));
    }
}
