use jsonschema::Validator;
use serde_json::Value;

use crate::errors::Error;

/// Creates a JSON Schema validator from a schema value
///
/// # Arguments
/// * `schema` - The JSON Schema
///
/// # Returns
/// * `Result<Validator, Error>` - The compiled validator on success, or an error
pub fn build_validator(schema: &Value) -> Result<Validator, Error> {
    jsonschema::validator_for(schema).map_err(|e| Error::Schema(e.to_string()))
}

/// Checks a parsed model reply against a compiled validator
///
/// # Arguments
/// * `schema` - The compiled JSON Schema validator
/// * `response` - The parsed reply
pub fn validate_response(schema: &Validator, response: &Value) -> bool {
    schema.is_valid(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_keys() {
        let validator = build_validator(&json!({
            "type": "object",
            "required": ["summary"],
            "properties": {"summary": {"type": "string"}}
        }))
        .unwrap();
        assert!(validate_response(&validator, &json!({"summary": "ok"})));
        assert!(!validate_response(&validator, &json!({"risks": []})));
        assert!(!validate_response(&validator, &json!({"summary": 3})));
    }
}
