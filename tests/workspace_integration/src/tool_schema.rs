//! Tool schema validity tests.
//!
//! Every registered tool must carry a name, a description and an object
//! input schema that lists its required parameters.

use serde_json::Value;

/// Validates that a JSON schema has the required structure.
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

/// Validates that a tool has required fields.
fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    if tool.description.as_ref().is_none_or(|d| d.is_empty()) {
        return Err(format!("Tool '{}' must have a description", tool.name));
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)?;

    Ok(())
}

/// Required parameter names declared by a schema.
fn required_fields(schema: &serde_json::Map<String, Value>) -> Vec<String> {
    schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|r| r.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini_image_mcp::server::{GENERATE_IMAGE_TOOL, ImageServer, TRANSFORM_IMAGE_TOOL};
    use schemars::schema_for;
    use std::borrow::Cow;
    use std::sync::Arc;

    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string"
                }
            },
            "required": ["prompt"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({
            "type": "string"
        });
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    #[test]
    fn test_tool_validation() {
        let valid_tool = rmcp::model::Tool {
            name: Cow::Borrowed("test_tool"),
            description: Some(Cow::Borrowed("A test tool")),
            input_schema: Arc::new(
                serde_json::json!({
                    "type": "object",
                    "properties": {}
                })
                .as_object()
                .unwrap()
                .clone(),
            ),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&valid_tool).is_ok());

        let missing_description = rmcp::model::Tool {
            description: None,
            ..valid_tool.clone()
        };
        assert!(validate_tool(&missing_description).is_err());

        let missing_schema = rmcp::model::Tool {
            input_schema: Arc::new(serde_json::Map::new()),
            ..valid_tool
        };
        assert!(validate_tool(&missing_schema).is_err());
    }

    /// Both registered tools pass validation.
    #[test]
    fn test_registered_tools_are_valid() {
        let tools = ImageServer::tools();
        assert_eq!(tools.len(), 2);

        for tool in &tools {
            let result = validate_tool(tool);
            assert!(result.is_ok(), "Tool {} should be valid: {:?}", tool.name, result.err());
        }
    }

    #[test]
    fn test_generate_image_schema_fields() {
        let tools = ImageServer::tools();
        let tool = tools
            .iter()
            .find(|t| t.name == GENERATE_IMAGE_TOOL)
            .expect("generate_image should be registered");

        let properties = tool.input_schema.get("properties").unwrap().as_object().unwrap();
        assert!(properties.contains_key("prompt"));
        assert!(properties.contains_key("output_name"));
        assert_eq!(required_fields(&tool.input_schema), vec!["prompt".to_string()]);
    }

    #[test]
    fn test_transform_image_schema_fields() {
        let tools = ImageServer::tools();
        let tool = tools
            .iter()
            .find(|t| t.name == TRANSFORM_IMAGE_TOOL)
            .expect("transform_image should be registered");

        let mut required = required_fields(&tool.input_schema);
        required.sort();
        assert_eq!(required, vec!["image_source".to_string(), "prompt".to_string()]);
    }

    #[test]
    fn test_handler_params_schema_validity() {
        let schemas = vec![
            (
                "GenerateImageParams",
                serde_json::to_value(schema_for!(gemini_image_mcp::GenerateImageParams)).unwrap(),
            ),
            (
                "TransformImageParams",
                serde_json::to_value(schema_for!(gemini_image_mcp::TransformImageParams)).unwrap(),
            ),
        ];

        for (name, schema) in schemas {
            let result = validate_json_schema(&schema);
            assert!(result.is_ok(), "Schema for {} should be valid: {:?}", name, result.err());

            let obj = schema.as_object().unwrap();
            assert_eq!(
                obj.get("type").and_then(|v| v.as_str()),
                Some("object"),
                "Schema type for {} should be 'object'",
                name
            );
        }
    }
}

#[cfg(test)]
mod convention_tests {
    use gemini_image_mcp::server::ImageServer;

    /// Tool names are lowercase snake case.
    #[test]
    fn tool_names_follow_convention() {
        for tool in ImageServer::tools() {
            let name = tool.name.as_ref();
            assert!(name.chars().next().unwrap().is_ascii_lowercase());
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "Tool name '{}' should be snake case",
                name
            );
        }
    }

    /// Descriptions are long enough to be useful to a client.
    #[test]
    fn tool_descriptions_are_descriptive() {
        for tool in ImageServer::tools() {
            let description = tool.description.unwrap_or_default();
            assert!(description.len() >= 40, "Tool '{}' description too short", tool.name);
        }
    }
}
