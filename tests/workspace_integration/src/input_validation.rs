//! Input parameter validation tests.
//!
//! Invalid tool arguments must be rejected with field-level validation
//! details before any file or network work starts.

#[cfg(test)]
mod tests {
    use gemini_image_mcp::{GenerateImageParams, TransformImageParams};

    #[test]
    fn test_generate_params_validation_rejects_empty_prompt() {
        let params = GenerateImageParams {
            prompt: "   ".to_string(),
            output_name: "image".to_string(),
        };

        let errors = params.validate().unwrap_err();
        assert!(
            errors.iter().any(|e| e.field == "prompt"),
            "Should have prompt validation error"
        );
    }

    #[test]
    fn test_generate_params_validation_rejects_path_in_output_name() {
        let params = GenerateImageParams {
            prompt: "A cat".to_string(),
            output_name: "../escape".to_string(),
        };

        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "output_name"));
    }

    #[test]
    fn test_transform_params_validation_rejects_empty_source() {
        let params = TransformImageParams {
            image_source: String::new(),
            prompt: "Make it blue".to_string(),
            output_name: "blue".to_string(),
        };

        let errors = params.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "image_source");
    }

    #[test]
    fn test_transform_params_accept_url_and_path_sources() {
        for source in ["https://example.com/cat.png", "./cat.png", "/abs/cat.jpg", "cat.webp"] {
            let params = TransformImageParams {
                image_source: source.to_string(),
                prompt: "Make it blue".to_string(),
                output_name: "blue".to_string(),
            };
            assert!(params.validate().is_ok(), "source '{}' should be accepted", source);
        }
    }

    #[test]
    fn test_params_deserialize_defaults() {
        let params: GenerateImageParams =
            serde_json::from_value(serde_json::json!({"prompt": "a lake"})).unwrap();
        assert!(params.validate().is_ok());
    }
}

#[cfg(test)]
mod property_tests {
    use gemini_image_mcp::{GenerateImageParams, TransformImageParams};
    use proptest::prelude::*;

    /// Strategy to generate valid prompts (non-empty after trimming)
    fn valid_prompt_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ,.]{1,120}".prop_filter("Must not be blank", |s| !s.trim().is_empty())
    }

    /// Strategy to generate valid output names
    fn valid_output_name_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,30}"
            .prop_filter("Must not end with a dot", |s| !s.ends_with('.'))
    }

    /// Strategy to generate output names containing a path separator
    fn invalid_output_name_strategy() -> impl Strategy<Value = String> {
        ("[a-z]{0,8}", prop_oneof![Just('/'), Just('\\')], "[a-z]{0,8}")
            .prop_map(|(head, sep, tail)| format!("{}{}{}", head, sep, tail))
    }

    proptest! {
        /// Valid prompts and names always pass validation.
        #[test]
        fn valid_generate_params_pass(
            prompt in valid_prompt_strategy(),
            output_name in valid_output_name_strategy(),
        ) {
            let params = GenerateImageParams { prompt, output_name };
            let result = params.validate();
            prop_assert!(result.is_ok(), "unexpected errors: {:?}", result.err());
        }

        /// Whitespace-only prompts are always rejected.
        #[test]
        fn blank_prompt_is_rejected(prompt in "[ \t\n]{0,10}") {
            let params = TransformImageParams {
                image_source: "cat.png".to_string(),
                prompt,
                output_name: "out".to_string(),
            };
            let errors = params.validate().unwrap_err();
            prop_assert!(errors.iter().any(|e| e.field == "prompt"));
        }

        /// Output names with a path separator are always rejected.
        #[test]
        fn separator_in_output_name_is_rejected(output_name in invalid_output_name_strategy()) {
            let params = GenerateImageParams {
                prompt: "a cat".to_string(),
                output_name,
            };
            let errors = params.validate().unwrap_err();
            prop_assert!(errors.iter().any(|e| e.field == "output_name"));
        }
    }
}
