use super::dto::NodeDoc;
use crate::error::ValidationError;

/// Deserialize a JSON tree source into a [`NodeDoc`].
///
/// Structural validation is NOT performed here — `build_tree` does
/// that while lowering the document into a `TreeDefinition`.
/// Deserialize failures report at path `root`, the same grammar the
/// build-time errors use.
pub fn parse_tree_json(source: &str) -> Result<NodeDoc, ValidationError> {
    serde_json::from_str(source).map_err(|e| ValidationError::new("root", e.to_string()))
}

/// Deserialize a YAML tree source into a [`NodeDoc`].
pub fn parse_tree_yaml(source: &str) -> Result<NodeDoc, ValidationError> {
    serde_yaml::from_str(source).map_err(|e| ValidationError::new("root", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_and_yaml_agree() {
        let json = r#"{"label": "Root", "choices": [{"label": "Go", "node": {"label": "End"}}]}"#;
        let yaml = "
label: Root
choices:
  - label: Go
    node:
      label: End
";
        let from_json = parse_tree_json(json).unwrap();
        let from_yaml = parse_tree_yaml(yaml).unwrap();
        assert_eq!(from_json.label, from_yaml.label);
        assert_eq!(from_json.choices.len(), from_yaml.choices.len());
        assert_eq!(
            from_json.choices[0].node.as_ref().unwrap().label,
            from_yaml.choices[0].node.as_ref().unwrap().label
        );
    }

    #[test]
    fn malformed_json_reports_at_document_root() {
        let err = parse_tree_json("{\"label\": ").unwrap_err();
        assert_eq!(err.path, "root");
    }

    #[test]
    fn malformed_yaml_reports_at_document_root() {
        let err = parse_tree_yaml(": not yaml").unwrap_err();
        assert_eq!(err.path, "root");
    }

    #[test]
    fn missing_label_is_a_parse_error() {
        assert!(parse_tree_json(r#"{"choices": []}"#).is_err());
    }
}
