use serde::{Deserialize, Serialize};

use crate::schema::ID;
use crate::value::ValueNode;

/// One resource instance as handed between the harness and a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Resource {
    pub resource_type: String,
    pub values: ValueNode,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, values: ValueNode) -> Self {
        Self {
            resource_type: resource_type.into(),
            values,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.values.get(ID).and_then(ValueNode::as_scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_serialization_snake_case() {
        let resource = Resource::new(
            "example_example",
            ValueNode::object([("id", ValueNode::scalar("abc123"))]),
        );
        let json = serde_json::to_string(&resource).unwrap();
        assert!(json.contains("resource_type"));
        assert!(!json.contains("resourceType"));
        assert!(json.contains(r#""values":{"id":"abc123"}"#));
    }

    #[test]
    fn test_resource_deserialization() {
        let json = r#"{
            "resource_type": "example_example",
            "values": {
                "id": "abc123",
                "string_val": null,
                "single_nested_val": {"string_val": "x"}
            }
        }"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.resource_type, "example_example");
        assert_eq!(resource.id(), Some("abc123"));
        assert!(resource.values.get("string_val").unwrap().is_null());
        assert_eq!(
            resource.values.at(&["single_nested_val", "string_val"]),
            Some(&ValueNode::scalar("x"))
        );
    }

    #[test]
    fn test_resource_deserialization_rejects_numbers() {
        let json = r#"{"resource_type": "example_example", "values": {"id": 7}}"#;
        let result: Result<Resource, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_id_missing_or_null() {
        let resource = Resource::new("example_example", ValueNode::object([("id", ValueNode::Null)]));
        assert_eq!(resource.id(), None);

        let resource = Resource::new("example_example", ValueNode::Null);
        assert_eq!(resource.id(), None);
    }
}
