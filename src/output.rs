use clap::ValueEnum;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::resource::Resource;
use crate::schema::Schema;
use crate::value::ValueNode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Tree,
}

pub fn render(resource: &Resource, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(resource),
        OutputFormat::Tree => Ok(render_tree(resource)),
    }
}

pub fn render_tree(resource: &Resource) -> String {
    let label = format!(
        "{} ({})",
        resource.resource_type,
        resource.id().unwrap_or("no id")
    );
    let tree = match &resource.values {
        ValueNode::Object(fields) => {
            Tree::new(label).with_leaves(fields.iter().map(|(name, node)| node_tree(name, node)))
        }
        other => Tree::new(label).with_leaves([node_tree("values", other)]),
    };
    tree.to_string()
}

fn node_tree(name: &str, node: &ValueNode) -> Tree<String> {
    match node {
        ValueNode::Object(fields) => Tree::new(name.to_string())
            .with_leaves(fields.iter().map(|(child, value)| node_tree(child, value))),
        ValueNode::Scalar(value) => Tree::new(format!("{name} = {value:?}")),
        ValueNode::Null => Tree::new(format!("{name} = null")),
        ValueNode::Unknown => Tree::new(format!("{name} = (known after apply)")),
    }
}

#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    path: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn schema_table(schema: &Schema) -> String {
    let rows: Vec<AttributeRow> = schema
        .iter()
        .map(|(path, spec)| AttributeRow {
            path: path.to_string(),
            role: if spec.is_object() {
                format!("{} object", spec.role)
            } else {
                spec.role.to_string()
            },
            description: spec.description.clone(),
        })
        .collect();
    Table::new(rows).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::example_schema;

    fn sample() -> Resource {
        Resource::new(
            "example_example",
            ValueNode::object([
                ("id", ValueNode::scalar("id")),
                ("string_val", ValueNode::scalar("a")),
                (
                    "single_nested_val",
                    ValueNode::object([("string_val", ValueNode::scalar("b"))]),
                ),
            ]),
        )
    }

    #[test]
    fn test_render_json_is_pretty() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        assert!(json.contains("\n  \"resource_type\": \"example_example\""));
        let parsed: Resource = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_render_tree() {
        let tree = render(&sample(), OutputFormat::Tree).unwrap();
        assert!(tree.starts_with("example_example (id)"));
        assert!(tree.contains("string_val = \"a\""));
        assert!(tree.contains("single_nested_val"));
        assert!(tree.contains("string_val = \"b\""));
    }

    #[test]
    fn test_render_tree_without_id() {
        let resource = Resource::new("example_example", ValueNode::object([("id", ValueNode::Unknown)]));
        let tree = render_tree(&resource);
        assert!(tree.starts_with("example_example (no id)"));
        assert!(tree.contains("id = (known after apply)"));
    }

    #[test]
    fn test_schema_table_lists_every_attribute() {
        let table = schema_table(example_schema());
        assert!(table.contains("Attribute"));
        assert!(table.contains("single_nested_val.string_val_dynamic"));
        assert!(table.contains("computed (volatile)"));
        assert!(table.contains("optional object"));
    }
}
