//! Attribute schema descriptor.
//!
//! A [`Schema`] is a tree of [`AttributeSpec`]s. Each spec carries a [`Role`]
//! that tells the reconciler where the attribute's value comes from: the
//! user's plan, the prior state (sticky), or a fresh computation (volatile).

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use thiserror::Error;

use crate::value::{AttributePath, ValueNode};

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("unknown attribute: {path}")]
    UnknownAttribute { path: AttributePath },

    #[error("duplicate attribute: {path}")]
    DuplicateAttribute { path: AttributePath },

    #[error("computed attribute cannot have nested attributes: {path}")]
    ComputedObject { path: AttributePath },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Must be set by the user.
    UserSettable,
    UserSettableOptional,
    /// Computed once, then carried forward from prior state.
    SystemComputedSticky,
    /// Recomputed on every reconciliation.
    SystemComputedVolatile,
}

impl Role {
    pub fn is_computed(self) -> bool {
        matches!(
            self,
            Role::SystemComputedSticky | Role::SystemComputedVolatile
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::UserSettable => "required",
            Role::UserSettableOptional => "optional",
            Role::SystemComputedSticky => "computed (sticky)",
            Role::SystemComputedVolatile => "computed (volatile)",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    pub name: String,
    pub role: Role,
    pub description: String,
    /// Declaration order is preserved. Empty for scalar attributes.
    pub children: Vec<AttributeSpec>,
}

impl AttributeSpec {
    pub fn string(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            description: String::new(),
            children: Vec::new(),
        }
    }

    pub fn object(name: impl Into<String>, role: Role, children: Vec<AttributeSpec>) -> Self {
        Self {
            name: name.into(),
            role,
            description: String::new(),
            children,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_object(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&AttributeSpec> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Immutable once built; share it freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    attributes: Vec<AttributeSpec>,
}

impl Schema {
    pub fn new(attributes: Vec<AttributeSpec>) -> Result<Self, SchemaError> {
        validate_level(&attributes, &AttributePath::root())?;
        Ok(Self { attributes })
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Result<&AttributeSpec, SchemaError> {
        let unknown = || SchemaError::UnknownAttribute {
            path: AttributePath::from(path),
        };

        let (first, rest) = path.split_first().ok_or_else(unknown)?;
        let mut spec = self
            .attributes
            .iter()
            .find(|a| a.name == first.as_ref())
            .ok_or_else(unknown)?;
        for segment in rest {
            spec = spec.child(segment.as_ref()).ok_or_else(unknown)?;
        }
        Ok(spec)
    }

    /// Depth-first walk over every attribute, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = (AttributePath, &AttributeSpec)> {
        let mut out = Vec::new();
        collect(&self.attributes, &AttributePath::root(), &mut out);
        out.into_iter()
    }

    /// An object with every top-level attribute present and null.
    pub fn null_object(&self) -> ValueNode {
        ValueNode::object(
            self.attributes
                .iter()
                .map(|a| (a.name.clone(), ValueNode::Null)),
        )
    }
}

fn validate_level(attributes: &[AttributeSpec], parent: &AttributePath) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for attribute in attributes {
        let path = parent.child(&attribute.name);
        if !seen.insert(attribute.name.as_str()) {
            return Err(SchemaError::DuplicateAttribute { path });
        }
        if attribute.role.is_computed() && attribute.is_object() {
            return Err(SchemaError::ComputedObject { path });
        }
        validate_level(&attribute.children, &path)?;
    }
    Ok(())
}

fn collect<'a>(
    attributes: &'a [AttributeSpec],
    parent: &AttributePath,
    out: &mut Vec<(AttributePath, &'a AttributeSpec)>,
) {
    for attribute in attributes {
        let path = parent.child(&attribute.name);
        out.push((path.clone(), attribute));
        collect(&attribute.children, &path, out);
    }
}

pub const ID: &str = "id";
pub const STRING_VAL: &str = "string_val";
pub const SINGLE_NESTED_VAL: &str = "single_nested_val";
pub const STRING_VAL_STATIC: &str = "string_val_static";
pub const STRING_VAL_DYNAMIC: &str = "string_val_dynamic";

static EXAMPLE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| Schema {
    attributes: example_attributes(),
});

fn example_attributes() -> Vec<AttributeSpec> {
    vec![
        AttributeSpec::string(ID, Role::SystemComputedSticky).with_description("Computed id"),
        AttributeSpec::string(STRING_VAL, Role::UserSettableOptional)
            .with_description("Optional string attribute"),
        AttributeSpec::object(
            SINGLE_NESTED_VAL,
            Role::UserSettableOptional,
            vec![
                AttributeSpec::string(STRING_VAL, Role::UserSettable)
                    .with_description("Required string attribute"),
                AttributeSpec::string(STRING_VAL_STATIC, Role::SystemComputedSticky)
                    .with_description("Computed once when the block is first defined"),
                AttributeSpec::string(STRING_VAL_DYNAMIC, Role::SystemComputedVolatile)
                    .with_description("Recomputed on every pass while the block is defined"),
            ],
        )
        .with_description("Optional single nested object"),
    ]
}

/// Schema of the `example_example` resource.
pub fn example_schema() -> &'static Schema {
    &EXAMPLE_SCHEMA
}
