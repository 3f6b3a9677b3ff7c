//! Loaders for the JSON documents the CLI consumes.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::StubError;
use crate::resource::Resource;
use crate::value::ValueNode;

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StubError> {
    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes).map_err(|source| StubError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Reads a plan. With `unknown_mask`, positions marked `true` in the mask
/// (Terraform's `after_unknown`) become unknown values.
pub async fn load_plan(path: &Path, unknown_mask: Option<&Path>) -> Result<ValueNode, StubError> {
    let value: serde_json::Value = read_json(path).await?;
    let mask: serde_json::Value = match unknown_mask {
        Some(mask_path) => read_json(mask_path).await?,
        None => serde_json::Value::Null,
    };

    tracing::debug!(path = %path.display(), "plan loaded");
    ValueNode::from_json_with_unknowns(&value, &mask).map_err(|source| StubError::Value {
        path: path.display().to_string(),
        source,
    })
}

pub async fn load_resource(path: &Path) -> Result<Resource, StubError> {
    let resource: Resource = read_json(path).await?;
    tracing::debug!(path = %path.display(), resource_type = %resource.resource_type, "state loaded");
    Ok(resource)
}
