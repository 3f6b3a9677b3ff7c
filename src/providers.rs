pub mod example;

use async_trait::async_trait;
use thiserror::Error;

use crate::reconcile::ReconcileError;
use crate::resource::Resource;
use crate::schema::{ID, Schema};
use crate::value::ValueNode;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Resource lifecycle as the orchestration engine drives it.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
    fn resource_types(&self) -> Vec<&str>;
    fn schema(&self, resource_type: &str) -> Result<&Schema, ProviderError>;

    async fn create(&self, resource_type: &str, plan: ValueNode) -> Result<Resource, ProviderError>;
    async fn read(&self, current: &Resource) -> Result<Resource, ProviderError>;
    async fn update(&self, prior: &Resource, plan: ValueNode) -> Result<Resource, ProviderError>;
    async fn delete(&self, current: &Resource) -> Result<(), ProviderError>;

    /// Passthrough import: seeds `id` with the external identifier and reads.
    async fn import(&self, resource_type: &str, id: &str) -> Result<Resource, ProviderError> {
        let mut values = self.schema(resource_type)?.null_object();
        if let ValueNode::Object(fields) = &mut values {
            fields.insert(ID.to_string(), ValueNode::scalar(id));
        }
        self.read(&Resource::new(resource_type, values)).await
    }
}

pub fn get_provider(name: &str) -> Result<Box<dyn Provider>, ProviderError> {
    match name {
        example::PROVIDER_NAME => Ok(Box::new(example::ExampleProvider::new())),
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}
