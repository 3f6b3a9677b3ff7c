mod backend;

pub use backend::{DYNAMIC_UPDATED_VALUE, DYNAMIC_VALUE, ID_VALUE, STATIC_VALUE, StubBackend};

use async_trait::async_trait;

use super::{Provider, ProviderError};
use crate::reconcile::{ReconciliationInput, Reconciler};
use crate::resource::Resource;
use crate::schema::{Schema, example_schema};
use crate::value::ValueNode;

pub const PROVIDER_NAME: &str = "example";
pub const RESOURCE_TYPE: &str = "example_example";

/// Provider whose single resource is backed by [`StubBackend`] instead of a
/// remote API.
pub struct ExampleProvider {
    reconciler: Reconciler<'static, StubBackend>,
}

impl ExampleProvider {
    pub fn new() -> Self {
        Self {
            reconciler: Reconciler::new(example_schema(), StubBackend),
        }
    }

    fn check_type(&self, resource_type: &str) -> Result<(), ProviderError> {
        if resource_type == RESOURCE_TYPE {
            Ok(())
        } else {
            Err(ProviderError::UnknownResourceType(resource_type.to_string()))
        }
    }

    fn reconcile(&self, input: &ReconciliationInput) -> Result<Resource, ProviderError> {
        let values = self.reconciler.reconcile(input)?;
        Ok(Resource::new(RESOURCE_TYPE, values))
    }
}

impl Default for ExampleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for ExampleProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn resource_types(&self) -> Vec<&str> {
        vec![RESOURCE_TYPE]
    }

    fn schema(&self, resource_type: &str) -> Result<&Schema, ProviderError> {
        self.check_type(resource_type)?;
        Ok(self.reconciler.schema())
    }

    async fn create(
        &self,
        resource_type: &str,
        plan: ValueNode,
    ) -> Result<Resource, ProviderError> {
        self.check_type(resource_type)?;
        let resource = self.reconcile(&ReconciliationInput::create(plan))?;
        tracing::info!(resource_type, id = ?resource.id(), "resource created");
        Ok(resource)
    }

    async fn read(&self, current: &Resource) -> Result<Resource, ProviderError> {
        self.check_type(&current.resource_type)?;
        let resource = self.reconcile(&ReconciliationInput::read(current.values.clone()))?;
        tracing::info!(
            resource_type = %current.resource_type,
            id = ?resource.id(),
            "resource read"
        );
        Ok(resource)
    }

    async fn update(&self, prior: &Resource, plan: ValueNode) -> Result<Resource, ProviderError> {
        self.check_type(&prior.resource_type)?;
        let resource =
            self.reconcile(&ReconciliationInput::update(plan, prior.values.clone()))?;
        tracing::info!(
            resource_type = %prior.resource_type,
            id = ?resource.id(),
            "resource updated"
        );
        Ok(resource)
    }

    // No backend, so nothing to clean up.
    async fn delete(&self, current: &Resource) -> Result<(), ProviderError> {
        self.check_type(&current.resource_type)?;
        tracing::info!(
            resource_type = %current.resource_type,
            id = ?current.id(),
            "resource deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_block() -> ValueNode {
        ValueNode::object([
            ("string_val", ValueNode::scalar("a")),
            (
                "single_nested_val",
                ValueNode::object([("string_val", ValueNode::scalar("required string"))]),
            ),
        ])
    }

    #[tokio::test]
    async fn test_create_returns_typed_resource() {
        let provider = ExampleProvider::new();
        let resource = provider.create(RESOURCE_TYPE, plan_with_block()).await.unwrap();
        assert_eq!(resource.resource_type, "example_example");
        assert_eq!(resource.id(), Some(ID_VALUE));
    }

    #[tokio::test]
    async fn test_create_rejects_other_resource_type() {
        let provider = ExampleProvider::new();
        let err = provider
            .create("example_other", plan_with_block())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResourceType(t) if t == "example_other"));
    }

    #[tokio::test]
    async fn test_create_surfaces_schema_mismatch() {
        let provider = ExampleProvider::new();
        let plan = ValueNode::object([(
            "single_nested_val",
            ValueNode::object([("x", ValueNode::Null)]),
        )]);
        let err = provider.create(RESOURCE_TYPE, plan).await.unwrap_err();
        assert!(matches!(err, ProviderError::Reconcile(_)));
        assert!(err.to_string().contains("single_nested_val.x"));
        assert!(err.to_string().contains("single_nested_val.string_val"));
    }

    #[tokio::test]
    async fn test_delete_is_noop() {
        let provider = ExampleProvider::new();
        let resource = provider.create(RESOURCE_TYPE, plan_with_block()).await.unwrap();
        provider.delete(&resource).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_after_update_keeps_user_values() {
        let provider = ExampleProvider::new();
        let created = provider.create(RESOURCE_TYPE, plan_with_block()).await.unwrap();
        let updated = provider.update(&created, plan_with_block()).await.unwrap();
        let read = provider.read(&updated).await.unwrap();

        assert_eq!(read.values.get("string_val"), Some(&ValueNode::scalar("a")));
        assert_eq!(
            read.values.at(&["single_nested_val", "string_val_static"]),
            Some(&ValueNode::scalar(STATIC_VALUE))
        );
        assert_eq!(
            read.values.at(&["single_nested_val", "string_val_dynamic"]),
            Some(&ValueNode::scalar(DYNAMIC_UPDATED_VALUE))
        );
    }
}
