//! tfstub - stub resource provider
//!
//! Reconciles a planned configuration with prior state the way a Terraform
//! provider would, without any remote service behind it.

pub mod files;
pub mod output;
pub mod providers;
pub mod reconcile;
pub mod resource;
pub mod schema;
pub mod value;

mod error;

pub use error::StubError;
pub use providers::{Provider, ProviderError, get_provider};
pub use reconcile::{
    ComputeRequest, Diagnostic, OperationKind, ReconcileError, ReconciliationInput,
    ReconciliationOutput, Reconciler, ValueSource,
};
pub use resource::Resource;
pub use schema::{AttributeSpec, Role, Schema, SchemaError, example_schema};
pub use value::{AttributePath, ValueNode};
