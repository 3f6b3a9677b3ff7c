//! Plan/state reconciliation.
//!
//! [`Reconciler::reconcile`] walks the schema tree and decides, for every
//! attribute, where its new value comes from:
//!
//! - user attributes take the plan value verbatim,
//! - sticky computed attributes keep the prior-state value once one exists,
//! - volatile computed attributes are recomputed on every pass,
//! - object attributes recurse, unless the plan leaves them null.
//!
//! Whether a computed value is a "first computation" is decided per subtree:
//! a block introduced by an update has no prior children, so its sticky
//! attributes are computed fresh.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{AttributeSpec, Role, Schema};
use crate::value::{AttributePath, Fields, ValueNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Read,
    Update,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Create => "create",
            OperationKind::Read => "read",
            OperationKind::Update => "update",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationInput {
    /// Absent for reads.
    pub plan: Option<ValueNode>,
    /// Absent for creates.
    pub prior_state: Option<ValueNode>,
    pub operation: OperationKind,
}

impl ReconciliationInput {
    pub fn create(plan: ValueNode) -> Self {
        Self {
            plan: Some(plan),
            prior_state: None,
            operation: OperationKind::Create,
        }
    }

    pub fn read(prior_state: ValueNode) -> Self {
        Self {
            plan: None,
            prior_state: Some(prior_state),
            operation: OperationKind::Read,
        }
    }

    pub fn update(plan: ValueNode, prior_state: ValueNode) -> Self {
        Self {
            plan: Some(plan),
            prior_state: Some(prior_state),
            operation: OperationKind::Update,
        }
    }
}

/// The new state. Every attribute of every materialized object is present,
/// and nothing is left unknown.
pub type ReconciliationOutput = ValueNode;

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub path: AttributePath,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{operation} input does not match the schema: {}", summarize(.diagnostics))]
    SchemaMismatch {
        operation: OperationKind,
        diagnostics: Vec<Diagnostic>,
    },
}

impl ReconcileError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ReconcileError::SchemaMismatch { diagnostics, .. } => diagnostics,
        }
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// What the reconciler knows when it asks for a fresh computed value.
#[derive(Debug, Clone, Copy)]
pub struct ComputeRequest<'a> {
    pub path: &'a AttributePath,
    pub role: Role,
    pub operation: OperationKind,
    /// No prior value existed at `path`.
    pub first_computation: bool,
}

/// Produces fresh values for computed attributes. A real backend would call
/// its service here.
pub trait ValueSource: Send + Sync {
    fn compute(&self, request: &ComputeRequest<'_>) -> String;
}

pub struct Reconciler<'s, V> {
    schema: &'s Schema,
    source: V,
}

struct Pass {
    operation: OperationKind,
    diagnostics: Vec<Diagnostic>,
}

impl Pass {
    fn report(&mut self, path: &AttributePath, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            path: path.clone(),
            message: message.into(),
        });
    }

    // Reads use the prior state as their plan, which is checked already.
    fn checks_prior(&self) -> bool {
        self.operation == OperationKind::Update
    }
}

impl<'s, V: ValueSource> Reconciler<'s, V> {
    pub fn new(schema: &'s Schema, source: V) -> Self {
        Self { schema, source }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn reconcile(
        &self,
        input: &ReconciliationInput,
    ) -> Result<ReconciliationOutput, ReconcileError> {
        let mut pass = Pass {
            operation: input.operation,
            diagnostics: Vec::new(),
        };
        let root = AttributePath::root();

        let prior = match input.operation {
            OperationKind::Create => None,
            OperationKind::Read | OperationKind::Update => input.prior_state.as_ref(),
        };
        let plan = match input.operation {
            OperationKind::Read => prior,
            OperationKind::Create | OperationKind::Update => input.plan.as_ref(),
        };

        let state = match plan {
            Some(ValueNode::Object(fields)) => {
                let prior_fields = self.prior_fields(prior, &root, &mut pass);
                ValueNode::Object(self.reconcile_fields(
                    self.schema.attributes(),
                    fields,
                    prior_fields,
                    &root,
                    &mut pass,
                ))
            }
            Some(other) => {
                pass.report(&root, format!("expected an object, found {}", other.kind()));
                ValueNode::Null
            }
            None if input.operation == OperationKind::Read => {
                pass.report(&root, "prior state is required to read a resource");
                ValueNode::Null
            }
            None => {
                pass.report(&root, "a plan is required");
                ValueNode::Null
            }
        };

        if pass.diagnostics.is_empty() {
            tracing::debug!(operation = %input.operation, "reconciliation complete");
            Ok(state)
        } else {
            tracing::debug!(
                operation = %input.operation,
                problems = pass.diagnostics.len(),
                "reconciliation rejected"
            );
            Err(ReconcileError::SchemaMismatch {
                operation: input.operation,
                diagnostics: pass.diagnostics,
            })
        }
    }

    fn prior_fields<'p>(
        &self,
        prior: Option<&'p ValueNode>,
        path: &AttributePath,
        pass: &mut Pass,
    ) -> Option<&'p Fields> {
        match prior {
            Some(ValueNode::Object(fields)) => Some(fields),
            Some(ValueNode::Scalar(_)) if pass.checks_prior() => {
                pass.report(path, "prior state: expected an object, found string");
                None
            }
            _ => None,
        }
    }

    fn reconcile_fields(
        &self,
        specs: &[AttributeSpec],
        plan: &Fields,
        prior: Option<&Fields>,
        parent: &AttributePath,
        pass: &mut Pass,
    ) -> Fields {
        for name in plan.keys() {
            if !specs.iter().any(|spec| &spec.name == name) {
                pass.report(&parent.child(name), "attribute is not declared in the schema");
            }
        }
        if let Some(prior) = prior.filter(|_| pass.checks_prior()) {
            for name in prior.keys() {
                if !specs.iter().any(|spec| &spec.name == name) {
                    pass.report(
                        &parent.child(name),
                        "prior state: attribute is not declared in the schema",
                    );
                }
            }
        }

        let mut out = Fields::new();
        for spec in specs {
            let path = parent.child(&spec.name);
            let planned = plan.get(&spec.name).unwrap_or(&ValueNode::Null);
            let prior_value = prior.and_then(|fields| fields.get(&spec.name));
            let value = self.reconcile_attribute(spec, planned, prior_value, &path, pass);
            out.insert(spec.name.clone(), value);
        }
        out
    }

    fn reconcile_attribute(
        &self,
        spec: &AttributeSpec,
        planned: &ValueNode,
        prior: Option<&ValueNode>,
        path: &AttributePath,
        pass: &mut Pass,
    ) -> ValueNode {
        match spec.role {
            Role::UserSettable | Role::UserSettableOptional if spec.is_object() => {
                self.reconcile_block(spec, planned, prior, path, pass)
            }
            Role::UserSettable | Role::UserSettableOptional => {
                user_scalar(spec, planned, path, pass)
            }
            Role::SystemComputedSticky => {
                check_computed_shape(planned, prior, path, pass);
                match prior.and_then(ValueNode::as_scalar) {
                    Some(existing) => {
                        tracing::debug!(%path, "sticky value carried forward");
                        ValueNode::scalar(existing)
                    }
                    None => self.compute(spec, path, true, pass),
                }
            }
            Role::SystemComputedVolatile => {
                check_computed_shape(planned, prior, path, pass);
                let first = !matches!(prior, Some(ValueNode::Scalar(_)));
                self.compute(spec, path, first, pass)
            }
        }
    }

    fn reconcile_block(
        &self,
        spec: &AttributeSpec,
        planned: &ValueNode,
        prior: Option<&ValueNode>,
        path: &AttributePath,
        pass: &mut Pass,
    ) -> ValueNode {
        match planned {
            ValueNode::Null => {
                if spec.role == Role::UserSettable {
                    pass.report(path, "required block is missing");
                }
                ValueNode::Null
            }
            ValueNode::Object(fields) => {
                let prior_fields = self.prior_fields(prior, path, pass);
                if prior_fields.is_none() {
                    tracing::debug!(%path, "block introduced, computing nested values fresh");
                }
                ValueNode::Object(self.reconcile_fields(
                    &spec.children,
                    fields,
                    prior_fields,
                    path,
                    pass,
                ))
            }
            ValueNode::Unknown => {
                pass.report(path, "block is still unknown at apply time");
                ValueNode::Null
            }
            ValueNode::Scalar(_) => {
                pass.report(path, "expected an object, found string");
                ValueNode::Null
            }
        }
    }

    fn compute(
        &self,
        spec: &AttributeSpec,
        path: &AttributePath,
        first_computation: bool,
        pass: &Pass,
    ) -> ValueNode {
        let request = ComputeRequest {
            path,
            role: spec.role,
            operation: pass.operation,
            first_computation,
        };
        let value = self.source.compute(&request);
        tracing::debug!(%path, role = %spec.role, first_computation, "computed value");
        ValueNode::Scalar(value)
    }
}

fn user_scalar(
    spec: &AttributeSpec,
    planned: &ValueNode,
    path: &AttributePath,
    pass: &mut Pass,
) -> ValueNode {
    match planned {
        ValueNode::Scalar(value) => ValueNode::Scalar(value.clone()),
        ValueNode::Null => {
            if spec.role == Role::UserSettable {
                pass.report(path, "required attribute is missing");
            }
            ValueNode::Null
        }
        ValueNode::Unknown => {
            pass.report(path, "value is still unknown at apply time");
            ValueNode::Null
        }
        ValueNode::Object(_) => {
            pass.report(path, "expected a string, found object");
            ValueNode::Null
        }
    }
}

// Plan values for computed attributes are ignored, but must still be scalar.
fn check_computed_shape(
    planned: &ValueNode,
    prior: Option<&ValueNode>,
    path: &AttributePath,
    pass: &mut Pass,
) {
    if matches!(planned, ValueNode::Object(_)) {
        pass.report(path, "expected a string, found object");
    }
    if pass.checks_prior() && matches!(prior, Some(ValueNode::Object(_))) {
        pass.report(path, "prior state: expected a string, found object");
    }
}
