use crate::reconcile::{ComputeRequest, ValueSource};
use crate::schema::{ID, SINGLE_NESTED_VAL, STRING_VAL_DYNAMIC, STRING_VAL_STATIC};

pub const ID_VALUE: &str = "id";
pub const STATIC_VALUE: &str = "service static string";
pub const DYNAMIC_VALUE: &str = "service dynamic string";
pub const DYNAMIC_UPDATED_VALUE: &str =
    "service dynamic string, updated because this block is defined";

/// Stands in for the remote service. Values are fixed placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

impl ValueSource for StubBackend {
    fn compute(&self, request: &ComputeRequest<'_>) -> String {
        let segments: Vec<&str> = request
            .path
            .segments()
            .iter()
            .map(String::as_str)
            .collect();

        match segments.as_slice() {
            [ID] => ID_VALUE.to_string(),
            [SINGLE_NESTED_VAL, STRING_VAL_STATIC] => STATIC_VALUE.to_string(),
            [SINGLE_NESTED_VAL, STRING_VAL_DYNAMIC] if request.first_computation => {
                DYNAMIC_VALUE.to_string()
            }
            [SINGLE_NESTED_VAL, STRING_VAL_DYNAMIC] => DYNAMIC_UPDATED_VALUE.to_string(),
            _ => {
                tracing::warn!(path = %request.path, "no stub value for attribute");
                format!("service value for {}", request.path)
            }
        }
    }
}
