//! Transport shape of a step result.
//!
//! [`serialize`] turns a [`StepResult`] into a serde-serializable value whose
//! failure form splits the errors by kind:
//!
//! ```json
//! { "ok": true, "value": 42 }
//! { "ok": false, "errors": [], "inputErrors": [{ "message": "...", "path": ["age"] }], "contextErrors": [] }
//! ```

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use stillwater::Validation;

use crate::error::StepError;
use crate::path::ErrorPath;
use crate::StepResult;

/// One error as sent across a transport boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedError {
    /// Human-readable error message.
    pub message: String,
    /// Location of the rejected value, as a list of keys and indices.
    pub path: ErrorPath,
}

/// A step result as sent across a transport boundary.
///
/// The `ok` discriminator is not stored: it is written as `true` for
/// [`Success`](SerializedResult::Success) and `false` for
/// [`Failure`](SerializedResult::Failure), so it can never disagree with the
/// variant.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedResult<T> {
    /// The step's value, written as `value`.
    Success(T),
    /// The step's errors split by kind.
    Failure {
        /// Generic errors raised by the step itself.
        errors: Vec<SerializedError>,
        /// Written as `inputErrors`.
        input_errors: Vec<SerializedError>,
        /// Written as `contextErrors`.
        context_errors: Vec<SerializedError>,
    },
}

impl<T> SerializedResult<T> {
    /// Returns true for the success form, the value written as `ok`.
    pub fn is_ok(&self) -> bool {
        matches!(self, SerializedResult::Success(_))
    }
}

impl<T: Serialize> Serialize for SerializedResult<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SerializedResult::Success(value) => {
                let mut state = serializer.serialize_struct("SerializedResult", 2)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
                state.end()
            }
            SerializedResult::Failure {
                errors,
                input_errors,
                context_errors,
            } => {
                let mut state = serializer.serialize_struct("SerializedResult", 4)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("errors", errors)?;
                state.serialize_field("inputErrors", input_errors)?;
                state.serialize_field("contextErrors", context_errors)?;
                state.end()
            }
        }
    }
}

/// Converts one error into its transport shape, dropping kind and cause.
pub fn serialize_error(error: &StepError) -> SerializedError {
    SerializedError {
        message: error.message.clone(),
        path: error.path.clone(),
    }
}

/// Converts a result into its transport shape.
///
/// The three failure lists partition the original error list by kind, each
/// keeping the original relative order.
///
/// ```rust
/// use composure::{serialize, ErrorPath, StepError, StepErrors, StepResult};
/// use stillwater::prelude::*;
///
/// let result: StepResult<i32> = Validation::Failure(
///     StepErrors::single(StepError::input(ErrorPath::root().key("age"), "must be positive"))
///         .combine(StepErrors::single(StepError::new("db down"))),
/// );
///
/// let json = serde_json::to_value(serialize(result)).unwrap();
/// assert_eq!(json["ok"], false);
/// assert_eq!(json["inputErrors"][0]["path"], serde_json::json!(["age"]));
/// assert_eq!(json["errors"][0]["message"], "db down");
/// ```
pub fn serialize<T>(result: StepResult<T>) -> SerializedResult<T> {
    match result {
        Validation::Success(value) => SerializedResult::Success(value),
        Validation::Failure(errors) => {
            let (generic, input, context) = errors.partition();
            let convert = |errors: Vec<StepError>| -> Vec<SerializedError> {
                errors.iter().map(serialize_error).collect()
            };
            SerializedResult::Failure {
                errors: convert(generic),
                input_errors: convert(input),
                context_errors: convert(context),
            }
        }
    }
}
