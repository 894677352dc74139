//! Conversion of raised values into step errors.
//!
//! Anything a step raises arrives here as a [`BoxError`], or as a panic
//! payload. Neither function panics: they accept every value a step can
//! produce and always return at least one error.

use std::any::Any;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::{StepError, StepErrors};

/// The boxed error type a step may raise.
///
/// `&str`, `String` and every `std::error::Error` convert into it, so step
/// functions can use `?` and `.into()` freely.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A raw JSON value raised as an error.
///
/// Objects with a string `message` field display as that message; strings
/// display unquoted; every other value displays as its JSON text.
///
/// ```rust
/// use composure::{normalize, RaisedValue};
/// use serde_json::json;
///
/// let errors = normalize(Box::new(RaisedValue(json!({"message": "denied", "code": 403}))));
/// assert_eq!(errors.first().message, "denied");
///
/// let errors = normalize(Box::new(RaisedValue(json!(null))));
/// assert_eq!(errors.first().message, "null");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", message_of(.0))]
pub struct RaisedValue(pub Value);

fn message_of(value: &Value) -> String {
    match value {
        Value::Object(fields) => match fields.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => value.to_string(),
        },
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Converts a raised error into the errors of a failure.
///
/// - a raised [`StepErrors`] list is returned whole
/// - a raised [`StepError`] is kept as is
/// - anything else becomes a generic error whose message is the raised
///   value's `Display` text, keeping the value as the cause
pub fn normalize(raised: BoxError) -> StepErrors {
    let raised = match raised.downcast::<StepErrors>() {
        Ok(errors) => return *errors,
        Err(other) => other,
    };
    let raised = match raised.downcast::<StepError>() {
        Ok(error) => return StepErrors::single(*error),
        Err(other) => other,
    };

    let mut error = StepError::new(raised.to_string());
    error.cause = Some(Arc::from(raised));
    StepErrors::single(error)
}

/// Converts the payload of a caught panic into the errors of a failure.
pub fn normalize_panic(payload: Box<dyn Any + Send>) -> StepErrors {
    let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "step panicked".to_string()
    };
    StepErrors::single(StepError::new(message))
}
