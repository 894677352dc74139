//! Error types carried by failed steps.
//!
//! A failed step reports a [`StepErrors`] list, which is never empty. Each
//! [`StepError`] records a message, an [`ErrorKind`] separating a step's own
//! failures from bad input or context, and the [`ErrorPath`](crate::ErrorPath)
//! of the offending value. [`normalize`] turns anything a step raises into
//! that shape.

mod normalize;
mod step_error;

pub use normalize::{normalize, normalize_panic, BoxError, RaisedValue};
pub use step_error::{ErrorKind, StepError, StepErrors};
