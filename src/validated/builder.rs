//! The validated step constructor.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::future::{self, FutureExt};
use serde_json::Value;
use stillwater::prelude::*;

use super::validator::{AnyContext, Issue, NoInput, Parsed, Validator};
use crate::composable::{composable, composable_fn};
use crate::error::{normalize_panic, BoxError, ErrorKind, StepError, StepErrors};
use crate::step::Step;

/// Starts building a validated step with the default validators.
///
/// Without further configuration the step accepts only `null` input
/// ([`NoInput`]) and any object context ([`AnyContext`]).
pub fn make_step() -> StepBuilder<NoInput, AnyContext> {
    StepBuilder {
        input: NoInput,
        context: AnyContext,
    }
}

/// Builder pairing an input validator and a context validator with a handler.
#[derive(Debug, Clone)]
pub struct StepBuilder<IV, CV> {
    input: IV,
    context: CV,
}

impl<IV, CV> StepBuilder<IV, CV> {
    /// Sets the validator applied to the raw input.
    pub fn input<V: Validator>(self, validator: V) -> StepBuilder<V, CV> {
        StepBuilder {
            input: validator,
            context: self.context,
        }
    }

    /// Sets the validator applied to the raw context.
    pub fn context<V: Validator>(self, validator: V) -> StepBuilder<IV, V> {
        StepBuilder {
            input: self.input,
            context: validator,
        }
    }
}

impl<IV, CV> StepBuilder<IV, CV>
where
    IV: Validator + 'static,
    CV: Validator + 'static,
    IV::Output: Send + 'static,
    CV::Output: Send + 'static,
{
    /// Finishes the step with an async handler receiving the parsed input and
    /// context.
    pub fn handler<O, E, F, Fut>(self, handler: F) -> Step<Value, O, Value>
    where
        O: Send + 'static,
        E: Into<BoxError>,
        F: Fn(IV::Output, CV::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
    {
        self.guard(composable(handler))
    }

    /// Finishes the step with a synchronous handler.
    pub fn handler_fn<O, E, F>(self, handler: F) -> Step<Value, O, Value>
    where
        O: Send + 'static,
        E: Into<BoxError>,
        F: Fn(IV::Output, CV::Output) -> Result<O, E> + Send + Sync + 'static,
    {
        self.guard(composable_fn(handler))
    }

    fn guard<O>(self, run: Step<IV::Output, O, CV::Output>) -> Step<Value, O, Value>
    where
        O: Send + 'static,
    {
        let StepBuilder { input, context } = self;
        Step::new(move |raw_input: Value, raw_context: Value| {
            let parsed_input = checked(ErrorKind::Input, || input.parse(&raw_input));
            let parsed_context = checked(ErrorKind::Context, || context.parse(&raw_context));
            let rejected = match (parsed_input, parsed_context) {
                (Ok(parsed_input), Ok(parsed_context)) => {
                    return run.run(parsed_input, parsed_context);
                }
                (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => errors,
                (Err(input_errors), Err(context_errors)) => input_errors.combine(context_errors),
            };
            tracing::debug!(errors = rejected.len(), "step rejected its input or context");
            future::ready(Validation::Failure(rejected)).boxed()
        })
    }
}

/// Runs one validator, tagging its issues with `kind`.
///
/// A panicking validator becomes a generic failure, as a panicking handler
/// would at the composable boundary.
fn checked<T>(kind: ErrorKind, parse: impl FnOnce() -> Parsed<T>) -> Result<T, StepErrors> {
    match panic::catch_unwind(AssertUnwindSafe(parse)) {
        Ok(Validation::Success(value)) => Ok(value),
        Ok(Validation::Failure(issues)) => Err(tagged(issues, kind)),
        Err(payload) => {
            tracing::debug!(?kind, "validator panicked");
            Err(normalize_panic(payload))
        }
    }
}

fn tagged(issues: NonEmptyVec<Issue>, kind: ErrorKind) -> StepErrors {
    let error = |issue: &Issue| StepError {
        kind,
        path: issue.path.clone(),
        ..StepError::new(issue.message.clone())
    };
    issues
        .iter()
        .skip(1)
        .fold(StepErrors::single(error(issues.head())), |errors, issue| {
            errors.combine(StepErrors::single(error(issue)))
        })
}
