//! The boundary where raised errors and panics become failures.
//!
//! [`composable`] and [`composable_fn`] are the only places in the crate that
//! catch anything. Every combinator above them works on
//! [`StepResult`](crate::StepResult) values with ordinary control flow.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::future::{self, FutureExt};
use stillwater::Validation;

use crate::error::{normalize, normalize_panic, BoxError, StepErrors};
use crate::step::Step;
use crate::StepResult;

/// Wraps an async function so every call returns a step result.
///
/// `Ok(value)` becomes `Validation::Success(value)`. An `Err`, or a panic while
/// calling `f` or polling its future, becomes a failure carrying the
/// normalized error.
///
/// # Example
///
/// ```rust
/// use composure::{composable, Step};
///
/// let parse: Step<String, i64> =
///     composable(|raw: String, _ctx| async move { raw.parse::<i64>() });
///
/// let ok = futures::executor::block_on(parse.call("7".to_string()));
/// assert!(ok.is_success());
///
/// let bad = futures::executor::block_on(parse.call("seven".to_string()));
/// assert!(bad.is_failure());
/// ```
pub fn composable<I, O, C, E, F, Fut>(f: F) -> Step<I, O, C>
where
    I: Send + 'static,
    O: Send + 'static,
    C: Send + 'static,
    E: Into<BoxError>,
    F: Fn(I, C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
{
    Step::new(move |input, context| {
        match panic::catch_unwind(AssertUnwindSafe(|| f(input, context))) {
            Ok(running) => AssertUnwindSafe(running)
                .catch_unwind()
                .map(|outcome| match outcome {
                    Ok(Ok(value)) => Validation::Success(value),
                    Ok(Err(raised)) => captured(normalize(raised.into())),
                    Err(payload) => captured(normalize_panic(payload)),
                })
                .boxed(),
            Err(payload) => future::ready(captured(normalize_panic(payload))).boxed(),
        }
    })
}

/// Wraps a synchronous function so every call returns a step result.
///
/// Same contract as [`composable`].
pub fn composable_fn<I, O, C, E, F>(f: F) -> Step<I, O, C>
where
    I: Send + 'static,
    O: Send + 'static,
    C: Send + 'static,
    E: Into<BoxError>,
    F: Fn(I, C) -> Result<O, E> + Send + Sync + 'static,
{
    Step::new(move |input, context| {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| f(input, context))) {
            Ok(Ok(value)) => Validation::Success(value),
            Ok(Err(raised)) => captured(normalize(raised.into())),
            Err(payload) => captured(normalize_panic(payload)),
        };
        future::ready(outcome).boxed()
    })
}

fn captured<O>(errors: StepErrors) -> StepResult<O> {
    tracing::debug!(
        errors = errors.len(),
        first = %errors.first(),
        "step raised an error"
    );
    Validation::Failure(errors)
}
