//! Post-processing of a step's success or failure channel.

use std::convert::Infallible;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use stillwater::Validation;

use super::pipe;
use crate::composable::{composable, composable_fn};
use crate::error::{BoxError, StepError, StepErrors};
use crate::step::Step;
use crate::StepResult;

/// Applies `f` to the success value of `step`.
///
/// Failures pass through and `f` does not run. A panic in `f` turns the
/// success into a failure, normalized as by the composable boundary.
pub fn map<I, O, U, C, F>(step: Step<I, O, C>, f: F) -> Step<I, U, C>
where
    I: Send + 'static,
    O: Send + 'static,
    U: Send + 'static,
    C: Clone + Send + 'static,
    F: Fn(O) -> U + Send + Sync + 'static,
{
    pipe(step, composable_fn(move |value, _context: C| Ok::<_, Infallible>(f(value))))
}

/// Like [`map`] for a fallible `f`; an `Err` becomes the failure.
pub fn try_map<I, O, U, C, E, F>(step: Step<I, O, C>, f: F) -> Step<I, U, C>
where
    I: Send + 'static,
    O: Send + 'static,
    U: Send + 'static,
    C: Clone + Send + 'static,
    E: Into<BoxError>,
    F: Fn(O) -> Result<U, E> + Send + Sync + 'static,
{
    pipe(step, composable_fn(move |value, _context: C| f(value)))
}

/// Replaces the error list of a failure with `f(errors)`.
///
/// Successes pass through and `f` does not run. A panic in `f` replaces the
/// failure with the normalized panic error. A failure cannot be empty, so
/// when `f` returns no errors the original list is kept.
///
/// ```rust
/// use composure::{composable_fn, map_error, Step, StepError};
/// use stillwater::Validation;
///
/// let step: Step<(), ()> = composable_fn(|_, _ctx| Err("db down"));
/// let friendly = map_error(step, |errors| {
///     errors
///         .into_iter()
///         .map(|e| StepError::new(format!("unavailable ({})", e.message)))
///         .collect()
/// });
///
/// match futures::executor::block_on(friendly.call(())) {
///     Validation::Failure(errors) => assert_eq!(errors.first().message, "unavailable (db down)"),
///     Validation::Success(_) => unreachable!(),
/// }
/// ```
pub fn map_error<I, O, C, F>(step: Step<I, O, C>, f: F) -> Step<I, O, C>
where
    I: Send + 'static,
    O: Send + 'static,
    C: Send + 'static,
    F: Fn(StepErrors) -> Vec<StepError> + Send + Sync + 'static,
{
    let mapper: Step<StepErrors, Vec<StepError>, ()> =
        composable_fn(move |errors, _| Ok::<_, Infallible>(f(errors)));

    Step::new(move |input, context| {
        let step = step.clone();
        let mapper = mapper.clone();
        async move {
            let errors = match step.run(input, context).await {
                Validation::Success(value) => return Validation::Success(value),
                Validation::Failure(errors) => errors,
            };
            match mapper.run(errors.clone(), ()).await {
                Validation::Success(mapped) => match StepErrors::try_from_vec(mapped) {
                    Some(mapped) => Validation::Failure(mapped),
                    None => {
                        tracing::trace!("error mapper returned no errors, keeping originals");
                        Validation::Failure(errors)
                    }
                },
                Validation::Failure(raised) => Validation::Failure(raised),
            }
        }
        .boxed()
    })
}

/// Recovers from a failure of `step` by running `handler` with the errors,
/// the original input and the context.
///
/// `handler` runs through the composable boundary, so an `Err` or a panic in
/// it becomes the final failure. Successes of `step` pass through untouched.
pub fn catch_error<I, O, C, E, F, Fut>(step: Step<I, O, C>, handler: F) -> Step<I, O, C>
where
    I: Clone + Send + 'static,
    O: Send + 'static,
    C: Clone + Send + 'static,
    E: Into<BoxError>,
    F: Fn(StepErrors, I, C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
{
    let recover: Step<(StepErrors, I), O, C> =
        composable(move |(errors, input), context| handler(errors, input, context));

    Step::new(move |input: I, context: C| {
        let step = step.clone();
        let recover = recover.clone();
        async move {
            match step.run(input.clone(), context.clone()).await {
                Validation::Success(value) => Validation::Success(value),
                Validation::Failure(errors) => {
                    tracing::trace!(errors = errors.len(), "recovering from failure");
                    recover.run((errors, input), context).await
                }
            }
        }
        .boxed()
    })
}

/// Turns a step back into a plain async function returning `Result`.
///
/// The returned function yields the success value or the full error list, so
/// composed steps can be called with `?` from ordinary code. If the error is
/// raised again inside another composable, the whole list is restored.
///
/// ```rust
/// use composure::{composable_fn, from_success, Step};
/// use std::convert::Infallible;
///
/// let step: Step<i32, i32> = composable_fn(|n: i32, _ctx| Ok::<_, Infallible>(n + 1));
/// let run = from_success(step);
///
/// let value = futures::executor::block_on(run(1, serde_json::json!({}))).unwrap();
/// assert_eq!(value, 2);
/// ```
pub fn from_success<I, O, C>(
    step: Step<I, O, C>,
) -> impl Fn(I, C) -> BoxFuture<'static, Result<O, StepErrors>> + Clone + Send + Sync
where
    I: Send + 'static,
    O: Send + 'static,
    C: Send + 'static,
{
    move |input, context| {
        step.run(input, context)
            .map(|result| match result {
                Validation::Success(value) => Ok(value),
                Validation::Failure(errors) => Err(errors),
            })
            .boxed()
    }
}

/// Calls `tracer` with the result, input and context of every run of `step`.
///
/// The result is returned unchanged unless `tracer` returns an `Err` or
/// panics, in which case that failure replaces it.
pub fn trace<I, O, C, E, F>(step: Step<I, O, C>, tracer: F) -> Step<I, O, C>
where
    I: Clone + Send + 'static,
    O: Send + 'static,
    C: Clone + Send + 'static,
    E: Into<BoxError>,
    F: Fn(&StepResult<O>, &I, &C) -> Result<(), E> + Send + Sync + 'static,
{
    let observe: Step<(StepResult<O>, I), StepResult<O>, C> =
        composable_fn(move |(result, input), context| {
            tracer(&result, &input, &context).map(|()| result)
        });

    Step::new(move |input: I, context: C| {
        let step = step.clone();
        let observe = observe.clone();
        async move {
            let result = step.run(input.clone(), context.clone()).await;
            match observe.run((result, input), context).await {
                Validation::Success(result) => result,
                Validation::Failure(errors) => Validation::Failure(errors),
            }
        }
        .boxed()
    })
}
