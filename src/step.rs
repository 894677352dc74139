//! The step type shared by every combinator.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::error::{StepError, StepErrors};
use crate::StepResult;

type StepFn<I, O, C> = dyn Fn(I, C) -> BoxFuture<'static, StepResult<O>> + Send + Sync;

/// An async function from an input and a context to a [`StepResult`].
///
/// A step never raises: whatever its logic raises or panics with comes back as
/// `Validation::Failure`. Steps are immutable; cloning shares the underlying
/// function, and combinators build new steps around existing ones.
///
/// `C` is the context threaded unchanged through every composed step. It
/// defaults to a JSON value so that validated steps and hand-written steps
/// compose without conversion.
///
/// # Example
///
/// ```rust
/// use composure::{composable_fn, Step};
/// use std::convert::Infallible;
/// use stillwater::Validation;
///
/// let double: Step<i64, i64> = composable_fn(|n: i64, _ctx| Ok::<_, Infallible>(n * 2));
///
/// let result = futures::executor::block_on(double.call(21));
/// assert_eq!(result, Validation::Success(42));
/// ```
pub struct Step<I, O, C = Value> {
    run: Arc<StepFn<I, O, C>>,
}

impl<I, O, C> Step<I, O, C> {
    /// Wraps a function that already produces step results.
    ///
    /// Only the composable boundary and the combinators build steps this way;
    /// user logic enters through [`composable`](crate::composable).
    pub(crate) fn new<F>(run: F) -> Self
    where
        F: Fn(I, C) -> BoxFuture<'static, StepResult<O>> + Send + Sync + 'static,
    {
        Self { run: Arc::new(run) }
    }

    /// Starts the step with `input` and `context`.
    ///
    /// The synchronous part of the step's function runs before this returns;
    /// the rest runs when the future is polled.
    pub fn run(&self, input: I, context: C) -> BoxFuture<'static, StepResult<O>> {
        (self.run)(input, context)
    }
}

impl<I, O> Step<I, O, Value> {
    /// Runs the step with an empty JSON object as context.
    pub fn call(&self, input: I) -> BoxFuture<'static, StepResult<O>> {
        self.run(input, Value::Object(Map::new()))
    }
}

impl<I, O, C> Step<I, O, C>
where
    I: Send + 'static,
    O: Send + 'static,
    C: Clone + Send + 'static,
{
    /// Feeds this step's success into `next`. See [`pipe`](crate::pipe).
    pub fn pipe<P>(self, next: Step<O, P, C>) -> Step<I, P, C>
    where
        P: Send + 'static,
    {
        crate::pipe(self, next)
    }

    /// Transforms the success value. See [`map`](crate::map).
    pub fn map<U, F>(self, f: F) -> Step<I, U, C>
    where
        U: Send + 'static,
        F: Fn(O) -> U + Send + Sync + 'static,
    {
        crate::map(self, f)
    }

    /// Rewrites the error list of a failure. See [`map_error`](crate::map_error).
    pub fn map_error<F>(self, f: F) -> Step<I, O, C>
    where
        F: Fn(StepErrors) -> Vec<StepError> + Send + Sync + 'static,
    {
        crate::map_error(self, f)
    }
}

impl<I, O, C> Clone for Step<I, O, C> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<I, O, C> fmt::Debug for Step<I, O, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").finish_non_exhaustive()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Step<Value, Value>>();
    assert_sync::<Step<Value, Value>>();
};
