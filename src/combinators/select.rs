//! First-success selection across concurrently running steps.

use futures::future::{self, FutureExt};
use stillwater::Validation;

use super::absorb;
use crate::error::{StepError, StepErrors};
use crate::step::Step;
use crate::StepResult;

/// Runs every step concurrently and returns the first success in step order.
///
/// The winner is chosen by position, not by completion time: if steps 0 and 2
/// both succeed, step 0 wins even when step 2 finished first. Every step runs
/// to completion before the result is returned, so side effects of losing
/// steps still happen. With no success, the failure lists every step's
/// errors in step order. An empty list fails with a single generic error.
///
/// # Example
///
/// ```rust
/// use composure::{composable_fn, first, Step};
/// use std::convert::Infallible;
/// use stillwater::Validation;
///
/// let cache: Step<u32, String> = composable_fn(|_, _ctx| Err("cache miss"));
/// let origin: Step<u32, String> =
///     composable_fn(|id: u32, _ctx| Ok::<_, Infallible>(format!("user-{}", id)));
///
/// let result = futures::executor::block_on(first(vec![cache, origin]).call(7));
/// assert_eq!(result, Validation::Success("user-7".to_string()));
/// ```
pub fn first<I, O, C>(steps: Vec<Step<I, O, C>>) -> Step<I, O, C>
where
    I: Clone + Send + 'static,
    O: Send + 'static,
    C: Clone + Send + 'static,
{
    Step::new(move |input: I, context: C| {
        let running: Vec<_> = steps
            .iter()
            .map(|step| step.run(input.clone(), context.clone()))
            .collect();
        future::join_all(running).map(pick_first).boxed()
    })
}

fn pick_first<O>(results: Vec<StepResult<O>>) -> StepResult<O> {
    let mut failed: Option<StepErrors> = None;

    for (position, result) in results.into_iter().enumerate() {
        match result {
            Validation::Success(value) => {
                tracing::trace!(position, "first success selected");
                return Validation::Success(value);
            }
            Validation::Failure(errors) => failed = Some(absorb(failed, errors)),
        }
    }

    Validation::Failure(
        failed.unwrap_or_else(|| StepErrors::single(StepError::new("first: no steps to run"))),
    )
}
