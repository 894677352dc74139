//! Choosing the next step at run time from the previous step's output.

use std::future::Future;

use either::Either;
use futures::future::FutureExt;
use stillwater::Validation;

use crate::composable::composable;
use crate::error::BoxError;
use crate::step::Step;

/// Runs `step`, then asks `resolver` which step, if any, should run next.
///
/// 1. If `step` fails, that failure is returned.
/// 2. `resolver` receives the success value. It runs through the composable
///    boundary, so an `Err` or panic ends the branch with that failure.
/// 3. `Ok(None)` ends the branch with `step`'s success value unchanged.
/// 4. `Ok(Some(next))` runs `next` with that value and the original context
///    and returns its result.
///
/// # Example
///
/// ```rust
/// use composure::{branch, composable_fn, Step};
/// use std::convert::Infallible;
/// use stillwater::Validation;
///
/// let count: Step<i32, i32> = composable_fn(|n: i32, _ctx| Ok::<_, Infallible>(n));
/// let halve: Step<i32, i32> = composable_fn(|n: i32, _ctx| Ok::<_, Infallible>(n / 2));
///
/// let step = branch(count, move |n| {
///     let halve = halve.clone();
///     async move { Ok::<_, Infallible>(if n % 2 == 0 { Some(halve) } else { None }) }
/// });
///
/// assert_eq!(futures::executor::block_on(step.call(8)), Validation::Success(4));
/// assert_eq!(futures::executor::block_on(step.call(7)), Validation::Success(7));
/// ```
pub fn branch<I, O, C, E, R, Fut>(step: Step<I, O, C>, resolver: R) -> Step<I, O, C>
where
    I: Send + 'static,
    O: Clone + Send + 'static,
    C: Clone + Send + 'static,
    E: Into<BoxError>,
    R: Fn(O) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Step<O, O, C>>, E>> + Send + 'static,
{
    branch_either(step, move |value: O| {
        let pending = resolver(value.clone());
        async move {
            pending.await.map(|next| match next {
                Some(next) => Either::Right(next),
                None => Either::Left(value),
            })
        }
    })
}

/// Like [`branch`], but the resolver may hand off to a step with a different
/// output type.
///
/// `Ok(Either::Left(done))` ends the branch with `done`. `Ok(Either::Right(next))`
/// runs `next` with `step`'s value and the original context. Failures of
/// `step` and of the resolver end the branch as in [`branch`].
///
/// ```rust
/// use composure::{branch_either, composable_fn, Either, Step};
/// use std::convert::Infallible;
/// use stillwater::Validation;
///
/// let lookup: Step<u32, u32> = composable_fn(|id: u32, _ctx| Ok::<_, Infallible>(id));
/// let render: Step<u32, String> =
///     composable_fn(|id: u32, _ctx| Ok::<_, Infallible>(format!("user #{}", id)));
///
/// let step = branch_either(lookup, move |id| {
///     let next = if id == 0 {
///         Either::Left("anonymous".to_string())
///     } else {
///         Either::Right(render.clone())
///     };
///     async move { Ok::<_, Infallible>(next) }
/// });
///
/// assert_eq!(
///     futures::executor::block_on(step.call(0)),
///     Validation::Success("anonymous".to_string())
/// );
/// assert_eq!(
///     futures::executor::block_on(step.call(7)),
///     Validation::Success("user #7".to_string())
/// );
/// ```
pub fn branch_either<I, O, P, C, E, R, Fut>(step: Step<I, O, C>, resolver: R) -> Step<I, P, C>
where
    I: Send + 'static,
    O: Clone + Send + 'static,
    P: Send + 'static,
    C: Clone + Send + 'static,
    E: Into<BoxError>,
    R: Fn(O) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Either<P, Step<O, P, C>>, E>> + Send + 'static,
{
    let resolve: Step<O, Either<P, Step<O, P, C>>, C> =
        composable(move |value, _context| resolver(value));

    Step::new(move |input, context: C| {
        let step = step.clone();
        let resolve = resolve.clone();
        async move {
            let value = match step.run(input, context.clone()).await {
                Validation::Success(value) => value,
                Validation::Failure(errors) => return Validation::Failure(errors),
            };
            match resolve.run(value.clone(), context.clone()).await {
                Validation::Success(Either::Right(next)) => next.run(value, context).await,
                Validation::Success(Either::Left(done)) => {
                    tracing::trace!("branch resolved to no further step");
                    Validation::Success(done)
                }
                Validation::Failure(errors) => Validation::Failure(errors),
            }
        }
        .boxed()
    })
}
