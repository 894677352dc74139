//! Left-to-right composition with short circuit on the first failure.

use std::sync::Arc;

use futures::future::FutureExt;
use stillwater::Validation;

use crate::step::Step;

/// Runs `first`, then feeds its success value into `second`.
///
/// The context is handed unchanged to both steps. If `first` fails, its
/// failure is returned as is and `second` never runs. `second` does not start
/// until `first` has fully completed.
///
/// For more than two steps use [`pipe!`](crate::pipe!) or [`Step::pipe`].
///
/// # Example
///
/// ```rust
/// use composure::{composable_fn, pipe, Step};
/// use std::convert::Infallible;
/// use stillwater::Validation;
///
/// let parse: Step<String, i64> = composable_fn(|raw: String, _ctx| raw.trim().parse::<i64>());
/// let double: Step<i64, i64> = composable_fn(|n: i64, _ctx| Ok::<_, Infallible>(n * 2));
///
/// let step = pipe(parse, double);
/// let result = futures::executor::block_on(step.call(" 21 ".to_string()));
/// assert_eq!(result, Validation::Success(42));
/// ```
pub fn pipe<A, B, D, C>(first: Step<A, B, C>, second: Step<B, D, C>) -> Step<A, D, C>
where
    A: Send + 'static,
    B: Send + 'static,
    D: Send + 'static,
    C: Clone + Send + 'static,
{
    Step::new(move |input, context: C| {
        let first = first.clone();
        let second = second.clone();
        async move {
            match first.run(input, context.clone()).await {
                Validation::Success(value) => second.run(value, context).await,
                Validation::Failure(errors) => {
                    tracing::trace!(errors = errors.len(), "pipe stopped at first step");
                    Validation::Failure(errors)
                }
            }
        }
        .boxed()
    })
}

/// Runs `steps` left to right, threading each success into the next step,
/// and succeeds with every intermediate value in order.
///
/// Stops at the first failure, which is returned unchanged. An empty list
/// succeeds with an empty vec.
pub fn sequence<T, C>(steps: Vec<Step<T, T, C>>) -> Step<T, Vec<T>, C>
where
    T: Clone + Send + 'static,
    C: Clone + Send + 'static,
{
    let steps: Arc<[Step<T, T, C>]> = steps.into();
    Step::new(move |input, context: C| {
        let steps = Arc::clone(&steps);
        async move {
            let mut values = Vec::with_capacity(steps.len());
            let mut current = input;
            for (position, step) in steps.iter().enumerate() {
                match step.run(current, context.clone()).await {
                    Validation::Success(value) => {
                        values.push(value.clone());
                        current = value;
                    }
                    Validation::Failure(errors) => {
                        tracing::trace!(position, errors = errors.len(), "sequence stopped");
                        return Validation::Failure(errors);
                    }
                }
            }
            Validation::Success(values)
        }
        .boxed()
    })
}

/// Like [`sequence`] for two steps with different output types.
pub fn sequence2<A, B, D, C>(first: Step<A, B, C>, second: Step<B, D, C>) -> Step<A, (B, D), C>
where
    A: Send + 'static,
    B: Clone + Send + 'static,
    D: Send + 'static,
    C: Clone + Send + 'static,
{
    Step::new(move |input, context: C| {
        let first = first.clone();
        let second = second.clone();
        async move {
            let head = match first.run(input, context.clone()).await {
                Validation::Success(value) => value,
                Validation::Failure(errors) => return Validation::Failure(errors),
            };
            match second.run(head.clone(), context).await {
                Validation::Success(tail) => Validation::Success((head, tail)),
                Validation::Failure(errors) => Validation::Failure(errors),
            }
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composable_fn;
    use futures::executor::block_on;
    use std::convert::Infallible;

    fn add(n: i32) -> Step<i32, i32> {
        composable_fn(move |x: i32, _ctx| Ok::<_, Infallible>(x + n))
    }

    #[test]
    fn test_sequence_keeps_every_value() {
        let step = sequence(vec![add(1), add(10), add(100)]);
        assert_eq!(block_on(step.call(0)), Validation::Success(vec![1, 11, 111]));
    }

    #[test]
    fn test_empty_sequence_succeeds() {
        let step: Step<i32, Vec<i32>> = sequence(Vec::new());
        assert_eq!(block_on(step.call(5)), Validation::Success(Vec::new()));
    }

    #[test]
    fn test_sequence2_pairs_values() {
        let to_text: Step<i32, String> =
            composable_fn(|n: i32, _ctx| Ok::<_, Infallible>(n.to_string()));
        let step = sequence2(add(1), to_text);
        assert_eq!(
            block_on(step.call(1)),
            Validation::Success((2, "2".to_string()))
        );
    }
}
