//! Fan-out combinators: one input, many steps, one aggregated result.
//!
//! Every child future is created before any of them is awaited, then all are
//! polled together on the calling task. Children interleave at their
//! suspension points; nothing is spawned and no child is cancelled, so the
//! combinator resolves only after the last child does.

use futures::future::{self, FutureExt};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::prelude::*;

use super::{absorb, map, try_map};
use crate::error::{StepError, StepErrors};
use crate::step::Step;
use crate::validated::value_kind;
use crate::StepResult;

/// Runs every step concurrently with the same input and context.
///
/// Succeeds with the values in step order, not completion order. If any step
/// fails, the failure lists the errors of every failed step, concatenated in
/// step order; the successful values are dropped. An empty list succeeds with
/// an empty vec.
///
/// # Example
///
/// ```rust
/// use composure::{all, composable_fn, Step};
/// use std::convert::Infallible;
/// use stillwater::Validation;
///
/// let inc: Step<i32, i32> = composable_fn(|n: i32, _ctx| Ok::<_, Infallible>(n + 1));
/// let dec: Step<i32, i32> = composable_fn(|n: i32, _ctx| Ok::<_, Infallible>(n - 1));
///
/// let result = futures::executor::block_on(all(vec![inc, dec]).call(10));
/// assert_eq!(result, Validation::Success(vec![11, 9]));
/// ```
pub fn all<I, O, C>(steps: Vec<Step<I, O, C>>) -> Step<I, Vec<O>, C>
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
        future::join_all(running).map(gather).boxed()
    })
}

fn gather<O>(results: Vec<StepResult<O>>) -> StepResult<Vec<O>> {
    let total = results.len();
    let mut values = Vec::with_capacity(total);
    let mut failed: Option<StepErrors> = None;

    for result in results {
        match result {
            Validation::Success(value) => values.push(value),
            Validation::Failure(errors) => failed = Some(absorb(failed, errors)),
        }
    }

    match failed {
        Some(errors) => {
            tracing::trace!(
                total,
                succeeded = values.len(),
                errors = errors.len(),
                "fan-out failed"
            );
            Validation::Failure(errors)
        }
        None => Validation::Success(values),
    }
}

/// Like [`all`] for two steps with different output types.
pub fn all2<I, A, B, C>(first: Step<I, A, C>, second: Step<I, B, C>) -> Step<I, (A, B), C>
where
    I: Clone + Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
    C: Clone + Send + 'static,
{
    Step::new(move |input: I, context: C| {
        let left = first.run(input.clone(), context.clone());
        let right = second.run(input, context);
        future::join(left, right)
            .map(|outcome| match outcome {
                (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
                (Validation::Failure(a), Validation::Failure(b)) => {
                    Validation::Failure(a.combine(b))
                }
                (Validation::Failure(errors), _) | (_, Validation::Failure(errors)) => {
                    Validation::Failure(errors)
                }
            })
            .boxed()
    })
}

/// Runs a keyed set of steps concurrently and succeeds with their values
/// under the same keys, in the same order.
///
/// Errors aggregate exactly as in [`all`], in the map's iteration order.
///
/// ```rust
/// use composure::{collect, composable_fn, Step};
/// use indexmap::IndexMap;
/// use std::convert::Infallible;
/// use stillwater::Validation;
///
/// let mut named: IndexMap<String, Step<i32, i32>> = IndexMap::new();
/// named.insert("x".into(), composable_fn(|n: i32, _ctx| Ok::<_, Infallible>(n * 10)));
/// named.insert("y".into(), composable_fn(|n: i32, _ctx| Ok::<_, Infallible>(n + 1)));
///
/// match futures::executor::block_on(collect(named).call(2)) {
///     Validation::Success(values) => {
///         assert_eq!(values["x"], 20);
///         assert_eq!(values["y"], 3);
///     }
///     Validation::Failure(errors) => panic!("{}", errors),
/// }
/// ```
pub fn collect<I, O, C>(named: IndexMap<String, Step<I, O, C>>) -> Step<I, IndexMap<String, O>, C>
where
    I: Clone + Send + 'static,
    O: Send + 'static,
    C: Clone + Send + 'static,
{
    let tagged: Vec<Step<I, (String, O), C>> = named
        .into_iter()
        .map(|(key, step)| map(step, move |value| (key.clone(), value)))
        .collect();

    map(all(tagged), |pairs| pairs.into_iter().collect())
}

/// Runs steps that each produce a JSON object and shallow merges their
/// successes into one object.
///
/// Later steps win on key collisions. Failed steps aggregate as in [`all`].
/// When every step succeeds but some value is not an object, the merge fails
/// with one generic error per offending step.
pub fn merge<I, C>(steps: Vec<Step<I, Value, C>>) -> Step<I, Map<String, Value>, C>
where
    I: Clone + Send + 'static,
    C: Clone + Send + 'static,
{
    try_map(all(steps), merge_objects)
}

fn merge_objects(values: Vec<Value>) -> Result<Map<String, Value>, StepErrors> {
    let mut merged = Map::new();
    let mut rejected: Option<StepErrors> = None;

    for (position, value) in values.into_iter().enumerate() {
        match value {
            Value::Object(fields) => merged.extend(fields),
            other => {
                let error = StepError::new(format!(
                    "merge: step {} produced {} instead of an object",
                    position,
                    value_kind(&other)
                ));
                rejected = Some(absorb(rejected, StepErrors::single(error)));
            }
        }
    }

    match rejected {
        Some(errors) => Err(errors),
        None => Ok(merged),
    }
}
