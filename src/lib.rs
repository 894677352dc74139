//! # Composure
//!
//! Compose fallible async steps into pipelines, fan-outs, races and branches
//! that report failures as values instead of raising them.
//!
//! ## Overview
//!
//! A [`Step`] is an async function from an input and a context to a
//! [`StepResult`]. User logic becomes a step through [`composable`] or
//! [`composable_fn`], the one place where returned errors and panics are
//! caught and normalized into [`StepErrors`]. Everything above that boundary
//! is plain data flow over stillwater's `Validation`:
//!
//! - [`pipe`] / [`pipe!`] / [`sequence`]: run steps in order, stop at the first failure
//! - [`all`] / [`collect`] / [`merge`]: run steps concurrently, accumulate every error
//! - [`first`]: run steps concurrently, keep the first success by position
//! - [`branch`] / [`branch_either`]: pick the next step from the previous output
//! - [`map`], [`map_error`], [`catch_error`], [`trace`]: post-process a step
//!
//! [`make_step`] parses raw JSON input and context through a [`Validator`]
//! before the handler runs, tagging rejections as input or context errors.
//! [`serialize`] gives the transport shape of a result.
//!
//! ## Example
//!
//! ```rust
//! use composure::{all, composable_fn, pipe, Step};
//! use std::convert::Infallible;
//! use stillwater::Validation;
//!
//! let parse: Step<String, i64> = composable_fn(|raw: String, _ctx| raw.parse::<i64>());
//! let double: Step<i64, i64> = composable_fn(|n: i64, _ctx| Ok::<_, Infallible>(n * 2));
//! let negate: Step<i64, i64> = composable_fn(|n: i64, _ctx| Ok::<_, Infallible>(-n));
//!
//! let step = pipe(parse, all(vec![double, negate]));
//!
//! let result = futures::executor::block_on(step.call("21".to_string()));
//! assert_eq!(result, Validation::Success(vec![42, -21]));
//!
//! // Errors are values, never panics
//! let result = futures::executor::block_on(step.call("twenty".to_string()));
//! assert!(result.is_failure());
//! ```

pub mod combinators;
pub mod composable;
pub mod error;
mod macros;
pub mod path;
pub mod serialize;
pub mod step;
pub mod validated;

pub use combinators::{
    all, all2, branch, branch_either, catch_error, collect, first, from_success, map, map_error,
    merge, pipe, sequence, sequence2, trace, try_map,
};
pub use composable::{composable, composable_fn};
pub use either::Either;
pub use error::{
    normalize, normalize_panic, BoxError, ErrorKind, RaisedValue, StepError, StepErrors,
};
pub use path::{ErrorPath, PathKey};
pub use serialize::{serialize, serialize_error, SerializedError, SerializedResult};
pub use step::Step;
pub use validated::{
    make_step, validator_fn, AnyContext, FnValidator, Issue, NoInput, Parsed, StepBuilder, Typed,
    Validator,
};

/// The outcome of running a step.
pub type StepResult<T> = stillwater::Validation<T, StepErrors>;
