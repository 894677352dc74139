//! Steps whose input and context are parsed before the handler runs.
//!
//! A [`Validator`] turns a raw JSON value into a typed one or a non-empty
//! list of [`Issue`]s. [`make_step`] pairs an input validator and a context
//! validator with a handler: both validators always run, their issues are
//! reported together as [`ErrorKind::Input`](crate::ErrorKind::Input) and
//! [`ErrorKind::Context`](crate::ErrorKind::Context) errors, and the handler
//! only runs when both succeed.
//!
//! # Example
//!
//! ```rust
//! use composure::{make_step, Typed};
//! use std::convert::Infallible;
//! use stillwater::Validation;
//! use serde_json::json;
//!
//! let increment = make_step()
//!     .input(Typed::<i64>::new())
//!     .handler_fn(|n, _ctx| Ok::<_, Infallible>(n + 1));
//!
//! assert_eq!(
//!     futures::executor::block_on(increment.call(json!(1))),
//!     Validation::Success(2)
//! );
//! assert!(futures::executor::block_on(increment.call(json!("abc"))).is_failure());
//! ```

mod builder;
mod validator;

pub use builder::{make_step, StepBuilder};
pub use validator::{
    validator_fn, AnyContext, FnValidator, Issue, NoInput, Parsed, Typed, Validator,
};

pub(crate) use validator::value_kind;
