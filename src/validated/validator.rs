//! The parse contract consumed by validated steps.

use std::fmt::{self, Display};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use serde_path_to_error::Segment;
use stillwater::prelude::*;

use crate::path::{ErrorPath, PathKey};

/// One problem a validator found in a raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Where in the raw value the problem is.
    pub path: ErrorPath,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Creates an issue at `path`.
    pub fn new(path: ErrorPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// An issue about the whole value.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(ErrorPath::root(), message)
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The outcome of a parse: the typed value, or at least one issue.
pub type Parsed<T> = Validation<T, NonEmptyVec<Issue>>;

/// Anything that can parse a raw JSON value.
///
/// Adapters for third-party validation libraries implement this trait; the
/// validated constructor only ever sees this contract.
pub trait Validator: Send + Sync {
    /// The value produced by a successful parse.
    type Output;

    /// Parses `raw`, reporting every issue found.
    fn parse(&self, raw: &Value) -> Parsed<Self::Output>;
}

/// Accepts only `null`, the absence of input.
///
/// Used by [`make_step`](crate::make_step) when no input validator is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl Validator for NoInput {
    type Output = ();

    fn parse(&self, raw: &Value) -> Parsed<()> {
        match raw {
            Value::Null => Validation::Success(()),
            other => Validation::Failure(NonEmptyVec::singleton(Issue::root(format!(
                "expected no input, got {}",
                value_kind(other)
            )))),
        }
    }
}

/// Accepts any JSON object; `null` is read as an empty object.
///
/// Used by [`make_step`](crate::make_step) when no context validator is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyContext;

impl Validator for AnyContext {
    type Output = Map<String, Value>;

    fn parse(&self, raw: &Value) -> Parsed<Map<String, Value>> {
        match raw {
            Value::Object(fields) => Validation::Success(fields.clone()),
            Value::Null => Validation::Success(Map::new()),
            other => Validation::Failure(NonEmptyVec::singleton(Issue::root(format!(
                "expected an object, got {}",
                value_kind(other)
            )))),
        }
    }
}

/// Parses a raw value into any `serde` deserializable type.
///
/// Deserialization stops at the first mismatch, so at most one issue is
/// reported. Its path points at the offending field or element and its
/// message is the `serde_json` message.
///
/// ```rust
/// use composure::{Typed, Validator};
/// use serde_json::json;
///
/// let number = Typed::<i64>::new();
///
/// assert!(number.parse(&json!(3)).is_success());
/// assert!(number.parse(&json!("abc")).is_failure());
/// ```
pub struct Typed<T> {
    _output: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    /// Creates a validator for `T`.
    pub fn new() -> Self {
        Self {
            _output: PhantomData,
        }
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typed<{}>", std::any::type_name::<T>())
    }
}

impl<T: DeserializeOwned> Validator for Typed<T> {
    type Output = T;

    fn parse(&self, raw: &Value) -> Parsed<T> {
        match serde_path_to_error::deserialize(raw) {
            Ok(value) => Validation::Success(value),
            Err(error) => {
                let path = error_path(error.path());
                let issue = Issue::new(path, error.into_inner().to_string());
                Validation::Failure(NonEmptyVec::singleton(issue))
            }
        }
    }
}

fn error_path(path: &serde_path_to_error::Path) -> ErrorPath {
    path.iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(PathKey::Index(*index)),
            Segment::Map { key } => Some(PathKey::Key(key.clone())),
            Segment::Enum { variant } => Some(PathKey::Key(variant.clone())),
            _ => None,
        })
        .collect()
}

/// A validator built from a closure. See [`validator_fn`].
pub struct FnValidator<F, T> {
    parse: F,
    _output: PhantomData<fn() -> T>,
}

/// Wraps a parsing closure as a [`Validator`].
///
/// ```rust
/// use composure::{validator_fn, Issue, Validator};
/// use serde_json::json;
/// use stillwater::prelude::*;
///
/// let positive = validator_fn(|raw| match raw.as_i64() {
///     Some(n) if n > 0 => Validation::Success(n),
///     _ => Validation::Failure(NonEmptyVec::singleton(Issue::root("expected a positive number"))),
/// });
///
/// assert!(positive.parse(&json!(5)).is_success());
/// assert!(positive.parse(&json!(-5)).is_failure());
/// ```
pub fn validator_fn<F, T>(parse: F) -> FnValidator<F, T>
where
    F: Fn(&Value) -> Parsed<T> + Send + Sync,
{
    FnValidator {
        parse,
        _output: PhantomData,
    }
}

impl<F, T> Validator for FnValidator<F, T>
where
    F: Fn(&Value) -> Parsed<T> + Send + Sync,
{
    type Output = T;

    fn parse(&self, raw: &Value) -> Parsed<T> {
        (self.parse)(raw)
    }
}

/// Describes the JSON type of a value for messages ("a string", "null").
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
