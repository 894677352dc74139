//! Step error types.
//!
//! This module provides [`StepError`] for a single failure and [`StepErrors`]
//! for the non-empty list every failed [`StepResult`](crate::StepResult) carries.

use std::error::Error;
use std::fmt::{self, Display};
use std::sync::Arc;

use stillwater::prelude::*;

use super::BoxError;
use crate::path::ErrorPath;

/// What a [`StepError`] blames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    /// The step's own logic failed.
    #[default]
    Generic,
    /// The caller supplied input that failed validation.
    Input,
    /// The caller supplied context that failed validation.
    Context,
}

/// A single failure with the location and value that caused it.
///
/// - **message**: human-readable description
/// - **kind**: whether the step itself failed or its input/context was rejected
/// - **path**: where inside the input or context the problem is (root for
///   generic failures)
/// - **cause**: the original raised error, kept for diagnostics
///
/// Equality compares message, kind and path. The cause is not compared.
///
/// # Example
///
/// ```rust
/// use composure::{ErrorKind, ErrorPath, StepError};
///
/// let error = StepError::input(ErrorPath::root().key("email"), "invalid email");
///
/// assert_eq!(error.kind, ErrorKind::Input);
/// assert_eq!(error.to_string(), "email: invalid email");
/// ```
#[derive(Debug, Clone)]
pub struct StepError {
    /// Human-readable error message.
    pub message: String,
    /// Which party the failure blames.
    pub kind: ErrorKind,
    /// The location of the rejected value.
    pub path: ErrorPath,
    /// The value originally raised, if any.
    pub cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl StepError {
    /// Creates a generic error at the root path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Generic,
            path: ErrorPath::root(),
            cause: None,
        }
    }

    /// Creates an input validation error at `path`.
    pub fn input(path: ErrorPath, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Input,
            path,
            ..Self::new(message)
        }
    }

    /// Creates a context validation error at `path`.
    pub fn context(path: ErrorPath, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Context,
            path,
            ..Self::new(message)
        }
    }

    /// Attaches the original raised error and returns self for chaining.
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(Arc::from(cause.into()));
        self
    }

    /// Returns true when the step's own logic failed.
    pub fn is_generic(&self) -> bool {
        self.kind == ErrorKind::Generic
    }

    /// Returns true when the input was rejected.
    pub fn is_input(&self) -> bool {
        self.kind == ErrorKind::Input
    }

    /// Returns true when the context was rejected.
    pub fn is_context(&self) -> bool {
        self.kind == ErrorKind::Context
    }
}

impl PartialEq for StepError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.kind == other.kind && self.path == other.path
    }
}

impl Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<StepError>();
    assert_sync::<StepError>();
};

/// The non-empty list of errors carried by a failed step.
///
/// Wrapping `NonEmptyVec` means a failure can never be built without at least
/// one error. Lists combine through `Semigroup`, keeping order, which is how
/// every combinator aggregates failures.
///
/// ```rust
/// use composure::{StepError, StepErrors};
/// use stillwater::prelude::*;
///
/// let errors = StepErrors::single(StepError::new("first"))
///     .combine(StepErrors::single(StepError::new("second")));
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors.first().message, "first");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StepErrors(NonEmptyVec<StepError>);

impl StepErrors {
    /// Creates a `StepErrors` holding one error.
    pub fn single(error: StepError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `StepErrors` from a non-empty vec.
    pub fn from_non_empty(errors: NonEmptyVec<StepError>) -> Self {
        Self(errors)
    }

    /// Creates a `StepErrors` from a vec, or `None` when the vec is empty.
    pub fn try_from_vec(errors: Vec<StepError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Returns the number of errors, always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API consistency.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the errors in order.
    pub fn iter(&self) -> impl Iterator<Item = &StepError> {
        self.0.iter()
    }

    /// Returns the first error.
    pub fn first(&self) -> &StepError {
        self.0.head()
    }

    /// Converts into a plain vec, keeping order.
    pub fn into_vec(self) -> Vec<StepError> {
        self.0.into_vec()
    }

    /// Returns the underlying non-empty vec.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<StepError> {
        &self.0
    }

    /// Returns the errors of one kind, in their original order.
    pub fn of_kind(&self, kind: ErrorKind) -> Vec<&StepError> {
        self.0.iter().filter(|e| e.kind == kind).collect()
    }

    /// Returns the errors reported at `path`.
    pub fn at_path(&self, path: &ErrorPath) -> Vec<&StepError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Splits the list into generic, input and context errors.
    ///
    /// Each part keeps the relative order of the original list.
    pub fn partition(self) -> (Vec<StepError>, Vec<StepError>, Vec<StepError>) {
        let mut generic = Vec::new();
        let mut input = Vec::new();
        let mut context = Vec::new();
        for error in self.0.into_vec() {
            match error.kind {
                ErrorKind::Generic => generic.push(error),
                ErrorKind::Input => input.push(error),
                ErrorKind::Context => context.push(error),
            }
        }
        (generic, input, context)
    }
}

impl Semigroup for StepErrors {
    fn combine(self, other: Self) -> Self {
        StepErrors(self.0.combine(other.0))
    }
}

impl From<StepError> for StepErrors {
    fn from(error: StepError) -> Self {
        Self::single(error)
    }
}

impl Display for StepErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "step failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl Error for StepErrors {}

impl IntoIterator for StepErrors {
    type Item = StepError;
    type IntoIter = std::vec::IntoIter<StepError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a StepErrors {
    type Item = &'a StepError;
    type IntoIter = Box<dyn Iterator<Item = &'a StepError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &StepErrors) -> Vec<&str> {
        errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_generic_error_defaults() {
        let error = StepError::new("boom");

        assert_eq!(error.kind, ErrorKind::Generic);
        assert!(error.path.is_root());
        assert!(error.cause.is_none());
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_input_and_context_constructors() {
        let input = StepError::input(ErrorPath::root().key("id"), "required");
        let context = StepError::context(ErrorPath::root().key("user"), "missing");

        assert!(input.is_input());
        assert!(context.is_context());
        assert_eq!(input.to_string(), "id: required");
    }

    #[test]
    fn test_equality_ignores_cause() {
        let plain = StepError::new("boom");
        let caused = StepError::new("boom").with_cause("underlying");

        assert_eq!(plain, caused);
        assert!(caused.source().is_some());
    }

    #[test]
    fn test_try_from_vec_rejects_empty() {
        assert!(StepErrors::try_from_vec(Vec::new()).is_none());

        let errors = StepErrors::try_from_vec(vec![StepError::new("a")]).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_combine_keeps_order() {
        let combined = StepErrors::single(StepError::new("a"))
            .combine(StepErrors::single(StepError::new("b")))
            .combine(StepErrors::single(StepError::new("c")));

        assert_eq!(messages(&combined), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_combine_does_not_deduplicate() {
        let combined = StepErrors::single(StepError::new("same"))
            .combine(StepErrors::single(StepError::new("same")));

        assert_eq!(combined.len(), 2);
    }

    #[test]
    fn test_partition_by_kind() {
        let errors = StepErrors::try_from_vec(vec![
            StepError::input(ErrorPath::root(), "bad input"),
            StepError::new("boom"),
            StepError::context(ErrorPath::root().key("tenant"), "bad context"),
            StepError::input(ErrorPath::root().key("age"), "too young"),
        ])
        .unwrap();

        let (generic, input, context) = errors.partition();

        assert_eq!(generic.len(), 1);
        assert_eq!(input.len(), 2);
        assert_eq!(input[0].message, "bad input");
        assert_eq!(input[1].message, "too young");
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_filters() {
        let errors = StepErrors::try_from_vec(vec![
            StepError::input(ErrorPath::root().key("a"), "one"),
            StepError::input(ErrorPath::root().key("a"), "two"),
            StepError::new("three"),
        ])
        .unwrap();

        assert_eq!(errors.at_path(&ErrorPath::root().key("a")).len(), 2);
        assert_eq!(errors.of_kind(ErrorKind::Generic).len(), 1);
    }

    #[test]
    fn test_display_lists_every_error() {
        let errors = StepErrors::single(StepError::new("boom"))
            .combine(StepErrors::single(StepError::input(
                ErrorPath::root().key("name"),
                "required",
            )));

        let display = errors.to_string();
        assert!(display.contains("2 error(s)"));
        assert!(display.contains("1. boom"));
        assert!(display.contains("2. name: required"));
    }
}
