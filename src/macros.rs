//! Variadic forms of the binary combinators.

/// Pipes any number of steps, left to right.
///
/// `pipe!(a, b, c)` is `pipe(a, pipe(b, c))`: each step receives the previous
/// step's success value, and the first failure stops the chain.
///
/// ```rust
/// use composure::{composable_fn, pipe, Step};
/// use std::convert::Infallible;
/// use stillwater::Validation;
///
/// let trim: Step<String, String> =
///     composable_fn(|s: String, _ctx| Ok::<_, Infallible>(s.trim().to_string()));
/// let parse: Step<String, u32> = composable_fn(|s: String, _ctx| s.parse::<u32>());
/// let square: Step<u32, u32> = composable_fn(|n: u32, _ctx| Ok::<_, Infallible>(n * n));
///
/// let step = pipe!(trim, parse, square);
/// let result = futures::executor::block_on(step.call(" 12 ".to_string()));
/// assert_eq!(result, Validation::Success(144));
/// ```
#[macro_export]
macro_rules! pipe {
    ($only:expr $(,)?) => {
        $only
    };
    ($first:expr, $($rest:expr),+ $(,)?) => {
        $crate::pipe($first, $crate::pipe!($($rest),+))
    };
}
