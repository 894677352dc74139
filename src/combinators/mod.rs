//! Combinators that build new steps out of existing ones.
//!
//! - sequential: [`pipe`], [`sequence`], [`sequence2`]
//! - parallel: [`all`], [`all2`], [`collect`], [`merge`]
//! - selection: [`first`]
//! - conditional: [`branch`], [`branch_either`]
//! - transformation: [`map`], [`try_map`], [`map_error`], [`catch_error`],
//!   [`from_success`], [`trace`]
//!
//! None of them catch anything. Raised errors are turned into failures by the
//! composable boundary, and combinators only match on results.

mod branch;
mod parallel;
mod select;
mod sequential;
mod transform;

pub use branch::{branch, branch_either};
pub use parallel::{all, all2, collect, merge};
pub use select::first;
pub use sequential::{pipe, sequence, sequence2};
pub use transform::{catch_error, from_success, map, map_error, trace, try_map};

use stillwater::prelude::*;

use crate::error::StepErrors;

/// Appends `errors` to the failures gathered so far.
fn absorb(gathered: Option<StepErrors>, errors: StepErrors) -> StepErrors {
    match gathered {
        Some(previous) => previous.combine(errors),
        None => errors,
    }
}
