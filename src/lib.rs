//! # testkit-task 🧰
//!
//! > Tests that wait for async tasks, run by a plain synchronous test engine
//!
//! **testkit-task** lets a suite declare the async work its assertions depend
//! on. Every task is resolved first, one at a time and in declaration order;
//! the finished tree of synchronous tests is then run and reported.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use testkit_task::prelude::*;
//!
//! #[testkit_task::main]
//! fn suite() -> DeferredTest {
//!     concat(vec![
//!         await_task(async { Ok::<_, String>(5) }, "five", |v| {
//!             test("is five", move || equal(5, v))
//!         }),
//!         await_error(async { Err::<(), _>("x") }, "expect-x", |e| {
//!             test("matches", move || equal("x", e))
//!         }),
//!     ])
//! }
//! ```
//!
//! ## Features
//!
//! - ⏳ **Task dependencies** - `await_task` / `await_error` resolve before tests run
//! - 🧱 **Composition** - `concat`, `describe` and `wrap` keep the hierarchy
//! - 💥 **Failures as tests** - a failed task is a failing test, never a crash
//! - 🎲 **Seeded fuzzing** - reproducible fuzz runs from a printed seed
//! - 🖥️ **Pluggable environment** - run against the real process or a mock

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod deferred;
pub mod env;
pub mod error;
pub mod program;
pub mod suite;

/// Prelude for convenient imports
///
/// ```rust
/// use testkit_task::prelude::*;
/// ```
pub mod prelude {
    pub use crate::deferred::{
        await_error, await_task, concat, describe, fuzz, only, skip, test, todo, wrap,
        DeferredTest,
    };
    pub use crate::env::{Environment, MockEnvironment, ProcessEnvironment};
    pub use crate::program::RunOptions;
    pub use crate::suite::{equal, err, is_true, not_equal, ok, Expectation};
}

// Re-exports
pub use deferred::{await_error, await_task, DeferredTest};
pub use error::{Error, Result};
pub use program::{run, run_with_options, RunOptions};

// Re-export the entry-point macro when the macros feature is enabled
#[cfg(feature = "macros")]
pub use testkit_task_macros::main;
