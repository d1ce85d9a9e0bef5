//! The synchronous test engine.
//!
//! A [`Test`] is a plain tree of leaf tests, labeled groups, fuzz tests and
//! `skip`/`only`/`todo` wrappers. Nothing in it is asynchronous: the
//! [`deferred`](crate::deferred) layer resolves every task first and hands a
//! finished `Test` to [`run`].
//!
//! # Example
//!
//! ```rust
//! use testkit_task::program::RunOptions;
//! use testkit_task::suite::{self, describe, equal, test};
//!
//! let tree = describe("arithmetic", vec![
//!     test("adds", || equal(4, 2 + 2)),
//!     test("multiplies", || equal(6, 2 * 3)),
//! ]);
//!
//! let summary = suite::run(tree, &RunOptions::new(1));
//! assert_eq!(summary.passed, 2);
//! ```

mod expectation;
mod report;
mod runner;

pub use expectation::{equal, err, is_true, not_equal, ok, Expectation, Failure};
pub use report::render;
pub use runner::{run, AutoFail, Outcome, Summary, TestReport};
pub use test::{concat, describe, fuzz, only, skip, test, todo, FuzzRng, Outline, Test};
