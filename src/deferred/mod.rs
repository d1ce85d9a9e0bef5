//! Tests that wait on async tasks.
//!
//! A [`DeferredTest`] is a future that yields a test [`Node`]. Build suites
//! from [`await_task`], [`await_error`] and the composers ([`concat`],
//! [`describe`], [`wrap`], [`test`]); then hand the result to
//! [`program::run`](crate::program::run), which resolves it into one
//! synchronous [`Test`](crate::suite::Test) and runs it.
//!
//! Resolution is strictly sequential, depth-first, in declaration order: no
//! two tasks are ever in flight together. There is no timeout, so a task that
//! never completes hangs the suite.
//!
//! # Example
//!
//! ```rust
//! use testkit_task::deferred::{await_error, await_task, concat, test};
//! use testkit_task::suite::equal;
//!
//! let suite = concat(vec![
//!     await_task(async { Ok::<_, String>(5) }, "five", |v| {
//!         test("is five", move || equal(5, v))
//!     }),
//!     await_error(async { Err::<(), _>("x") }, "expect-x", |e| {
//!         test("matches", move || equal("x", e))
//!     }),
//! ]);
//! ```

mod compose;
mod node;
mod task;

pub use compose::{concat, describe, fuzz, only, skip, test, todo, wrap};
pub use node::{DeferredTest, Node, Stranded};
pub use task::{await_error, await_task};
