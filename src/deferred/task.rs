//! Resolving tests that depend on async tasks.

use std::fmt::Debug;
use std::future::Future;

use tracing::debug;

use super::node::{DeferredTest, Node};
use crate::suite::{self, Expectation};

/// Runs `task`, then builds the tests in `continuation` from its value.
///
/// The resulting tests are grouped under `description`. If the task fails
/// the continuation never runs; instead a single failing test named
/// `description` reports `Task failed with: <error>`.
///
/// The task runs exactly once, when the returned deferred test is resolved.
///
/// # Example
///
/// ```rust
/// use testkit_task::deferred::{await_task, test};
/// use testkit_task::suite::equal;
///
/// let suite = await_task(
///     async { Ok::<_, String>(5) },
///     "five",
///     |v| test("is five", move || equal(5, v)),
/// );
/// ```
pub fn await_task<T, A, E, K>(
    task: T,
    description: impl Into<String>,
    continuation: K,
) -> DeferredTest
where
    T: Future<Output = Result<A, E>> + 'static,
    A: 'static,
    E: Debug + 'static,
    K: FnOnce(A) -> DeferredTest + 'static,
{
    let description = description.into();
    DeferredTest::new(async move {
        debug!(task = %description, "awaiting task");
        let node = match task.await {
            Ok(value) => Node::Pending(value),
            Err(error) => {
                debug!(task = %description, ?error, "task failed");
                Node::Resolved(unexpected(
                    &description,
                    format!("Task failed with: {error:?}"),
                ))
            }
        };
        settle(description, node, continuation).await
    })
}

/// Runs `task`, expecting it to fail, then builds tests from its error.
///
/// The mirror of [`await_task`]: `continuation` receives the error, and a
/// task that succeeds produces a failing test named `description`.
///
/// # Example
///
/// ```rust
/// use testkit_task::deferred::{await_error, test};
/// use testkit_task::suite::equal;
///
/// let suite = await_error(
///     async { Err::<(), _>("x") },
///     "expect-x",
///     |e| test("matches", move || equal("x", e)),
/// );
/// ```
pub fn await_error<T, A, E, K>(
    task: T,
    description: impl Into<String>,
    continuation: K,
) -> DeferredTest
where
    T: Future<Output = Result<A, E>> + 'static,
    A: Debug + 'static,
    E: 'static,
    K: FnOnce(E) -> DeferredTest + 'static,
{
    let description = description.into();
    DeferredTest::new(async move {
        debug!(task = %description, "awaiting task, expecting an error");
        let node = match task.await {
            Err(error) => Node::Pending(error),
            Ok(value) => {
                debug!(task = %description, ?value, "task succeeded unexpectedly");
                Node::Resolved(unexpected(
                    &description,
                    format!("Expected error, but got non-error value: {value:?}"),
                ))
            }
        };
        settle(description, node, continuation).await
    })
}

/// Converts `node` through `continuation` and labels the result.
async fn settle<P, K>(description: String, node: Node<P>, continuation: K) -> Node
where
    K: FnOnce(P) -> DeferredTest,
{
    let inner = node.resolve(continuation).into_test().await;
    debug!(task = %description, "task settled");
    Node::Resolved(suite::describe(description, vec![inner]))
}

fn unexpected(description: &str, message: String) -> suite::Test {
    suite::test(description, move || Expectation::fail(message))
}
