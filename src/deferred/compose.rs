//! Combining deferred tests.

use std::fmt::Debug;

use super::node::{DeferredTest, Node};
use crate::suite::{self, Expectation, FuzzRng, Test};

/// Resolves each test in order and groups them without a label.
///
/// A test's tasks do not start until every task of the tests before it has
/// settled, nested ones included.
pub fn concat(tests: impl IntoIterator<Item = DeferredTest>) -> DeferredTest {
    let tests: Vec<_> = tests.into_iter().collect();
    DeferredTest::new(async move { Node::Resolved(suite::concat(resolve_all(tests).await)) })
}

/// Like [`concat`], grouped under `label`.
///
/// # Example
///
/// ```rust
/// use testkit_task::deferred::{await_task, describe, test};
/// use testkit_task::suite::equal;
///
/// let suite = describe("users", vec![
///     await_task(async { Ok::<_, String>(3) }, "count", |n| {
///         test("three users", move || equal(3, n))
///     }),
///     test("plain", || equal(1, 1)),
/// ]);
/// ```
pub fn describe(
    label: impl Into<String>,
    tests: impl IntoIterator<Item = DeferredTest>,
) -> DeferredTest {
    let label = label.into();
    let tests: Vec<_> = tests.into_iter().collect();
    DeferredTest::new(async move {
        Node::Resolved(suite::describe(label, resolve_all(tests).await))
    })
}

/// Lifts a synchronous test built with [`suite`](crate::suite).
pub fn wrap(test: Test) -> DeferredTest {
    DeferredTest::resolved(test)
}

/// A leaf test, resolved immediately.
pub fn test<F>(description: impl Into<String>, body: F) -> DeferredTest
where
    F: FnOnce() -> Expectation + 'static,
{
    wrap(suite::test(description, body))
}

/// A fuzz test, resolved immediately. See [`suite::fuzz`].
pub fn fuzz<T, G, C>(description: impl Into<String>, generate: G, check: C) -> DeferredTest
where
    T: Debug,
    G: Fn(&mut FuzzRng) -> T + 'static,
    C: Fn(T) -> Expectation + 'static,
{
    wrap(suite::fuzz(description, generate, check))
}

/// Skips every test in `test`. Its tasks still run.
pub fn skip(test: DeferredTest) -> DeferredTest {
    DeferredTest::new(async move { Node::Resolved(suite::skip(test.into_test().await)) })
}

/// Runs only `test` (and other `only` tests).
pub fn only(test: DeferredTest) -> DeferredTest {
    DeferredTest::new(async move { Node::Resolved(suite::only(test.into_test().await)) })
}

/// A placeholder for a test not yet written.
pub fn todo(description: impl Into<String>) -> DeferredTest {
    wrap(suite::todo(description))
}

/// Resolves `tests` one after another.
async fn resolve_all(tests: Vec<DeferredTest>) -> Vec<Test> {
    let mut resolved = Vec::with_capacity(tests.len());
    for test in tests {
        resolved.push(test.into_test().await);
    }
    resolved
}
