//! Deferred test nodes and the [`DeferredTest`] future.

use std::any::type_name;
use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::suite::Test;

/// A synchronous test, or a task result still waiting to become one.
///
/// `Pending` only exists between a task settling and its continuation
/// turning the value into a test. [`Node::resolve`] performs that step.
#[derive(Debug)]
pub enum Node<P = Stranded> {
    /// A task result not yet converted into a test.
    Pending(P),
    /// A finished synchronous test tree.
    Resolved(Test),
}

/// Marker for a pending payload that lost its continuation.
///
/// A [`DeferredTest`] built from a still-pending node carries one of these.
/// Reaching the run with it is a bug in suite construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stranded {
    payload: &'static str,
}

impl Stranded {
    /// Type name of the payload that was never converted.
    #[must_use]
    pub fn payload_type(&self) -> &'static str {
        self.payload
    }
}

impl<P> Node<P> {
    /// Returns true if this node holds a finished test.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Node::Resolved(_))
    }

    /// Converts a pending payload with `continuation`.
    ///
    /// A resolved node is returned as is and `continuation` is dropped unused.
    pub fn resolve<K>(self, continuation: K) -> DeferredTest
    where
        K: FnOnce(P) -> DeferredTest,
    {
        match self {
            Node::Pending(payload) => continuation(payload),
            Node::Resolved(test) => DeferredTest::resolved(test),
        }
    }

    /// Forgets a pending payload, keeping only its type name.
    #[must_use]
    pub fn strand(self) -> Node<Stranded> {
        match self {
            Node::Pending(_) => Node::Pending(Stranded {
                payload: type_name::<P>(),
            }),
            Node::Resolved(test) => Node::Resolved(test),
        }
    }
}

impl Node<Stranded> {
    /// Unwraps the synchronous test.
    ///
    /// A stranded placeholder becomes a test that always fails asking for a
    /// defect report. Debug builds panic instead.
    #[must_use]
    pub fn into_test(self) -> Test {
        match self {
            Node::Resolved(test) => test,
            Node::Pending(stranded) => {
                if cfg!(debug_assertions) {
                    panic!("unresolved {} reached the run", stranded.payload_type());
                }
                tracing::error!(
                    payload = stranded.payload_type(),
                    "unresolved placeholder reached the run"
                );
                Test::defect(&format!(
                    "An unresolved {} reached the run.",
                    stranded.payload_type()
                ))
            }
        }
    }
}

/// An asynchronous computation yielding a test [`Node`].
///
/// Nothing runs until the value is awaited (or handed to
/// [`program::run`](crate::program::run)). Awaiting yields the node;
/// [`DeferredTest::into_test`] yields the unwrapped synchronous test.
#[must_use = "deferred tests do nothing unless resolved"]
pub struct DeferredTest {
    future: LocalBoxFuture<'static, Node>,
}

impl DeferredTest {
    /// Wraps a future producing a node.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Node> + 'static,
    {
        Self {
            future: future.boxed_local(),
        }
    }

    /// A deferred test that resolves immediately to `test`.
    pub fn resolved(test: Test) -> Self {
        Self::new(future::ready(Node::Resolved(test)))
    }

    /// Lifts any node. A pending payload is stranded.
    pub fn from_node<P: 'static>(node: Node<P>) -> Self {
        Self::new(future::ready(node.strand()))
    }

    /// Resolves this deferred test and unwraps its synchronous test.
    pub async fn into_test(self) -> Test {
        self.future.await.into_test()
    }
}

impl IntoFuture for DeferredTest {
    type Output = Node;
    type IntoFuture = LocalBoxFuture<'static, Node>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl From<Test> for DeferredTest {
    fn from(test: Test) -> Self {
        Self::resolved(test)
    }
}

impl fmt::Debug for DeferredTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredTest").finish_non_exhaustive()
    }
}
