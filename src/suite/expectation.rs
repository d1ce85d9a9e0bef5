//! Expectations: the outcome of a single test body.

use std::fmt::{self, Debug};

/// Why a test failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Rendered fuzz input that produced the failure, if any.
    pub given: Option<String>,
    /// Human-readable failure message.
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.given {
            Some(given) => write!(f, "Given {given}\n\n{}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The result of running one test body.
///
/// # Example
///
/// ```rust
/// use testkit_task::suite::{equal, Expectation};
///
/// assert!(equal(4, 2 + 2).is_pass());
/// assert!(!Expectation::fail("nope").is_pass());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Expectation {
    /// The test passed.
    Pass,
    /// The test failed.
    Fail(Failure),
}

impl Expectation {
    /// An expectation that always passes.
    pub fn pass() -> Self {
        Self::Pass
    }

    /// An expectation that always fails with `message`.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(Failure {
            given: None,
            message: message.into(),
        })
    }

    /// Returns true if this expectation passed.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns the failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Pass => None,
            Self::Fail(failure) => Some(failure),
        }
    }

    /// Replaces the failure message, leaving a pass untouched.
    pub fn on_fail(self, message: impl Into<String>) -> Self {
        match self {
            Self::Pass => Self::Pass,
            Self::Fail(failure) => Self::Fail(Failure {
                given: failure.given,
                message: message.into(),
            }),
        }
    }

    /// Passes when every expectation passes, otherwise yields the first failure.
    pub fn all(expectations: impl IntoIterator<Item = Expectation>) -> Self {
        expectations
            .into_iter()
            .find(|expectation| !expectation.is_pass())
            .unwrap_or(Self::Pass)
    }

    pub(crate) fn with_given(self, given: String) -> Self {
        match self {
            Self::Pass => Self::Pass,
            Self::Fail(failure) => Self::Fail(Failure {
                given: Some(given),
                message: failure.message,
            }),
        }
    }
}

/// Passes if `actual` equals `expected`.
pub fn equal<T: PartialEq + Debug>(expected: T, actual: T) -> Expectation {
    if expected == actual {
        Expectation::Pass
    } else {
        Expectation::fail(format!(
            "Expected values to be equal\n\n    expected: {expected:?}\n      actual: {actual:?}"
        ))
    }
}

/// Passes if `actual` differs from `unexpected`.
pub fn not_equal<T: PartialEq + Debug>(unexpected: T, actual: T) -> Expectation {
    if unexpected == actual {
        Expectation::fail(format!("Expected a value other than {actual:?}"))
    } else {
        Expectation::Pass
    }
}

/// Passes if `result` is `Ok`.
pub fn ok<T, E: Debug>(result: &Result<T, E>) -> Expectation {
    match result {
        Ok(_) => Expectation::Pass,
        Err(error) => Expectation::fail(format!("Expected Ok, got Err({error:?})")),
    }
}

/// Passes if `result` is `Err`.
pub fn err<T: Debug, E>(result: &Result<T, E>) -> Expectation {
    match result {
        Ok(value) => Expectation::fail(format!("Expected Err, got Ok({value:?})")),
        Err(_) => Expectation::Pass,
    }
}

/// Passes if `condition` holds, otherwise fails with `message`.
pub fn is_true(condition: bool, message: impl Into<String>) -> Expectation {
    if condition {
        Expectation::Pass
    } else {
        Expectation::fail(message)
    }
}
