//! Run configuration.

use std::time::Duration;

use tracing::{info, warn};

use crate::env::Environment;
use crate::error::{Error, Result};

/// Default number of runs per fuzz test.
pub const DEFAULT_FUZZ_RUNS: u32 = 100;

/// Environment variable that fixes the seed.
pub const SEED_VAR: &str = "TESTKIT_TASK_SEED";

/// Environment variable that sets the number of fuzz runs.
pub const FUZZ_RUNS_VAR: &str = "TESTKIT_TASK_FUZZ";

/// Configuration for one run of a suite.
///
/// # Example
///
/// ```rust
/// use testkit_task::program::RunOptions;
///
/// let options = RunOptions::new(42).with_runs(500);
/// assert_eq!(options.seed, 42);
/// assert_eq!(options.runs, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// How many times each fuzz test runs.
    pub runs: u32,
    /// Seed for fuzz input generation.
    pub seed: u64,
}

impl RunOptions {
    /// Options with `seed` and the default number of fuzz runs.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            runs: DEFAULT_FUZZ_RUNS,
            seed,
        }
    }

    /// Set the number of fuzz runs.
    #[must_use]
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Options seeded from wall-clock milliseconds.
    ///
    /// Two runs seeded this way will usually see different fuzz inputs.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_clock(now: Duration) -> Self {
        Self::new(now.as_millis() as u64)
    }

    /// Options for an unconfigured run.
    ///
    /// [`SEED_VAR`] and [`FUZZ_RUNS_VAR`] are honoured; otherwise the seed
    /// comes from the environment's clock. Invalid values are logged and
    /// ignored.
    pub fn from_environment<E: Environment + ?Sized>(env: &E) -> Self {
        let options = match parse_var::<u64, E>(env, SEED_VAR) {
            Ok(Some(seed)) => {
                info!(seed, "using seed from {SEED_VAR}");
                Self::new(seed)
            }
            Ok(None) | Err(_) => {
                let options = Self::from_clock(env.now());
                info!(
                    seed = options.seed,
                    "no seed given, derived one from the clock; set {SEED_VAR} to reproduce"
                );
                options
            }
        };
        options.with_env_runs(env)
    }

    /// Applies [`FUZZ_RUNS_VAR`] when it is set, leaving the seed alone.
    ///
    /// An invalid value is logged and ignored.
    #[must_use]
    pub fn with_env_runs<E: Environment + ?Sized>(mut self, env: &E) -> Self {
        if let Ok(Some(runs)) = parse_var::<u32, E>(env, FUZZ_RUNS_VAR) {
            self.runs = runs;
        }
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

fn parse_var<T, E>(env: &E, name: &'static str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    E: Environment + ?Sized,
{
    let Some(value) = env.var(name) else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => {
            let error = Error::invalid_option(name, value);
            warn!(%error, "ignoring run option");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnvironment;

    #[test]
    fn test_defaults() {
        let options = RunOptions::new(7);
        assert_eq!(options.runs, 100);
        assert_eq!(options.seed, 7);
        assert_eq!(RunOptions::default().with_seed(3).seed, 3);
    }

    #[test]
    fn test_seed_from_clock_millis() {
        let options = RunOptions::from_clock(Duration::from_millis(1_234_567));
        assert_eq!(options.seed, 1_234_567);
        assert_eq!(options.runs, DEFAULT_FUZZ_RUNS);
    }

    #[test]
    fn test_from_environment_uses_clock() {
        let env = MockEnvironment::with_time(Duration::from_millis(42));
        assert_eq!(RunOptions::from_environment(&env), RunOptions::new(42));
    }

    #[test]
    fn test_from_environment_honours_vars() {
        let env = MockEnvironment::with_time(Duration::from_millis(42));
        env.set_var(SEED_VAR, "9001");
        env.set_var(FUZZ_RUNS_VAR, " 5 ");
        assert_eq!(
            RunOptions::from_environment(&env),
            RunOptions::new(9001).with_runs(5)
        );
    }

    #[test]
    fn test_invalid_vars_are_ignored() {
        let env = MockEnvironment::with_time(Duration::from_millis(42));
        env.set_var(SEED_VAR, "not-a-number");
        env.set_var(FUZZ_RUNS_VAR, "-1");
        assert_eq!(RunOptions::from_environment(&env), RunOptions::new(42));
    }

    #[test]
    fn test_env_runs_keep_explicit_seed() {
        let env = MockEnvironment::with_time(Duration::from_millis(42));
        env.set_var(SEED_VAR, "9001");
        assert_eq!(RunOptions::new(3).with_env_runs(&env), RunOptions::new(3));

        env.set_var(FUZZ_RUNS_VAR, "8");
        assert_eq!(
            RunOptions::new(3).with_env_runs(&env),
            RunOptions::new(3).with_runs(8)
        );
    }

    #[test]
    fn test_parse_var_reports_invalid_value() {
        let env = MockEnvironment::new();
        env.set_var(SEED_VAR, "abc");
        let err = parse_var::<u64, _>(&env, SEED_VAR).unwrap_err();
        assert!(matches!(err, Error::InvalidOption { name: SEED_VAR, .. }));
    }
}
