//! Running a synchronous test tree into a [`Summary`].

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use rand::SeedableRng;

use super::expectation::{Expectation, Failure};
use super::test::{FuzzRng, Kind, Test, Thunk};
use crate::program::RunOptions;

/// The outcome of one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The test ran and passed.
    Passed,
    /// The test ran and failed.
    Failed(Failure),
    /// The test was inside a `skip`.
    Skipped,
    /// The test is a `todo` placeholder.
    Todo,
}

/// Report for a single test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    /// Labels of the enclosing groups, outermost first.
    pub labels: Vec<String>,
    /// The test's own description.
    pub description: String,
    /// What happened.
    pub outcome: Outcome,
}

/// Why a run failed even though no test did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFail {
    /// `only` narrowed the run.
    OnlyUsed,
    /// `skip` left tests unrun.
    SkipUsed,
    /// `todo` placeholders remain.
    TodoPresent,
    /// Nothing ran at all.
    NoTests,
}

impl fmt::Display for AutoFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AutoFail::OnlyUsed => "Test.only was used",
            AutoFail::SkipUsed => "Test.skip was used",
            AutoFail::TodoPresent => "There are todo tests",
            AutoFail::NoTests => "No tests were run",
        })
    }
}

/// Totals and per-test reports of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Tests that passed.
    pub passed: usize,
    /// Tests that failed.
    pub failed: usize,
    /// Tests that were skipped.
    pub skipped: usize,
    /// Todo placeholders.
    pub todo: usize,
    /// Set when the run fails for structural reasons.
    pub auto_fail: Option<AutoFail>,
    /// Reports in declaration order.
    pub reports: Vec<TestReport>,
}

impl Summary {
    /// Returns true if every test passed and nothing forced a failure.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.auto_fail.is_none()
    }

    /// Process exit code for this run: `0` on success, `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_success())
    }

    /// Iterates over the failed reports.
    pub fn failures(&self) -> impl Iterator<Item = (&TestReport, &Failure)> {
        self.reports.iter().filter_map(|report| match &report.outcome {
            Outcome::Failed(failure) => Some((report, failure)),
            _ => None,
        })
    }
}

/// Runs every test in `test`, depth-first in declaration order.
///
/// # Example
///
/// ```rust
/// use testkit_task::program::RunOptions;
/// use testkit_task::suite::{self, equal};
///
/// let summary = suite::run(
///     suite::test("two", || equal(2, 1 + 1)),
///     &RunOptions::new(7),
/// );
/// assert_eq!(summary.passed, 1);
/// assert_eq!(summary.exit_code(), 0);
/// ```
pub fn run(test: Test, options: &RunOptions) -> Summary {
    let focused = contains_only(&test);
    let mut walker = Walker {
        options,
        focused,
        labels: Vec::new(),
        reports: Vec::new(),
        saw_skip: false,
    };
    walker.visit(test, Mode::Run);

    let mut summary = Summary {
        passed: 0,
        failed: 0,
        skipped: 0,
        todo: 0,
        auto_fail: None,
        reports: walker.reports,
    };
    for report in &summary.reports {
        match report.outcome {
            Outcome::Passed => summary.passed += 1,
            Outcome::Failed(_) => summary.failed += 1,
            Outcome::Skipped => summary.skipped += 1,
            Outcome::Todo => summary.todo += 1,
        }
    }

    summary.auto_fail = if summary.passed + summary.failed == 0 && summary.todo == 0 {
        Some(AutoFail::NoTests)
    } else if focused {
        Some(AutoFail::OnlyUsed)
    } else if walker.saw_skip {
        Some(AutoFail::SkipUsed)
    } else if summary.todo > 0 {
        Some(AutoFail::TodoPresent)
    } else {
        None
    };
    summary
}

fn contains_only(test: &Test) -> bool {
    match &test.kind {
        Kind::Only(_) => true,
        Kind::Labeled { tests, .. } | Kind::Batch(tests) => tests.iter().any(contains_only),
        // Skip wins over any `only` beneath it.
        Kind::Skip(_) | Kind::Leaf { .. } | Kind::Fuzz { .. } | Kind::Todo(_) => false,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Run,
    Focused,
    Skipped,
}

struct Walker<'a> {
    options: &'a RunOptions,
    focused: bool,
    labels: Vec<String>,
    reports: Vec<TestReport>,
    saw_skip: bool,
}

impl Walker<'_> {
    fn visit(&mut self, test: Test, mode: Mode) {
        match test.kind {
            Kind::Leaf { description, run } => {
                if let Some(outcome) = self.leaf_outcome(mode, || run_thunk(run)) {
                    self.report(description, outcome);
                }
            }
            Kind::Fuzz { description, check } => {
                let options = self.options;
                let outcome = self.leaf_outcome(mode, || run_fuzz(&*check, options));
                if let Some(outcome) = outcome {
                    self.report(description, outcome);
                }
            }
            Kind::Labeled { label, tests } => {
                self.labels.push(label);
                for test in tests {
                    self.visit(test, mode);
                }
                self.labels.pop();
            }
            Kind::Batch(tests) => {
                for test in tests {
                    self.visit(test, mode);
                }
            }
            Kind::Skip(inner) => {
                self.saw_skip = true;
                self.visit(*inner, Mode::Skipped);
            }
            Kind::Only(inner) => {
                let mode = match mode {
                    Mode::Skipped => Mode::Skipped,
                    Mode::Run | Mode::Focused => Mode::Focused,
                };
                self.visit(*inner, mode);
            }
            Kind::Todo(description) => {
                if mode != Mode::Run || !self.focused {
                    self.report(description, Outcome::Todo);
                }
            }
        }
    }

    /// Decides whether a leaf runs; `None` means it is filtered out by `only`.
    fn leaf_outcome(&self, mode: Mode, run: impl FnOnce() -> Expectation) -> Option<Outcome> {
        match mode {
            Mode::Skipped => Some(Outcome::Skipped),
            Mode::Run if self.focused => None,
            Mode::Run | Mode::Focused => Some(match run() {
                Expectation::Pass => Outcome::Passed,
                Expectation::Fail(failure) => Outcome::Failed(failure),
            }),
        }
    }

    fn report(&mut self, description: String, outcome: Outcome) {
        self.reports.push(TestReport {
            labels: self.labels.clone(),
            description,
            outcome,
        });
    }
}

fn run_thunk(run: Thunk) -> Expectation {
    panic::catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| panicked(&*payload))
}

fn run_fuzz(check: &dyn Fn(&mut FuzzRng) -> Expectation, options: &RunOptions) -> Expectation {
    let mut rng = FuzzRng::seed_from_u64(options.seed);
    for _ in 0..options.runs {
        let expectation = panic::catch_unwind(AssertUnwindSafe(|| check(&mut rng)))
            .unwrap_or_else(|payload| panicked(&*payload));
        if !expectation.is_pass() {
            return expectation;
        }
    }
    Expectation::Pass
}

fn panicked(payload: &(dyn Any + Send)) -> Expectation {
    let message = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    Expectation::fail(format!("Test panicked: {message}"))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use rand::Rng;

    use super::*;
    use crate::suite::{concat, describe, equal, fuzz, is_true, only, skip, test, todo};

    fn options() -> RunOptions {
        RunOptions::new(42).with_runs(25)
    }

    #[test]
    fn test_counts_and_label_paths() {
        let tree = describe(
            "outer",
            vec![
                test("ok", || equal(1, 1)),
                describe("inner", vec![test("bad", || equal(1, 2))]),
            ],
        );

        let summary = run(tree, &options());

        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), 1);
        let (report, _) = summary.failures().next().unwrap();
        assert_eq!(report.labels, vec!["outer".to_string(), "inner".to_string()]);
        assert_eq!(report.description, "bad");
    }

    #[test]
    fn test_panicking_body_fails() {
        let summary = run(
            test("panics", || -> Expectation { panic!("kaboom") }),
            &options(),
        );

        let (_, failure) = summary.failures().next().unwrap();
        assert_eq!(failure.message, "Test panicked: kaboom");
    }

    #[test]
    fn test_empty_run_auto_fails() {
        let summary = run(concat(Vec::new()), &options());
        assert_eq!(summary.auto_fail, Some(AutoFail::NoTests));
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_only_filters_and_auto_fails() {
        let tree = concat(vec![
            test("ignored", || Expectation::fail("should not run")),
            only(test("focused", Expectation::pass)),
        ]);

        let summary = run(tree, &options());

        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.auto_fail, Some(AutoFail::OnlyUsed));
    }

    #[test]
    fn test_skip_does_not_run_bodies() {
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let tree = concat(vec![
            test("runs", Expectation::pass),
            skip(test("skipped", move || {
                flag.set(true);
                Expectation::pass()
            })),
        ]);

        let summary = run(tree, &options());

        assert!(!ran.get());
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.auto_fail, Some(AutoFail::SkipUsed));
    }

    #[test]
    fn test_only_inside_skip_does_not_focus_the_run() {
        let tree = concat(vec![
            test("a", Expectation::pass),
            skip(only(test("b", Expectation::pass))),
        ]);

        let summary = run(tree, &options());

        assert_eq!(summary.passed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.reports[0].description, "a");
        assert_eq!(summary.auto_fail, Some(AutoFail::SkipUsed));
    }

    #[test]
    fn test_defect_leaf_fails_the_run() {
        let summary = run(Test::defect("An unresolved u8 reached the run."), &options());

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), 1);
        let (report, failure) = summary.failures().next().unwrap();
        assert_eq!(report.description, "testkit-task defect");
        assert!(failure.message.contains("please file a defect report"));
        assert!(failure.message.ends_with("An unresolved u8 reached the run."));
    }

    #[test]
    fn test_todo_auto_fails() {
        let summary = run(
            concat(vec![test("done", Expectation::pass), todo("later")]),
            &options(),
        );
        assert_eq!(summary.todo, 1);
        assert_eq!(summary.auto_fail, Some(AutoFail::TodoPresent));
    }

    #[test]
    fn test_fuzz_runs_configured_times() {
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        let tree = fuzz(
            "counts",
            |rng| rng.gen_range(0..10u8),
            move |n| {
                seen.set(seen.get() + 1);
                is_true(n < 10, "out of range")
            },
        );

        let summary = run(tree, &options());

        assert_eq!(summary.passed, 1);
        assert_eq!(count.get(), 25);
    }

    #[test]
    fn test_fuzz_reports_failing_input() {
        let tree = fuzz("never", |rng| rng.gen_range(0..10u8), |_| Expectation::fail("no"));

        let summary = run(tree, &options());

        let (_, failure) = summary.failures().next().unwrap();
        assert!(failure.given.is_some());
    }

    #[test]
    fn test_fuzz_is_reproducible_for_a_seed() {
        let draw = || {
            let tree = fuzz("first", |rng| rng.gen::<u64>(), |_| Expectation::fail("x"));
            run(tree, &options())
                .failures()
                .next()
                .and_then(|(_, failure)| failure.given.clone())
        };
        assert_eq!(draw(), draw());
    }
}
