//! Running a suite as a program.
//!
//! [`run`] is the usual entry point: it picks a seed, resolves every task in
//! the suite, runs the resulting synchronous tests, prints the report and
//! exits with `0` if everything passed or `1` otherwise.
//!
//! # Example
//!
//! ```rust,no_run
//! use testkit_task::deferred::{await_task, test};
//! use testkit_task::env::ProcessEnvironment;
//! use testkit_task::program;
//! use testkit_task::suite::equal;
//!
//! fn main() {
//!     let suite = await_task(async { Ok::<_, String>(5) }, "five", |v| {
//!         test("is five", move || equal(5, v))
//!     });
//!     program::run(&ProcessEnvironment::new(), suite);
//! }
//! ```

use std::io::Write;

use tracing::{error, info};

use crate::deferred::DeferredTest;
use crate::env::{ColorDepth, Environment};
use crate::error::{Error, Result};
use crate::suite;

mod options;

pub use options::{RunOptions, DEFAULT_FUZZ_RUNS, FUZZ_RUNS_VAR, SEED_VAR};

/// Runs `tests` with options taken from the environment, then exits.
///
/// The seed comes from [`SEED_VAR`] when set, else from the current time.
///
/// This drives its own runtime and must not be called from async code; a
/// call from inside a Tokio runtime reports an error and exits with `1`.
/// Async callers use [`execute`].
pub fn run<E: Environment + ?Sized>(env: &E, tests: DeferredTest) {
    let options = RunOptions::from_environment(env);
    run_with_options(env, options, tests);
}

/// Runs `tests` with explicit `options`, then exits.
///
/// Resolution happens on a single-threaded Tokio runtime, so tasks may use
/// Tokio timers and I/O. As with [`run`], calling this from inside a Tokio
/// runtime fails the run instead of nesting runtimes.
pub fn run_with_options<E: Environment + ?Sized>(
    env: &E,
    options: RunOptions,
    tests: DeferredTest,
) {
    let code = match block_on(execute(env, options, tests)).and_then(|code| code) {
        Ok(code) => code,
        Err(err) => {
            error!(%err, "run aborted");
            // Best effort: there is nowhere left to report a failing stderr.
            let _ = writeln!(env.stderr(), "{err}");
            1
        }
    };
    env.exit(code);
}

/// Resolves `tests`, runs it and writes the report to stdout.
///
/// Returns the exit code for the run: `0` if every test passed and nothing
/// forced a failure, `1` otherwise, including when the report cannot be
/// written.
pub async fn execute<E: Environment + ?Sized>(
    env: &E,
    options: RunOptions,
    tests: DeferredTest,
) -> Result<i32> {
    info!(seed = options.seed, runs = options.runs, "resolving suite");
    let test = tests.into_test().await;
    let color = env.color_depth().unwrap_or(ColorDepth::None);

    let summary = suite::run(test, &options);
    info!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        todo = summary.todo,
        "suite finished"
    );

    let report = suite::render(&summary, &options, color);
    let mut stdout = env.stdout();
    stdout
        .write_all(report.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(Error::Output)?;
    Ok(summary.exit_code())
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(Error::NestedRuntime);
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    Ok(runtime.block_on(future))
}
