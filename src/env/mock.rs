//! `MockEnvironment` implementation for testing runs in-process.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::{ColorDepth, Environment};

/// An in-memory [`Environment`] for tests.
///
/// Output written to stdout and stderr is captured, the clock is fixed, and
/// `exit` records its code instead of terminating. Clones share state.
///
/// # Example
///
/// ```rust
/// use std::io::Write;
/// use std::time::Duration;
/// use testkit_task::env::{Environment, MockEnvironment};
///
/// let env = MockEnvironment::with_time(Duration::from_millis(1500));
/// writeln!(env.stdout(), "hello").unwrap();
/// env.exit(0);
///
/// assert_eq!(env.stdout_text(), "hello\n");
/// assert_eq!(env.exit_code(), Some(0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockEnvironment {
    inner: Arc<EnvInner>,
}

#[derive(Debug, Default)]
struct EnvInner {
    state: Mutex<EnvState>,
    stdout: Arc<Mutex<Vec<u8>>>,
    stderr: Arc<Mutex<Vec<u8>>>,
}

#[derive(Debug, Default)]
struct EnvState {
    now: Duration,
    color: Option<ColorDepth>,
    vars: HashMap<String, String>,
    broken_stdout: bool,
    exit_code: Option<i32>,
}

impl MockEnvironment {
    /// Creates an environment at the UNIX epoch with undetectable colors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment whose clock reads `now`.
    #[must_use]
    pub fn with_time(now: Duration) -> Self {
        let env = Self::new();
        env.inner.state.lock().now = now;
        env
    }

    /// Sets the reported color depth. `None` simulates a failed query.
    pub fn set_color_depth(&self, color: Option<ColorDepth>) {
        self.inner.state.lock().color = color;
    }

    /// Sets a configuration variable.
    pub fn set_var(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.state.lock().vars.insert(key.into(), value.into());
    }

    /// Makes every write to stdout fail.
    pub fn break_stdout(&self) {
        self.inner.state.lock().broken_stdout = true;
    }

    /// Everything written to stdout so far.
    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.inner.stdout.lock()).into_owned()
    }

    /// Everything written to stderr so far.
    #[must_use]
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.inner.stderr.lock()).into_owned()
    }

    /// The code passed to `exit`, if it was called.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.inner.state.lock().exit_code
    }
}

impl Environment for MockEnvironment {
    fn now(&self) -> Duration {
        self.inner.state.lock().now
    }

    fn color_depth(&self) -> Option<ColorDepth> {
        self.inner.state.lock().color
    }

    fn var(&self, key: &str) -> Option<String> {
        self.inner.state.lock().vars.get(key).cloned()
    }

    fn stdout(&self) -> Box<dyn Write + '_> {
        if self.inner.state.lock().broken_stdout {
            Box::new(BrokenSink)
        } else {
            Box::new(SharedSink(Arc::clone(&self.inner.stdout)))
        }
    }

    fn stderr(&self) -> Box<dyn Write + '_> {
        Box::new(SharedSink(Arc::clone(&self.inner.stderr)))
    }

    fn exit(&self, code: i32) {
        self.inner.state.lock().exit_code = Some(code);
    }
}

struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout is closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout is closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_output() {
        let env = MockEnvironment::new();
        let other = env.clone();

        write!(other.stdout(), "shared").unwrap();
        write!(env.stderr(), "oops").unwrap();

        assert_eq!(env.stdout_text(), "shared");
        assert_eq!(other.stderr_text(), "oops");
    }

    #[test]
    fn test_broken_stdout_fails_writes() {
        let env = MockEnvironment::new();
        env.break_stdout();
        assert!(write!(env.stdout(), "x").is_err());
    }

    #[test]
    fn test_vars_and_color() {
        let env = MockEnvironment::new();
        assert_eq!(env.color_depth(), None);
        env.set_color_depth(Some(ColorDepth::Ansi256));
        env.set_var("KEY", "value");
        assert_eq!(env.color_depth(), Some(ColorDepth::Ansi256));
        assert_eq!(env.var("KEY").as_deref(), Some("value"));
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn test_exit_is_recorded() {
        let env = MockEnvironment::new();
        assert_eq!(env.exit_code(), None);
        env.exit(1);
        assert_eq!(env.exit_code(), Some(1));
    }
}
