//! The real process environment.

use std::io::{self, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{ColorDepth, Environment};

/// [`Environment`] backed by the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Create a new process environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for ProcessEnvironment {
    fn now(&self) -> Duration {
        // A clock set before 1970 yields zero rather than an error.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }

    fn color_depth(&self) -> Option<ColorDepth> {
        if std::env::var_os("NO_COLOR").is_some() || !atty::is(atty::Stream::Stdout) {
            return Some(ColorDepth::None);
        }
        let colorterm = std::env::var("COLORTERM").unwrap_or_default();
        let term = std::env::var("TERM").ok();
        detect_depth(&colorterm, term.as_deref())
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn stdout(&self) -> Box<dyn Write + '_> {
        Box::new(io::stdout().lock())
    }

    fn stderr(&self) -> Box<dyn Write + '_> {
        Box::new(io::stderr().lock())
    }

    fn exit(&self, code: i32) {
        std::process::exit(code)
    }
}

/// Maps terminal variables to a color depth. `None` when `TERM` is unset.
fn detect_depth(colorterm: &str, term: Option<&str>) -> Option<ColorDepth> {
    if colorterm == "truecolor" || colorterm == "24bit" {
        return Some(ColorDepth::TrueColor);
    }
    let term = term?;
    Some(if term == "dumb" {
        ColorDepth::None
    } else if term.contains("256") {
        ColorDepth::Ansi256
    } else {
        ColorDepth::Basic
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_depth() {
        assert_eq!(detect_depth("truecolor", None), Some(ColorDepth::TrueColor));
        assert_eq!(
            detect_depth("", Some("xterm-256color")),
            Some(ColorDepth::Ansi256)
        );
        assert_eq!(detect_depth("", Some("xterm")), Some(ColorDepth::Basic));
        assert_eq!(detect_depth("", Some("dumb")), Some(ColorDepth::None));
        assert_eq!(detect_depth("", None), None);
    }

    #[test]
    fn test_process_clock_is_past_epoch() {
        let env = ProcessEnvironment::new();
        assert!(env.now() > Duration::from_secs(1_600_000_000));
    }
}
