//! The environment a suite runs in.
//!
//! This module provides the [`Environment`] trait, which abstracts over the
//! process: the wall clock, terminal color support, configuration variables,
//! the standard streams and process termination.
//!
//! # Implementations
//!
//! - [`ProcessEnvironment`] - the real process
//! - [`MockEnvironment`] - captured output and a fixed clock, for tests

use std::io::Write;
use std::time::Duration;

mod mock;
mod process;

pub use mock::MockEnvironment;
pub use process::ProcessEnvironment;

/// How many colors the output terminal supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorDepth {
    /// No color output.
    #[default]
    None,
    /// The basic 16 ANSI colors.
    Basic,
    /// 256 colors.
    Ansi256,
    /// 24-bit color.
    TrueColor,
}

impl ColorDepth {
    /// Returns true if any color output is supported.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self != ColorDepth::None
    }

    /// The numeric level of this depth, from `0` (none) to `3` (true color).
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            ColorDepth::None => 0,
            ColorDepth::Basic => 1,
            ColorDepth::Ansi256 => 2,
            ColorDepth::TrueColor => 3,
        }
    }
}

/// The process-level services a run needs.
pub trait Environment {
    /// Current wall-clock time as a duration since the UNIX epoch.
    fn now(&self) -> Duration;

    /// Color support of standard output, or `None` if it cannot be determined.
    fn color_depth(&self) -> Option<ColorDepth>;

    /// Looks up a configuration variable.
    fn var(&self, key: &str) -> Option<String>;

    /// A writer for standard output.
    fn stdout(&self) -> Box<dyn Write + '_>;

    /// A writer for standard error.
    fn stderr(&self) -> Box<dyn Write + '_>;

    /// Terminates the program with `code`.
    ///
    /// The process implementation never returns; test doubles record the code.
    fn exit(&self, code: i32);
}
