//! Rendering a [`Summary`] as console text.

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use super::runner::{Outcome, Summary};
use crate::env::ColorDepth;
use crate::program::RunOptions;

/// Renders `summary` as a console report.
///
/// The header names the seed and fuzz run count so the run can be repeated.
/// ANSI colors are used unless `color` is [`ColorDepth::None`].
#[must_use]
pub fn render(summary: &Summary, options: &RunOptions, color: ColorDepth) -> String {
    let mut out = if color.is_enabled() {
        Buffer::ansi()
    } else {
        Buffer::no_color()
    };
    // Writing into an in-memory buffer cannot fail.
    let _ = write_report(&mut out, summary, options);
    String::from_utf8_lossy(out.as_slice()).into_owned()
}

fn write_report(out: &mut Buffer, summary: &Summary, options: &RunOptions) -> io::Result<()> {
    writeln!(
        out,
        "Running {} tests. To reproduce these results, run with seed {} and {} fuzz runs.\n",
        summary.reports.len(),
        options.seed,
        options.runs
    )?;

    for (report, failure) in summary.failures() {
        for label in &report.labels {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            writeln!(out, "↓ {label}")?;
        }
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        writeln!(out, "✗ {}", report.description)?;
        out.reset()?;
        writeln!(out)?;
        for line in failure.to_string().lines() {
            writeln!(out, "    {line}")?;
        }
        writeln!(out)?;
    }

    for report in &summary.reports {
        let marker = match report.outcome {
            Outcome::Skipped => "skipped",
            Outcome::Todo => "todo",
            Outcome::Passed | Outcome::Failed(_) => continue,
        };
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, "◦ {marker}: ")?;
        out.reset()?;
        writeln!(out, "{}", breadcrumb(&report.labels, &report.description))?;
    }

    let (verdict, color) = if summary.is_success() {
        ("TEST RUN PASSED", Color::Green)
    } else {
        ("TEST RUN FAILED", Color::Red)
    };
    writeln!(out)?;
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(out, "{verdict}")?;
    out.reset()?;
    if let Some(reason) = summary.auto_fail {
        writeln!(out, "because {reason}")?;
    }
    writeln!(out)?;
    writeln!(out, "Passed:   {}", summary.passed)?;
    writeln!(out, "Failed:   {}", summary.failed)?;
    if summary.skipped > 0 {
        writeln!(out, "Skipped:  {}", summary.skipped)?;
    }
    if summary.todo > 0 {
        writeln!(out, "Todo:     {}", summary.todo)?;
    }
    Ok(())
}

fn breadcrumb(labels: &[String], description: &str) -> String {
    labels
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(description))
        .collect::<Vec<_>>()
        .join(" > ")
}
