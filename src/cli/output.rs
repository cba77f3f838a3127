//! Handles all user-facing output for the CLI.
//!
//! Group verdicts are read only through the `ResultGroup` query methods, so
//! the text and JSON reports agree with what the engine decided.

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::test::{CaseReport, Location, RunReport, RunSummary};

/// Writes one line per case, indented failure messages, and a summary.
pub fn write_report(out: &mut dyn WriteColor, report: &RunReport) -> io::Result<()> {
    for case in report.cases() {
        match case {
            CaseReport::Finished(group) if group.is_skipped() => {
                tag(out, "SKIP", Color::Yellow)?;
                writeln!(
                    out,
                    " {} ({})",
                    group.name(),
                    group.skip_reason().unwrap_or_default()
                )?;
            }
            CaseReport::Finished(group) if group.is_failed() => {
                tag(out, "FAIL", Color::Red)?;
                writeln!(out, " {}", group.name())?;
                for message in group.iter_failure_messages() {
                    write_indented(out, &message)?;
                }
            }
            CaseReport::Finished(group) => {
                tag(out, "PASS", Color::Green)?;
                writeln!(out, " {}", group.name())?;
            }
            CaseReport::Errored { name, error, .. } => {
                tag(out, "ERROR", Color::Magenta)?;
                writeln!(out, " {name}")?;
                write_indented(out, &error.to_string())?;
            }
        }
    }

    let summary = report.summary();
    writeln!(out)?;
    write_summary(out, summary)?;

    let failed: Vec<&CaseReport> = report
        .cases()
        .iter()
        .filter(|case| case.group().map_or(true, |g| g.is_failed()))
        .collect();
    if !failed.is_empty() {
        writeln!(out, "\nFailed tests:")?;
        for case in failed {
            writeln!(out, "  - {} ({})", case.name(), case.location())?;
        }
    }
    Ok(())
}

fn tag(out: &mut dyn WriteColor, label: &str, color: Color) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{label}")?;
    out.reset()
}

fn write_indented(out: &mut dyn WriteColor, message: &str) -> io::Result<()> {
    for line in message.lines() {
        writeln!(out, "    {line}")?;
    }
    Ok(())
}

fn write_summary(out: &mut dyn WriteColor, summary: &RunSummary) -> io::Result<()> {
    let color = if summary.has_failures() {
        Color::Red
    } else {
        Color::Green
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(
        out,
        "{} passed, {} failed, {} skipped, {} errored",
        summary.passed, summary.failed, summary.skipped, summary.errored
    )?;
    out.reset()?;
    writeln!(out, " ({:.1}% of executed cases passed)", summary.success_rate())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    cases: Vec<JsonCase<'a>>,
}

#[derive(Serialize)]
struct JsonCase<'a> {
    name: &'a str,
    location: &'a Location,
    verdict: &'static str,
    invocations: usize,
    messages: Vec<String>,
}

pub fn render_json(report: &RunReport) -> serde_json::Result<String> {
    let cases = report
        .cases()
        .iter()
        .map(|case| match case {
            CaseReport::Finished(group) => JsonCase {
                name: group.name(),
                location: group.location(),
                verdict: if group.is_skipped() {
                    "skipped"
                } else if group.is_failed() {
                    "failed"
                } else {
                    "passed"
                },
                invocations: group.results().len(),
                messages: group.iter_failure_messages().collect(),
            },
            CaseReport::Errored {
                name,
                location,
                error,
            } => JsonCase {
                name,
                location,
                verdict: "errored",
                invocations: 0,
                messages: vec![error.to_string()],
            },
        })
        .collect();
    serde_json::to_string_pretty(&JsonReport {
        summary: report.summary(),
        cases,
    })
}
