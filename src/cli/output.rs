//! Handles all user-facing output for the CLI.
//!
//! The harness report format is fixed: one `<name> OK` or
//! `<name> FAILED: <reason>` line per test (followed by compiler diagnostics
//! when relevant) and a separator, then one `Test failed: <name>` line per
//! failure. Colour is applied only to the verdict word.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::test::runner::TestOutcome;
use crate::test::{Expectation, Test, TestResult, TestSummary};

pub const SEPARATOR: &str = "---------";

/// Stdout stream honouring the caller's colour decision.
pub fn stdout(use_colors: bool) -> StandardStream {
    let choice = if use_colors {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Prints the harness report and returns the summary it describes.
pub fn print_report<W: WriteColor>(out: &mut W, outcomes: &[TestOutcome]) -> io::Result<TestSummary> {
    let mut summary = TestSummary::default();
    writeln!(out, "Running compiler tests")?;

    for outcome in outcomes {
        print_verdict(out, &outcome.name, &outcome.result)?;
        writeln!(out, "{SEPARATOR}")?;
        summary.record(&outcome.name, &outcome.result);
    }

    for name in &summary.failed {
        writeln!(out, "Test failed: {name}")?;
    }
    out.flush()?;
    Ok(summary)
}

fn print_verdict<W: WriteColor>(out: &mut W, name: &str, result: &TestResult) -> io::Result<()> {
    write!(out, "{name} ")?;
    match result {
        TestResult::Passed => {
            colored(out, Color::Green, "OK")?;
            writeln!(out)
        }
        TestResult::Failed {
            reason,
            diagnostics,
        } => {
            colored(out, Color::Red, "FAILED")?;
            writeln!(out, ": {reason}")?;
            if let Some(text) = diagnostics {
                writeln!(out, "{}", text.trim_end())?;
            }
            Ok(())
        }
    }
}

/// One line per test: header line number, name and expectation.
pub fn print_test_list<W: WriteColor>(out: &mut W, file: &str, tests: &[Test]) -> io::Result<()> {
    for test in tests {
        write!(out, "{file}:{}: ", test.line)?;
        colored(out, Color::Cyan, &format!("{:?}", test.name))?;
        let color = match test.expectation {
            Expectation::MustCompile => Color::Green,
            Expectation::MustFail | Expectation::MustFailWith(_) => Color::Yellow,
        };
        write!(out, " ")?;
        colored(out, color, &test.expectation.to_string())?;
        writeln!(out)?;
    }
    Ok(())
}

fn colored<W: WriteColor>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{text}")?;
    out.reset()
}

#[cfg(test)]
mod tests {
    use termcolor::Buffer;

    use super::*;

    fn render(outcomes: &[TestOutcome]) -> (String, TestSummary) {
        let mut buffer = Buffer::no_color();
        let summary = print_report(&mut buffer, outcomes).unwrap();
        (String::from_utf8(buffer.into_inner()).unwrap(), summary)
    }

    #[test]
    fn passing_report() {
        let (text, summary) = render(&[TestOutcome {
            name: "basic".to_string(),
            result: TestResult::Passed,
        }]);
        assert_eq!(text, "Running compiler tests\nbasic OK\n---------\n");
        assert!(!summary.has_failures());
    }

    #[test]
    fn failing_report_lists_failures_at_the_end() {
        let (text, summary) = render(&[
            TestOutcome {
                name: "typo".to_string(),
                result: TestResult::failed(
                    "expected to fail with \"no member\", but stderr does not contain this:",
                    Some("error: expected ';'\n".to_string()),
                ),
            },
            TestOutcome {
                name: "basic".to_string(),
                result: TestResult::Passed,
            },
        ]);
        assert_eq!(
            text,
            "Running compiler tests\n\
             typo FAILED: expected to fail with \"no member\", but stderr does not contain this:\n\
             error: expected ';'\n\
             ---------\n\
             basic OK\n\
             ---------\n\
             Test failed: typo\n"
        );
        assert_eq!(summary.failed, ["typo"]);
    }

    #[test]
    fn test_list_shows_line_and_expectation() {
        let mut buffer = Buffer::no_color();
        let tests = [Test::new("x", Expectation::MustFailWith("no member".into()), 7)];
        print_test_list(&mut buffer, "a.cc", &tests).unwrap();
        assert_eq!(
            String::from_utf8(buffer.into_inner()).unwrap(),
            "a.cc:7: \"x\" must fail with \"no member\"\n"
        );
    }
}
