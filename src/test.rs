use serde::{Deserialize, Serialize};

/// Declared outcome of compiling one assembled unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Compilation must succeed.
    MustCompile,
    /// Compilation must fail; any diagnostic is acceptable.
    MustFail,
    /// Compilation must fail and stderr must contain this text verbatim.
    MustFailWith(String),
}

impl Expectation {
    /// Compares an observed compilation against this expectation.
    ///
    /// `MustFailWith` is a plain substring containment check on stderr.
    pub fn check(&self, outcome: &CompileOutcome) -> TestResult {
        match self {
            Expectation::MustCompile if outcome.success => TestResult::Passed,
            Expectation::MustCompile => TestResult::failed(
                "expected to compile, but compilation failed:",
                Some(outcome.stderr.clone()),
            ),
            Expectation::MustFail if !outcome.success => TestResult::Passed,
            Expectation::MustFail => {
                TestResult::failed("expected to fail, but compilation succeeded.", None)
            }
            Expectation::MustFailWith(text) if outcome.success => TestResult::failed(
                format!("expected to fail with \"{text}\", but compilation succeeded."),
                None,
            ),
            Expectation::MustFailWith(text) if outcome.stderr.contains(text.as_str()) => {
                TestResult::Passed
            }
            Expectation::MustFailWith(text) => TestResult::failed(
                format!("expected to fail with \"{text}\", but stderr does not contain this:"),
                Some(outcome.stderr.clone()),
            ),
        }
    }
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expectation::MustCompile => write!(f, "must compile"),
            Expectation::MustFail => write!(f, "must fail"),
            Expectation::MustFailWith(text) => write!(f, "must fail with \"{text}\""),
        }
    }
}

/// One test case extracted from an annotated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub name: String,
    pub expectation: Expectation,
    /// The test's own source lines, in file order.
    pub body_lines: Vec<String>,
    /// 1-indexed line of the test header.
    pub line: usize,
}

impl Test {
    pub fn new(name: impl Into<String>, expectation: Expectation, line: usize) -> Self {
        Self {
            name: name.into(),
            expectation,
            body_lines: Vec::new(),
            line,
        }
    }
}

/// What the compiler did with one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileOutcome {
    pub success: bool,
    pub stderr: String,
}

/// Test result for individual test execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed {
        reason: String,
        /// Compiler diagnostics worth showing alongside the reason.
        diagnostics: Option<String>,
    },
}

impl TestResult {
    pub fn failed(reason: impl Into<String>, diagnostics: Option<String>) -> Self {
        TestResult::Failed {
            reason: reason.into(),
            diagnostics,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, TestResult::Passed)
    }
}

/// Test result summary for CLI reporting
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub passed: usize,
    /// Names of failed tests, in run order. Duplicated names are kept as is.
    pub failed: Vec<String>,
}

impl TestSummary {
    pub fn record(&mut self, name: &str, result: &TestResult) {
        if result.is_passed() {
            self.passed += 1;
        } else {
            self.failed.push(name.to_string());
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn total_tests(&self) -> usize {
        self.passed + self.failed.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(success: bool, stderr: &str) -> CompileOutcome {
        CompileOutcome {
            success,
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn must_compile_checks_exit_status_only() {
        assert!(Expectation::MustCompile.check(&outcome(true, "warning: x")).is_passed());
        let result = Expectation::MustCompile.check(&outcome(false, "error: boom"));
        assert_eq!(
            result,
            TestResult::failed(
                "expected to compile, but compilation failed:",
                Some("error: boom".to_string())
            )
        );
    }

    #[test]
    fn must_fail_accepts_any_failure() {
        assert!(Expectation::MustFail.check(&outcome(false, "")).is_passed());
        assert!(!Expectation::MustFail.check(&outcome(true, "")).is_passed());
    }

    #[test]
    fn must_fail_with_needs_failure_and_substring() {
        let exp = Expectation::MustFailWith("no member".to_string());
        assert!(exp
            .check(&outcome(false, "x.cc:3: error: no member named 'y'"))
            .is_passed());
        assert!(!exp.check(&outcome(false, "error: expected ';'")).is_passed());
        assert!(!exp.check(&outcome(true, "no member")).is_passed());
    }

    #[test]
    fn substring_match_is_verbatim() {
        let exp = Expectation::MustFailWith("No Member".to_string());
        assert!(!exp.check(&outcome(false, "no member")).is_passed());
    }

    #[test]
    fn summary_keeps_duplicate_failures() {
        let mut summary = TestSummary::default();
        let failed = TestResult::failed("x", None);
        summary.record("dup", &failed);
        summary.record("dup", &failed);
        summary.record("ok", &TestResult::Passed);
        assert_eq!(summary.failed, ["dup", "dup"]);
        assert_eq!(summary.total_tests(), 3);
        assert!(summary.has_failures());
    }

    #[test]
    fn expectation_serializes_with_snake_case_tags() {
        let json = serde_json::to_string(&vec![
            Expectation::MustCompile,
            Expectation::MustFail,
            Expectation::MustFailWith("no member".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"["must_compile","must_fail",{"must_fail_with":"no member"}]"#);
    }
}
