//! # Test Registry
//!
//! Ordered collection of the tests found in one source file, together with the
//! preamble and epilogue they share. The file parser is the only writer; once
//! parsing finishes the registry is read-only and assembles one compilable unit
//! per test: preamble, then that test's body, then epilogue.

use crate::test::Test;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestRegistry {
    preamble: Vec<String>,
    tests: Vec<Test>,
    epilogue: Vec<String>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_preamble(&mut self, line: &str) {
        self.preamble.push(line.to_string());
    }

    pub fn push_test(&mut self, test: Test) {
        self.tests.push(test);
    }

    /// Appends a body line to the most recently added test.
    ///
    /// Returns `false` (and stores nothing) when no test exists yet.
    pub fn push_body_line(&mut self, line: &str) -> bool {
        match self.tests.last_mut() {
            Some(test) => {
                test.body_lines.push(line.to_string());
                true
            }
            None => false,
        }
    }

    pub fn push_epilogue(&mut self, line: &str) {
        self.epilogue.push(line.to_string());
    }

    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn epilogue(&self) -> &[String] {
        &self.epilogue
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Builds the compilable unit for `test`: every line ends with `\n`.
    ///
    /// # Example
    /// ```
    /// use compiler_test::registry::TestRegistry;
    /// use compiler_test::test::{Expectation, Test};
    /// let mut registry = TestRegistry::new();
    /// registry.push_preamble("#include <vector>");
    /// registry.push_test(Test::new("basic", Expectation::MustCompile, 3));
    /// registry.push_body_line("std::vector<int> v;");
    /// let unit = registry.assemble(&registry.tests()[0]);
    /// assert_eq!(unit, "#include <vector>\nstd::vector<int> v;\n");
    /// ```
    pub fn assemble(&self, test: &Test) -> String {
        self.preamble
            .iter()
            .chain(&test.body_lines)
            .chain(&self.epilogue)
            .fold(String::new(), |mut unit, line| {
                unit.push_str(line);
                unit.push('\n');
                unit
            })
    }

    /// Every test paired with its assembled unit, in file order.
    pub fn units(&self) -> impl Iterator<Item = (&Test, String)> + '_ {
        self.tests.iter().map(move |test| (test, self.assemble(test)))
    }
}
