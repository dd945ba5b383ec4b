//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Stand-in compiler: reads the unit from stdin and fails on marker words.
pub const FAKE_COMPILER: &str = r#"#!/bin/sh
src=$(cat)
case "$src" in
  *BROKEN*) echo "error: no member named 'sise' in 'std::vector<int>'" >&2; exit 1 ;;
  *SYNTAX*) echo "error: expected ';' after expression" >&2; exit 1 ;;
esac
exit 0
"#;

pub const SCENARIO_A: &str = "\
#error COMPILER TEST
#include <vector>
#pragma tests begin
#pragma test \"basic\" must compile
std::vector<int> v;
#pragma tests end
";

pub const TWO_TESTS: &str = "\
#error COMPILER TEST
#include <vector>
namespace demo {
#pragma tests begin
#pragma test \"uses vector\" must compile
std::vector<int> first;

#pragma test \"typo\" must fail with \"no member\"
int n = std::vector<int>().sise(); // BROKEN
#pragma tests end
}  // namespace demo
";

/// A scratch directory with a fake compiler script in it.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("fake-cc.sh"), FAKE_COMPILER).expect("write fake compiler");
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, text).expect("write fixture");
        path
    }

    /// Compiler prefix invoking the fake compiler through `sh`.
    pub fn compiler(&self) -> Vec<String> {
        vec![
            "sh".to_string(),
            self.path("fake-cc.sh").display().to_string(),
        ]
    }
}

pub fn generate_cmd(source: &Path, output: &Path, depfile: &Path, compiler: &[String]) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("compiler-test").expect("binary builds");
    cmd.arg("generate")
        .arg("-c")
        .arg(source)
        .arg("-o")
        .arg(output)
        .arg("--depfile")
        .arg(depfile)
        .arg("--")
        .args(compiler);
    cmd
}
