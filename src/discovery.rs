use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use crate::config::Markers;
use crate::diagnostics::{Error, ParseError, Result};
use crate::registry::TestRegistry;
use crate::syntax::parse_source;

/// Finds annotated compiler test sources in a directory tree.
///
/// A file is a compiler test source when its first line (trailing whitespace
/// removed) equals the global header marker; file names do not matter.
#[derive(Debug)]
pub struct TestDiscoverer<'a> {
    markers: &'a Markers,
}

impl<'a> TestDiscoverer<'a> {
    pub fn new(markers: &'a Markers) -> Self {
        Self { markers }
    }

    /// Recursively scans `root`, skipping hidden directories and `target/`.
    ///
    /// The returned list of files is sorted to ensure deterministic order.
    pub fn discover<P: AsRef<Path>>(&self, root: P) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !Self::is_ignored_dir(entry));
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                Error::io("walk", path, source)
            })?;
            if entry.file_type().is_file() && self.is_test_source(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parses one discovered file.
    ///
    /// The outer error is an I/O failure; the inner one is a parse failure.
    pub fn load(&self, path: &Path) -> Result<std::result::Result<TestRegistry, ParseError>> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        Ok(parse_source(&path.display().to_string(), &text, self.markers))
    }

    fn is_test_source(&self, path: &Path) -> bool {
        let Ok(file) = File::open(path) else {
            return false;
        };
        let mut first = String::new();
        match BufReader::new(file).read_line(&mut first) {
            Ok(_) => first.trim_end() == self.markers.global_header,
            Err(_) => false,
        }
    }

    fn is_ignored_dir(entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map_or(false, |name| name.starts_with('.') || name == "target")
    }
}
