//! Trace input and Verilog output collaborators
//!
//! The pipeline only ever calls `read()` on its source and `write()` on its
//! sink, so tests can swap the filesystem for memory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where trace text comes from
pub trait TraceSource {
    fn read(&self) -> io::Result<String>;

    /// Name used in messages
    fn describe(&self) -> String;
}

/// Where generated source goes
pub trait OutputSink {
    fn write(&mut self, text: &str) -> io::Result<()>;

    fn describe(&self) -> String;
}

/// Trace file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TraceSource for FileSource {
    fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Output file on disk
///
/// Writes go to a temporary file in the same directory that is renamed
/// into place. A failed write leaves neither a truncated output nor the
/// temporary file behind.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // Dropped, and so deleted, on any error before persist
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(text.as_bytes())?;
        temp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory source, for traces that are already loaded
#[derive(Debug, Clone, Default)]
pub struct StringSource {
    text: String,
}

impl StringSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TraceSource for StringSource {
    fn read(&self) -> io::Result<String> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// In-memory sink collecting every write
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub writes: Vec<String>,
}

impl OutputSink for MemorySink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.writes.push(text.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// `<input stem>.sv` next to the input file
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("sv")
}
