//! Recording sinks for retained samples.
//!
//! The sampler emits one header row per channel at start and one data row
//! per retained iteration; sinks decide where the rows go. Keeping the
//! sink behind a trait keeps the sampling loop free of file-system side
//! effects, so tests capture chains in memory.

use crate::error::SppmError;
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::rc::Rc;

/// Append-only, single-writer recording channel.
pub trait SampleSink {
    /// Write the header row (called once, before any data row).
    fn write_header(&mut self, columns: &[String]) -> anyhow::Result<()>;

    /// Append one data row.
    fn write_row(&mut self, values: &[String]) -> anyhow::Result<()>;

    /// Flush and close the channel.
    fn finish(&mut self) -> anyhow::Result<()>;
}

/// Buffered CSV file sink.
///
/// Every I/O failure surfaces as [`SppmError::OutputWrite`] with the
/// offending path; chains are not resumable, so a failed write is fatal.
pub struct CsvSink {
    path: Box<str>,
    writer: BufWriter<File>,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Create (truncate) the output file.
    pub fn create(path: &str) -> anyhow::Result<Self> {
        let file = File::create(path).map_err(|source| SppmError::OutputWrite {
            path: path.to_string(),
            source,
        })?;
        Ok(CsvSink {
            path: path.into(),
            writer: BufWriter::new(file),
        })
    }

    fn write_csv_line(&mut self, fields: &[String]) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", fields.join(",")).map_err(|source| {
            SppmError::OutputWrite {
                path: self.path.to_string(),
                source,
            }
        })?;
        Ok(())
    }
}

impl SampleSink for CsvSink {
    fn write_header(&mut self, columns: &[String]) -> anyhow::Result<()> {
        self.write_csv_line(columns)
    }

    fn write_row(&mut self, values: &[String]) -> anyhow::Result<()> {
        self.write_csv_line(values)
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.writer.flush().map_err(|source| SppmError::OutputWrite {
            path: self.path.to_string(),
            source,
        })?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryData {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// In-memory sink with shared-handle semantics for tests.
///
/// Clones share the same buffer, so a test can hand one handle to the
/// sampler and inspect the recorded rows through another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    data: Rc<RefCell<MemoryData>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded header row.
    pub fn header(&self) -> Vec<String> {
        self.data.borrow().header.clone()
    }

    /// All recorded data rows.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.data.borrow().rows.clone()
    }

    /// Number of recorded data rows.
    pub fn num_rows(&self) -> usize {
        self.data.borrow().rows.len()
    }
}

impl SampleSink for MemorySink {
    fn write_header(&mut self, columns: &[String]) -> anyhow::Result<()> {
        self.data.borrow_mut().header = columns.to_vec();
        Ok(())
    }

    fn write_row(&mut self, values: &[String]) -> anyhow::Result<()> {
        self.data.borrow_mut().rows.push(values.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
