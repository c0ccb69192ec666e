//! Gzip-aware buffered file reading.

use crate::error::InputError;
use flate2::read::GzDecoder;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open a buffered reader over a plain or gzipped file.
///
/// * `path` - file name; a `.gz` extension selects gzip decoding
pub fn open_buf_reader(path: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_string(),
        source,
    })?;

    let ext = Path::new(path).extension().and_then(OsStr::to_str);
    if ext == Some("gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read every line of the input file into memory.
///
/// * `path` - file name, either gzipped or not
pub fn read_lines(path: &str) -> anyhow::Result<Vec<Box<str>>> {
    let buf = open_buf_reader(path)?;
    let mut lines = vec![];
    for x in buf.lines() {
        let x = x.map_err(|source| InputError::Io {
            path: path.to_string(),
            source,
        })?;
        lines.push(x.into_boxed_str());
    }
    Ok(lines)
}
