//! Benchmark log parsing
//!
//! The depth benchmark writes one JSON object per measurement, interleaved with
//! human-readable progress text. This module turns that stream into [`Sample`]s:
//! - [`classify_line`] / [`parse_record`] decide what a single line yields
//! - [`SampleScanner`] applies them lazily across a whole reader
//! - [`open_log`] opens a plain or zstd-compressed log file for scanning
//!
//! Lines which do not yield a sample are skipped; they never abort the scan.

use crate::common::data_structures::{Sample, ScanStats};
use crate::config::FieldNames;
use log::trace;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use zstd::Decoder;

/// Errors that can occur while reading the log file itself
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to decompress zstd file: {0}")]
    Decompression(String),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Why a line did not produce a [`Sample`].
///
/// Rejections are absorbed by the scanner and only ever show up in [`ScanStats`]
/// and trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRejection {
    /// Blank, free text, or text starting with `{` that is not a JSON object
    MalformedLine,
    /// A JSON object without a usable depth or gas value
    IncompleteRecord,
}

/// Numeric shapes the harness has been seen to emit for a field.
///
/// Gas is written as a decimal string (it comes from a bigint), depth as a plain
/// JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerLike {
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl IntegerLike {
    fn to_u64(&self) -> Option<u64> {
        match self {
            IntegerLike::Unsigned(value) => Some(*value),
            IntegerLike::Float(value) => {
                let integral = value.is_finite() && *value >= 0.0 && value.fract() == 0.0;
                (integral && *value < u64::MAX as f64).then_some(*value as u64)
            }
            IntegerLike::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Decides what a single log line yields.
///
/// # Arguments
/// * `line` - Raw line, with or without its trailing newline
/// * `fields` - Keys holding the depth and gas values
///
/// # Returns
/// * `Ok(Sample)` - The line is a JSON object with integer-coercible depth and gas
/// * `Err(LineRejection)` - The reason the line was skipped
pub fn classify_line(line: &str, fields: &FieldNames) -> core::result::Result<Sample, LineRejection> {
    let line = line.trim();
    if !line.starts_with('{') {
        return Err(LineRejection::MalformedLine);
    }

    let record: Map<String, Value> =
        serde_json::from_str(line).map_err(|_| LineRejection::MalformedLine)?;

    let depth = integer_field(&record, &fields.depth).ok_or(LineRejection::IncompleteRecord)?;
    let cost = integer_field(&record, &fields.cost).ok_or(LineRejection::IncompleteRecord)?;
    Ok(Sample::new(depth, cost))
}

/// Parses one log line into a [`Sample`], or [`None`] if the line carries no sample.
pub fn parse_record(line: &str, fields: &FieldNames) -> Option<Sample> {
    classify_line(line, fields).ok()
}

fn integer_field(record: &Map<String, Value>, key: &str) -> Option<u64> {
    let value = record.get(key)?;
    IntegerLike::deserialize(value).ok()?.to_u64()
}

/// Lazily yields the [`Sample`]s found in a line-oriented reader.
///
/// Lines are read as raw bytes; a line that is not valid UTF-8 counts as malformed
/// rather than ending the scan. An I/O error stops iteration and is reported by
/// [`SampleScanner::finish`].
pub struct SampleScanner<'a, R> {
    reader: R,
    fields: &'a FieldNames,
    buffer: Vec<u8>,
    stats: ScanStats,
    error: Option<std::io::Error>,
}

impl<'a, R: BufRead> SampleScanner<'a, R> {
    pub fn new(reader: R, fields: &'a FieldNames) -> Self {
        Self {
            reader,
            fields,
            buffer: Vec::new(),
            stats: ScanStats::default(),
            error: None,
        }
    }

    /// Tallies for the lines consumed so far.
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Ends the scan, surfacing any read error that cut it short.
    pub fn finish(self) -> Result<ScanStats> {
        match self.error {
            Some(err) => Err(ParsingError::FileRead(err)),
            None => Ok(self.stats),
        }
    }
}

impl<R: BufRead> Iterator for SampleScanner<'_, R> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.error.is_some() {
            return None;
        }

        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    self.error = Some(err);
                    return None;
                }
            }

            self.stats.lines_read += 1;
            let line_number = self.stats.lines_read;

            let Ok(line) = std::str::from_utf8(&self.buffer) else {
                trace!("line {}: not valid UTF-8, skipped", line_number);
                self.stats.malformed += 1;
                continue;
            };

            match classify_line(line, self.fields) {
                Ok(sample) => {
                    self.stats.accepted += 1;
                    return Some(sample);
                }
                Err(LineRejection::MalformedLine) => {
                    trace!("line {}: not a JSON record, skipped", line_number);
                    self.stats.malformed += 1;
                }
                Err(LineRejection::IncompleteRecord) => {
                    trace!(
                        "line {}: missing or non-integer '{}'/'{}', skipped",
                        line_number,
                        self.fields.depth,
                        self.fields.cost
                    );
                    self.stats.incomplete += 1;
                }
            }
        }
    }
}

/// Opens a benchmark log for scanning.
///
/// Files ending in `.zst` are decompressed on the fly; anything else is read as
/// plain text. The file handle is released when the returned scanner is dropped.
///
/// # Arguments
/// * `file_path` - Path to the log file
/// * `fields` - Keys holding the depth and gas values
///
/// # Returns
/// * `Ok(SampleScanner)` - Ready to iterate
/// * `Err(ParsingError)` - If the file could not be opened or the decoder not created
pub fn open_log<'a>(
    file_path: &Path,
    fields: &'a FieldNames,
) -> Result<SampleScanner<'a, Box<dyn BufRead>>> {
    let file = File::open(file_path)?;

    let reader: Box<dyn BufRead> = if is_zstd_path(file_path) {
        let decoder = Decoder::new(file)
            .map_err(|e| ParsingError::Decompression(format!("Failed to create decoder: {}", e)))?;
        Box::new(BufReader::new(decoder))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(SampleScanner::new(reader, fields))
}

fn is_zstd_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("zst"))
}
