//! Database Loader
//!
//! Streams a decompressed, line-oriented vendor table into a [`RecordStore`].
//!
//! Line format: `<prefix>\t<short name>\t<vendor name>[\t...]`. Lines starting
//! with `#` are comments. Runs of tabs count as one separator.
//!
//! Only stream-level failures are errors. Content defects in a single line
//! drop that line and are recorded in the [`LoadReport`].

use std::io::BufRead;

use log::{debug, info};

use crate::prefix::{MacPrefix, ParseError};
use crate::store::RecordStore;
use crate::types::PrefixRecord;

/// Minimum fields per line: prefix, short name, vendor name.
const MIN_FIELDS: usize = 3;

/// Error type for database loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("error reading database: {0}")]
    Stream(#[from] std::io::Error),
}

/// Why a line was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedLine {
    #[error("expected at least 3 tab-separated fields, found {0}")]
    TooFewFields(usize),
    #[error("invalid prefix: {0}")]
    InvalidPrefix(#[from] ParseError),
}

/// A dropped line and its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    pub line: usize,
    pub reason: MalformedLine,
}

/// Summary of a successful load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub lines: usize,
    pub comments: usize,
    pub blank: usize,
    pub loaded: usize,
    pub dropped: Vec<LineDiagnostic>,
}

/// Load every valid record from a line-oriented stream.
///
/// The returned store is complete; nothing is handed out while loading.
pub fn load_records<R: BufRead>(mut reader: R) -> Result<(RecordStore, LoadReport), LoadError> {
    let mut store = RecordStore::new();
    let mut report = LoadReport::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        report.lines += 1;

        let raw = String::from_utf8_lossy(&buf);
        let line = raw.trim_end_matches('\n').trim_end_matches('\r');

        if line.starts_with('#') {
            report.comments += 1;
            continue;
        }
        if line.trim().is_empty() {
            report.blank += 1;
            continue;
        }

        match parse_line(line) {
            Ok(record) => {
                store.push(record);
                report.loaded += 1;
            }
            Err(reason) => {
                debug!("dropping database line {}: {}", report.lines, reason);
                report.dropped.push(LineDiagnostic {
                    line: report.lines,
                    reason,
                });
            }
        }
    }

    info!(
        "loaded {} records ({} vendors) from {} lines, {} dropped",
        report.loaded,
        store.vendor_count(),
        report.lines,
        report.dropped.len()
    );

    Ok((store, report))
}

/// Parse one non-comment line into a record.
pub fn parse_line(line: &str) -> Result<PrefixRecord, MalformedLine> {
    let fields: Vec<&str> = line.split('\t').filter(|f| !f.is_empty()).collect();
    if fields.len() < MIN_FIELDS {
        return Err(MalformedLine::TooFewFields(fields.len()));
    }

    let prefix: MacPrefix = fields[0].trim().parse()?;
    Ok(PrefixRecord::new(prefix, fields[2].trim()))
}
