//! Database file access
//!
//! Opens the local vendor table (gzip or plain text), loads it into a
//! [`RecordStore`] and reports how stale it is. Fetching a fresh copy is left
//! to the user.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use flate2::read::MultiGzDecoder;
use log::{info, warn};

use ouimap_core::{load_records, LoadReport, RecordStore};

/// Upstream source of the vendor table.
pub const UPSTREAM_URL: &str = "https://www.wireshark.org/download/automated/data/manuf.gz";

/// Database file name looked up next to the executable.
pub const DEFAULT_DB_FILE: &str = "ouimap.db";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// `ouimap.db` beside the running executable, or in the working directory.
pub fn default_db_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DB_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

/// Open the database as a line stream, decompressing if it is gzip.
pub fn open(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Open and load the database.
pub fn load(path: &Path) -> Result<(RecordStore, LoadReport), String> {
    let reader = open(path)
        .map_err(|e| format!("error opening database '{}': {}", path.display(), e))?;
    let (store, report) = load_records(reader).map_err(|e| e.to_string())?;
    info!(
        "database '{}': {} records, {} malformed lines dropped",
        path.display(),
        store.len(),
        report.dropped.len()
    );
    Ok((store, report))
}

/// Decompress the whole file without parsing it; returns the decoded size.
pub fn check(path: &Path) -> Result<u64, String> {
    let mut reader = open(path)
        .map_err(|e| format!("error opening database '{}': {}", path.display(), e))?;
    io::copy(&mut reader, &mut io::sink())
        .map_err(|e| format!("database integrity check failed: {}", e))
}

/// Time since the file was last modified.
pub fn age(path: &Path) -> io::Result<Duration> {
    let modified = path.metadata()?.modified()?;
    Ok(SystemTime::now()
        .duration_since(modified)
        .unwrap_or_default())
}

/// Whole days in a duration.
pub fn days(duration: Duration) -> u64 {
    duration.as_secs() / SECS_PER_DAY
}

/// Whether a database of this age should be refreshed.
pub fn is_stale(age: Duration, max_age_days: u64) -> bool {
    age > Duration::from_secs(max_age_days.saturating_mul(SECS_PER_DAY))
}

/// Log a warning when the database is older than `max_age_days`.
///
/// Returns whether it is stale.
pub fn warn_if_stale(path: &Path, max_age_days: u64) -> bool {
    let age = match age(path) {
        Ok(age) => age,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return false,
        Err(e) => {
            warn!("cannot determine age of '{}': {}", path.display(), e);
            return false;
        }
    };

    let stale = is_stale(age, max_age_days);
    if stale {
        warn!(
            "OUI database '{}' is {} days old; download a fresh copy from {}",
            path.display(),
            days(age),
            UPSTREAM_URL
        );
    }
    stale
}
