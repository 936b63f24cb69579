//! Core type definitions for OUImap
//!
//! These types are shared by the loader, the record store and the matcher.

use crate::prefix::MacPrefix;

// =============================================================================
// Prefix Record
// =============================================================================

/// One row of the vendor-assignment table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixRecord {
    /// Canonical prefix (bits past its length are zero)
    pub prefix: MacPrefix,
    /// Vendor name as written in the source, trimmed
    pub vendor: String,
}

impl PrefixRecord {
    pub fn new(prefix: MacPrefix, vendor: impl Into<String>) -> Self {
        Self {
            prefix,
            vendor: vendor.into(),
        }
    }
}

// =============================================================================
// Match Result
// =============================================================================

/// A resolved (prefix, vendor) pair ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchResult {
    /// Prefix in display form, e.g. `00:1A:2B:00:00:00/24`
    pub prefix: String,
    /// Vendor name
    pub vendor: String,
}

impl From<&PrefixRecord> for MatchResult {
    fn from(record: &PrefixRecord) -> Self {
        Self {
            prefix: record.prefix.to_string(),
            vendor: record.vendor.clone(),
        }
    }
}
