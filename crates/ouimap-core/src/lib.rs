//! OUImap Core Library
//!
//! This crate resolves hardware (MAC) address prefixes to vendor names and
//! vendor names back to their assigned prefixes, using a vendor-assignment
//! table such as Wireshark's `manuf` file.
//!
//! # Architecture
//!
//! The loader streams the line-oriented table once into an immutable
//! [`RecordStore`]. Every prefix, whatever notation it was written in, is
//! normalized into a left-aligned 48-bit value plus a significant-bit count,
//! so OUI (24-bit), OUI-28/36 and full addresses compare in one space.
//! The [`Matcher`] then resolves query batches against the store.
//!
//! # Modules
//!
//! - `prefix`: parsing and formatting of MAC prefix notation
//! - `types`: shared record and result types
//! - `store`: the record store and its vendor index
//! - `loader`: line-oriented database parsing
//! - `matcher`: query resolution
//! - `dedup`: stable deduplication of query tokens and results

pub mod dedup;
pub mod loader;
pub mod matcher;
pub mod prefix;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use dedup::{dedup_results, dedup_tokens};
pub use loader::{load_records, LineDiagnostic, LoadError, LoadReport, MalformedLine};
pub use matcher::{Matcher, Resolution, ResolutionKind};
pub use prefix::{MacPrefix, ParseError, MAC_BITS};
pub use store::RecordStore;
pub use types::{MatchResult, PrefixRecord};
