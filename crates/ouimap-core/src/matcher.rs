//! Query Matching Engine
//!
//! Resolves query tokens against a [`RecordStore`]. Each token is tried, in
//! order, as:
//!
//! 1. a MAC address or prefix, matched by prefix containment;
//! 2. a short hex fragment, which is rejected with no results;
//! 3. a vendor name substring, case-insensitive.
//!
//! The first rule that applies decides the token. A token that fails every
//! rule contributes nothing; it never aborts the batch.

use std::collections::HashSet;

use log::trace;

use crate::dedup::{dedup_results, dedup_tokens};
use crate::prefix::{is_ambiguous_fragment, MacPrefix, ParseError};
use crate::store::RecordStore;
use crate::types::{MatchResult, PrefixRecord};

// =============================================================================
// Resolution
// =============================================================================

/// Which rule decided a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// Parsed as a prefix and matched at least one record
    Prefix,
    /// Hex fragment of 2 to 5 digits, deliberately unmatched
    AmbiguousFragment,
    /// Matched vendor names
    Vendor,
    /// Nothing matched
    NoMatch,
}

/// Outcome of resolving one token.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub kind: ResolutionKind,
    pub matches: Vec<MatchResult>,
    /// Why the token was not a valid prefix, if it was not
    pub parse_error: Option<ParseError>,
}

// =============================================================================
// Matcher
// =============================================================================

/// The query engine.
pub struct Matcher<'a> {
    store: &'a RecordStore,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher over a loaded store.
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Resolve a batch of tokens.
    ///
    /// Tokens are deduplicated case-insensitively first; results are
    /// concatenated in token order and deduplicated by (prefix, vendor).
    pub fn lookup<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<MatchResult> {
        let mut results = Vec::new();
        for token in dedup_tokens(tokens) {
            results.extend(self.resolve(token).matches);
        }
        let removed = dedup_results(&mut results);
        if removed > 0 {
            trace!("removed {} duplicate results", removed);
        }
        results
    }

    /// Resolve a single token.
    pub fn resolve(&self, token: &str) -> Resolution {
        let parse_error = match token.parse::<MacPrefix>() {
            Ok(query) => {
                let matches = self.match_prefix(&query);
                if !matches.is_empty() {
                    trace!("{:?}: {} prefix matches", token, matches.len());
                    return Resolution {
                        kind: ResolutionKind::Prefix,
                        matches,
                        parse_error: None,
                    };
                }
                None
            }
            Err(e) => {
                if is_ambiguous_fragment(token) {
                    trace!("{:?}: ambiguous hex fragment", token);
                    return Resolution {
                        kind: ResolutionKind::AmbiguousFragment,
                        matches: Vec::new(),
                        parse_error: Some(e),
                    };
                }
                Some(e)
            }
        };

        let matches = self.match_vendor(token);
        let kind = if matches.is_empty() {
            ResolutionKind::NoMatch
        } else {
            ResolutionKind::Vendor
        };
        trace!("{:?}: {:?} with {} matches", token, kind, matches.len());

        Resolution {
            kind,
            matches,
            parse_error,
        }
    }

    /// Every record overlapping `query`, in source order, one per distinct prefix.
    pub fn match_prefix(&self, query: &MacPrefix) -> Vec<MatchResult> {
        collect_unique(
            self.store
                .records()
                .iter()
                .filter(|record| query.overlaps(&record.prefix)),
        )
    }

    /// Every record whose vendor name contains `token`, ignoring case.
    pub fn match_vendor(&self, token: &str) -> Vec<MatchResult> {
        let needle = token.to_uppercase();
        collect_unique(self.store.vendors_containing(&needle))
    }
}

/// Keep the first record for each distinct prefix.
fn collect_unique<'r>(records: impl Iterator<Item = &'r PrefixRecord>) -> Vec<MatchResult> {
    let mut seen: HashSet<MacPrefix> = HashSet::new();
    records
        .filter(|record| seen.insert(record.prefix))
        .map(MatchResult::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_records;

    const DB: &str = "\
# test table
00:00:0C\tCisco\tCisco Systems, Inc
00:1A:2B\tAcme\tAcme Networks
00:1A:2B:30:00:00/28\tAcmeLab\tAcme Labs
00:1A:2B:30:00:00/36\tAcmeSub\tAcme Labs Subsidiary
00:1A:2C\tOther\tOther Corp
00:AB:12\tAb12\tAB12 Devices
00:1A:2B\tAcme\tAcme Networks
FC:FB:FB\tCisco\tCisco Systems, Inc
";

    fn store() -> RecordStore {
        load_records(DB.as_bytes()).unwrap().0
    }

    fn pairs(results: &[MatchResult]) -> Vec<(&str, &str)> {
        results
            .iter()
            .map(|r| (r.prefix.as_str(), r.vendor.as_str()))
            .collect()
    }

    #[test]
    fn test_oui_query_matches_contained_entries() {
        let store = store();
        let matcher = Matcher::new(&store);
        let resolution = matcher.resolve("00:1a:2b");

        assert_eq!(resolution.kind, ResolutionKind::Prefix);
        assert!(resolution.parse_error.is_none());
        assert_eq!(
            pairs(&resolution.matches),
            [
                ("00:1A:2B:00:00:00/24", "Acme Networks"),
                ("00:1A:2B:30:00:00/28", "Acme Labs"),
                ("00:1A:2B:30:00:00/36", "Acme Labs Subsidiary"),
            ]
        );
    }

    #[test]
    fn test_full_mac_matches_enclosing_blocks() {
        let store = store();
        let matcher = Matcher::new(&store);
        let results = matcher.lookup(&["00-1A-2B-30-01-02"]);
        assert_eq!(
            pairs(&results),
            [
                ("00:1A:2B:00:00:00/24", "Acme Networks"),
                ("00:1A:2B:30:00:00/28", "Acme Labs"),
            ]
        );

        let results = matcher.lookup(&["00:1A:2B:40:00:00"]);
        assert_eq!(pairs(&results), [("00:1A:2B:00:00:00/24", "Acme Networks")]);
    }

    #[test]
    fn test_duplicate_source_rows_collapse() {
        let store = store();
        let matcher = Matcher::new(&store);
        let results = matcher.lookup(&["00:1A:2B:00:00:00/24"]);
        let acme = results.iter().filter(|r| r.vendor == "Acme Networks").count();
        assert_eq!(acme, 1);
    }

    #[test]
    fn test_vendor_substring_case_insensitive() {
        let store = store();
        let matcher = Matcher::new(&store);
        let resolution = matcher.resolve("acme");

        assert_eq!(resolution.kind, ResolutionKind::Vendor);
        assert!(matches!(resolution.parse_error, Some(ParseError::InvalidHexLength(_))));
        assert_eq!(
            pairs(&resolution.matches),
            [
                ("00:1A:2B:00:00:00/24", "Acme Networks"),
                ("00:1A:2B:30:00:00/28", "Acme Labs"),
                ("00:1A:2B:30:00:00/36", "Acme Labs Subsidiary"),
            ]
        );
    }

    #[test]
    fn test_vendor_search_dedups_by_prefix() {
        let store = store();
        let matcher = Matcher::new(&store);
        let results = matcher.match_vendor("cisco systems");
        assert_eq!(
            pairs(&results),
            [
                ("00:00:0C:00:00:00/24", "Cisco Systems, Inc"),
                ("FC:FB:FB:00:00:00/24", "Cisco Systems, Inc"),
            ]
        );
    }

    #[test]
    fn test_short_hex_fragment_yields_nothing() {
        let store = store();
        let matcher = Matcher::new(&store);
        let resolution = matcher.resolve("AB12");
        assert_eq!(resolution.kind, ResolutionKind::AmbiguousFragment);
        assert!(resolution.matches.is_empty());
        assert!(matcher.lookup(&["ab:12"]).is_empty());

        // the same vendor is reachable with a non-hex query
        assert_eq!(matcher.lookup(&["ab12 dev"]).len(), 1);
    }

    #[test]
    fn test_unmatched_prefix_falls_through_to_vendor_search() {
        let store = store();
        let matcher = Matcher::new(&store);
        // valid prefix syntax with no record; no vendor contains it either
        let resolution = matcher.resolve("12:34:56");
        assert_eq!(resolution.kind, ResolutionKind::NoMatch);
        assert!(resolution.parse_error.is_none());
        assert!(resolution.matches.is_empty());

        // no CA:FE:BA record, so the vendor name decides
        let (store, _) = load_records("00:1A:2B\tAcme\tCAFEBA Labs\n".as_bytes()).unwrap();
        let resolution = Matcher::new(&store).resolve("CAFEBA");
        assert_eq!(resolution.kind, ResolutionKind::Vendor);
        assert!(resolution.parse_error.is_none());
        assert_eq!(pairs(&resolution.matches), [("00:1A:2B:00:00:00/24", "CAFEBA Labs")]);
    }

    #[test]
    fn test_prefix_match_wins_over_vendor_match() {
        let db = "00:1A:2B\tDeadbe\tDEADBE Networks\nDE:AD:BE\tOwner\tReal Owner\n";
        let (store, _) = load_records(db.as_bytes()).unwrap();
        let resolution = Matcher::new(&store).resolve("DEADBE");
        assert_eq!(resolution.kind, ResolutionKind::Prefix);
        assert_eq!(pairs(&resolution.matches), [("DE:AD:BE:00:00:00/24", "Real Owner")]);
    }

    #[test]
    fn test_bad_tokens_do_not_abort_batch() {
        let store = store();
        let matcher = Matcher::new(&store);
        let results = matcher.lookup(&["00:1A:2B/99", "zzz", "FC:FB:FB:01:02:03"]);
        assert_eq!(pairs(&results), [("FC:FB:FB:00:00:00/24", "Cisco Systems, Inc")]);
    }

    #[test]
    fn test_empty_token_matches_every_vendor() {
        let store = store();
        let matcher = Matcher::new(&store);
        let resolution = matcher.resolve("");
        assert_eq!(resolution.kind, ResolutionKind::Vendor);
        assert_eq!(resolution.matches.len(), 7);
    }

    #[test]
    fn test_lookup_dedups_tokens_and_results() {
        let store = store();
        let matcher = Matcher::new(&store);

        let once = matcher.lookup(&["00:1A:2C"]);
        let twice = matcher.lookup(&["00:1A:2C", "00:1a:2c"]);
        assert_eq!(once, twice);

        // the same pair reached through a prefix and a vendor query is kept once
        let results = matcher.lookup(&["00:1A:2C", "other corp"]);
        assert_eq!(pairs(&results), [("00:1A:2C:00:00:00/24", "Other Corp")]);
    }

    #[test]
    fn test_results_follow_token_order() {
        let store = store();
        let matcher = Matcher::new(&store);
        let results = matcher.lookup(&["other", "00:00:0C"]);
        assert_eq!(
            pairs(&results),
            [
                ("00:1A:2C:00:00:00/24", "Other Corp"),
                ("00:00:0C:00:00:00/24", "Cisco Systems, Inc"),
            ]
        );
    }

    #[test]
    fn test_store_and_matcher_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecordStore>();
        assert_send_sync::<Matcher<'static>>();

        let store = std::sync::Arc::new(store());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || Matcher::new(&store).lookup(&["acme"]).len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3);
        }
    }
}
