//! Stable deduplication passes
//!
//! Both passes keep the first occurrence and preserve order.

use std::collections::HashSet;

use crate::types::MatchResult;

/// Drop tokens whose uppercased form was already seen.
pub fn dedup_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<&str> {
    let mut seen: HashSet<String> = HashSet::new();
    tokens
        .iter()
        .map(|token| token.as_ref())
        .filter(|token| seen.insert(token.to_uppercase()))
        .collect()
}

/// Drop results whose (prefix, vendor) pair was already seen.
///
/// Returns the number of results removed.
pub fn dedup_results(results: &mut Vec<MatchResult>) -> usize {
    let before = results.len();
    let mut seen: HashSet<ResultKey> = HashSet::new();
    results.retain(|result| seen.insert(ResultKey::from(result)));
    before - results.len()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResultKey {
    prefix: String,
    vendor: String,
}

impl From<&MatchResult> for ResultKey {
    fn from(result: &MatchResult) -> Self {
        Self {
            prefix: result.prefix.clone(),
            vendor: result.vendor.clone(),
        }
    }
}
