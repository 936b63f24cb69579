//! Record Store
//!
//! Holds the parsed vendor table: records in source order plus an index from
//! uppercased vendor name to the records carrying that name.
//!
//! The store is only populated by the loader and is read-only once returned,
//! so it can be shared across threads behind a plain reference or an `Arc`.

use std::collections::HashMap;

use crate::prefix::MAC_BITS;
use crate::types::PrefixRecord;

/// Records sharing one uppercased vendor name.
#[derive(Debug, Clone)]
struct VendorBucket {
    key: String,
    records: Vec<usize>,
}

/// Immutable table of prefix records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<PrefixRecord>,
    /// Buckets in first-seen order of their vendor name
    buckets: Vec<VendorBucket>,
    bucket_by_key: HashMap<String, usize>,
}

impl RecordStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a record and index it under its uppercased vendor name.
    pub(crate) fn push(&mut self, record: PrefixRecord) {
        let id = self.records.len();
        let key = record.vendor.to_uppercase();

        match self.bucket_by_key.get(&key) {
            Some(&bucket) => self.buckets[bucket].records.push(id),
            None => {
                self.bucket_by_key.insert(key.clone(), self.buckets.len());
                self.buckets.push(VendorBucket {
                    key,
                    records: vec![id],
                });
            }
        }

        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in source order.
    pub fn records(&self) -> &[PrefixRecord] {
        &self.records
    }

    /// Number of distinct vendor names (case-insensitive).
    pub fn vendor_count(&self) -> usize {
        self.buckets.len()
    }

    /// Records whose vendor name equals `name`, ignoring case.
    pub fn records_for_vendor(&self, name: &str) -> impl Iterator<Item = &PrefixRecord> + '_ {
        let ids = self
            .bucket_by_key
            .get(&name.to_uppercase())
            .map(|&bucket| self.buckets[bucket].records.as_slice())
            .unwrap_or(&[]);
        ids.iter().map(move |&id| &self.records[id])
    }

    /// Records of every vendor whose uppercased name contains `needle_upper`.
    ///
    /// Vendors are visited in the order their name first appeared; records
    /// within a vendor in source order. `needle_upper` must already be
    /// uppercased.
    pub fn vendors_containing<'s>(
        &'s self,
        needle_upper: &'s str,
    ) -> impl Iterator<Item = &'s PrefixRecord> + 's {
        self.buckets
            .iter()
            .filter(move |bucket| bucket.key.contains(needle_upper))
            .flat_map(move |bucket| bucket.records.iter().map(move |&id| &self.records[id]))
    }

    /// Record count per prefix length, indexed by length (0..=48).
    pub fn length_histogram(&self) -> [usize; MAC_BITS as usize + 1] {
        let mut histogram = [0usize; MAC_BITS as usize + 1];
        for record in &self.records {
            histogram[record.prefix.len() as usize] += 1;
        }
        histogram
    }
}
