//! In-memory substance index.
//!
//! Parses the bundled dataset once and merges every entry into its
//! canonical record. The index is a read-only cache: it is built at load
//! and shared freely across readers afterwards.

use std::collections::BTreeMap;

use tracing::debug;

use crate::merge::{merge_substance, SubstanceRecord};
use crate::types::RawSubstanceData;

/// Lookup and search over the merged reference records.
#[derive(Debug, Default)]
pub struct SubstanceIndex {
    records: BTreeMap<String, SubstanceRecord>,
}

impl SubstanceIndex {
    /// Parse the bundled dataset JSON and merge every entry.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawSubstanceData = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw))
    }

    /// Build the index from an already-parsed raw dataset.
    pub fn from_raw(raw: &RawSubstanceData) -> Self {
        let mut records = BTreeMap::new();
        for (key, entry) in raw {
            let lowered = key.to_lowercase();
            let record = merge_substance(
                &lowered,
                entry.psychonautwiki.as_ref(),
                entry.tripsit.as_ref(),
            );
            records.insert(lowered, record);
        }
        debug!(substances = records.len(), "substance index built");
        Self { records }
    }

    /// Case-insensitive lookup by dataset key. Unknown substances resolve
    /// to `None`; absence is never an error here.
    pub fn get(&self, name: &str) -> Option<&SubstanceRecord> {
        self.records.get(&name.to_lowercase())
    }

    /// Substring search over pretty name, name, aliases, and categories,
    /// case-insensitive. Results come back sorted by display name. An empty
    /// query returns everything.
    pub fn search(&self, query: &str) -> Vec<&SubstanceRecord> {
        let query = query.trim().to_lowercase();
        let mut hits: Vec<&SubstanceRecord> = self
            .records
            .values()
            .filter(|record| {
                if query.is_empty() {
                    return true;
                }
                record.pretty_name.to_lowercase().contains(&query)
                    || record.name.to_lowercase().contains(&query)
                    || record
                        .aliases
                        .iter()
                        .any(|a| a.to_lowercase().contains(&query))
                    || record
                        .categories
                        .iter()
                        .any(|c| c.to_lowercase().contains(&query))
            })
            .collect();
        hits.sort_by(|a, b| a.pretty_name.cmp(&b.pretty_name));
        hits
    }

    /// All merged records, in key order.
    pub fn records(&self) -> impl Iterator<Item = &SubstanceRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
