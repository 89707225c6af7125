//! Read-only, in-memory view over the case dataset.
//!
//! A store is built once (from the bundled JSON, a file, a CSV import, or the
//! forecast service) and never mutated afterwards. Lookups that miss return
//! `None`; callers present that as "no data available".

use crate::error::DatasetError;
use crate::models::{CaseRecord, DatasetEntry, Region};
use crate::regions;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Dataset shipped with the crate: cumulative confirmed cases up to 2022-04-28
/// and a seven-day forecast after it.
pub const BUNDLED_DATASET: &str = include_str!("../data/cases.json");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseRecordStore {
    records: BTreeMap<String, CaseRecord>,
}

impl CaseRecordStore {
    /// Build from records; a later record with the same region name replaces an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = CaseRecord>) -> Self {
        let mut map = BTreeMap::new();
        for r in records {
            if r.region.code.is_none() {
                warn!("region '{}' has no short code; it will not match map geometry", r.region.name);
            }
            map.insert(r.region.name.clone(), r);
        }
        debug!("case store holds {} regions", map.len());
        Self { records: map }
    }

    /// Parse the dataset document (`{ name: { past: [...], prediction: [...] } }`).
    pub fn from_json_str(s: &str) -> Result<Self, DatasetError> {
        let raw: BTreeMap<String, DatasetEntry> = serde_json::from_str(s)?;
        Ok(Self::from_entries(raw))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let raw: BTreeMap<String, DatasetEntry> = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(raw))
    }

    /// Load a dataset JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let f = File::open(path.as_ref())?;
        debug!("loading dataset from {}", path.as_ref().display());
        Self::from_reader(BufReader::new(f))
    }

    /// The dataset embedded at compile time.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json_str(BUNDLED_DATASET)
    }

    pub(crate) fn from_entries(raw: BTreeMap<String, DatasetEntry>) -> Self {
        Self::from_records(
            raw.into_iter()
                .map(|(name, entry)| entry.into_record(&name)),
        )
    }

    /// Look a record up by display name or short code (legacy codes included).
    pub fn get(&self, region: &str) -> Option<&CaseRecord> {
        let key = region.trim();
        if let Some(r) = self.records.get(key) {
            return Some(r);
        }
        if let Some(r) = self
            .records
            .values()
            .find(|r| r.region.name.eq_ignore_ascii_case(key))
        {
            return Some(r);
        }
        let code = regions::canonical_code(key)?;
        self.records
            .values()
            .find(|r| r.region.code.as_deref() == Some(code))
    }

    /// All regions, ordered by display name.
    pub fn regions(&self) -> Vec<&Region> {
        self.records.values().map(|r| &r.region).collect()
    }

    /// All records, ordered by display name.
    pub fn records(&self) -> impl Iterator<Item = &CaseRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_loads_every_mapped_state() {
        let store = CaseRecordStore::bundled().unwrap();
        assert_eq!(store.len(), regions::STATE_CODES.len());
        for r in store.records() {
            assert!(r.region.code.is_some(), "{} has no code", r.region.name);
            assert!(!r.historical.is_empty());
            assert!(!r.forecast.is_empty());
        }
    }

    #[test]
    fn get_accepts_name_code_and_legacy_code() {
        let store = CaseRecordStore::bundled().unwrap();
        assert_eq!(store.get("Odisha").unwrap().region.name, "Odisha");
        assert_eq!(store.get("odisha").unwrap().region.name, "Odisha");
        assert_eq!(store.get("OD").unwrap().region.name, "Odisha");
        assert_eq!(store.get("OR").unwrap().region.name, "Odisha");
        assert!(store.get("Atlantis").is_none());
    }
}
