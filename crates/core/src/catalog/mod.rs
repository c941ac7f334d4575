#![allow(missing_docs)]

//! Immutable, ordered collection of cities keyed by normalized name.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{normalize, CityRecord, RawCity};

/// Shape violations found while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("record {index}: missing field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("record {index}: city name is empty")]
    EmptyName { index: usize },
    #[error("record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// How malformed records are treated during a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    /// Skip the offending record and keep loading.
    #[default]
    Lenient,
    /// Abort the whole load on the first bad record.
    Strict,
}

/// Cities in load order with a case-insensitive index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<CityRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from already-decoded records.
    pub fn load<I>(records: I, policy: RecordPolicy) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = RawCity>,
    {
        let mut builder = Builder::new(policy);
        for (index, raw) in records.into_iter().enumerate() {
            builder.admit(raw.validate(index))?;
        }
        Ok(builder.finish())
    }

    /// Build a catalog from loosely-typed JSON values, decoding each record on
    /// its own so a single bad entry can be reported by position.
    pub fn from_json_values<I>(values: I, policy: RecordPolicy) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut builder = Builder::new(policy);
        for (index, value) in values.into_iter().enumerate() {
            let record = serde_json::from_value::<RawCity>(value)
                .map_err(|err| CatalogError::InvalidRecord {
                    index,
                    reason: err.to_string(),
                })
                .and_then(|raw| raw.validate(index));
            builder.admit(record)?;
        }
        Ok(builder.finish())
    }

    /// Case-insensitive lookup by name.
    pub fn lookup(&self, name: &str) -> Option<&CityRecord> {
        self.index
            .get(&normalize(name))
            .and_then(|&position| self.records.get(position))
    }

    /// Whether a city with this name exists, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&normalize(name))
    }

    /// Every normalized name in the catalog.
    pub fn all_names(&self) -> HashSet<String> {
        self.index.keys().cloned().collect()
    }

    /// Records in load order.
    pub fn records(&self) -> &[CityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct Builder {
    policy: RecordPolicy,
    catalog: Catalog,
    skipped: usize,
}

impl Builder {
    fn new(policy: RecordPolicy) -> Self {
        Self {
            policy,
            catalog: Catalog::default(),
            skipped: 0,
        }
    }

    fn admit(&mut self, record: Result<CityRecord, CatalogError>) -> Result<(), CatalogError> {
        let record = match record {
            Ok(record) => record,
            Err(err) if self.policy == RecordPolicy::Lenient => {
                warn!("Skipping malformed city record: {err}");
                self.skipped += 1;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let key = record.normalized_name();
        if self.catalog.index.contains_key(&key) {
            warn!("Skipping duplicate city {:?}", record.name);
            self.skipped += 1;
            return Ok(());
        }

        self.catalog
            .index
            .insert(key, self.catalog.records.len());
        self.catalog.records.push(record);
        Ok(())
    }

    fn finish(self) -> Catalog {
        debug!(
            loaded = self.catalog.len(),
            skipped = self.skipped,
            "catalog built"
        );
        self.catalog
    }
}
