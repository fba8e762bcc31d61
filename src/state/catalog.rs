use std::collections::HashMap;

use strsim::jaro_winkler;
use tracing::debug;

use crate::error::{MenuError, Result};
use crate::models::{normalize_key, IngredientRecord};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Immutable ingredient catalog with name and alias lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<IngredientRecord>,
    /// Lowercase name or alias to index in `records`.
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, trimming names and indexing aliases.
    ///
    /// Duplicate canonical names keep the first position and the last record.
    /// A canonical name always wins over another record's alias.
    pub fn new(records: Vec<IngredientRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(MenuError::catalog_load("<catalog>", "no ingredient records"));
        }

        let mut deduped: Vec<IngredientRecord> = Vec::with_capacity(records.len());
        let mut index = HashMap::new();

        for mut record in records {
            if !record.is_valid() {
                return Err(MenuError::catalog_load(
                    "<catalog>",
                    format!("invalid ingredient record '{}'", record.name),
                ));
            }
            record.name = record.name.trim().to_string();

            match index.get(&record.key()) {
                Some(&i) => {
                    debug!(name = %record.name, "duplicate ingredient, last record wins");
                    deduped[i] = record;
                }
                None => {
                    index.insert(record.key(), deduped.len());
                    deduped.push(record);
                }
            }
        }

        for (i, record) in deduped.iter().enumerate() {
            for alias in &record.aliases {
                let key = normalize_key(alias);
                if let Some(&existing) = index.get(&key) {
                    if existing != i {
                        debug!(
                            alias = %alias,
                            ingredient = %record.name,
                            owner = %deduped[existing].name,
                            "alias already registered, ignoring"
                        );
                    }
                    continue;
                }
                index.insert(key, i);
            }
        }

        Ok(Self {
            records: deduped,
            index,
        })
    }

    /// Resolve a canonical name or alias (case-insensitive).
    pub fn resolve(&self, name: &str) -> Option<&IngredientRecord> {
        self.index
            .get(&normalize_key(name))
            .map(|&i| &self.records[i])
    }

    /// Closest known name or alias to an unresolved name.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let key = normalize_key(name);
        self.index
            .keys()
            .map(|k| (k, jaro_winkler(k, &key)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            // Equal scores go to the alphabetically first key.
            .max_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(k, _)| self.records[self.index[k]].name.as_str())
    }

    /// Records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &IngredientRecord> {
        self.records.iter()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for category in self.records.iter().filter_map(|r| r.category.as_deref()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
