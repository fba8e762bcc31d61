use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Headcount per demographic group (e.g. "male_19_30").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopulationBreakdown {
    counts: BTreeMap<String, u32>,
}

impl PopulationBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, group: &str, count: u32) -> Self {
        self.set(group, count);
        self
    }

    pub fn set(&mut self, group: &str, count: u32) {
        self.counts.insert(group.to_string(), count);
    }

    pub fn get(&self, group: &str) -> u32 {
        self.counts.get(group).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(g, c)| (g.as_str(), *c))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl FromIterator<(String, u32)> for PopulationBreakdown {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}
