use std::collections::BTreeMap;

use crate::session::result::{ResultIdentifier, TestResult};
use crate::store::schema::HistoryData;

/// Default and maximum number of results kept per identifier.
pub const DEFAULT_HISTORY_LIMIT: usize = 25;

/// Past results grouped by identifier, each group capped at `limit` with
/// the oldest entries evicted first. `limit` is held to
/// `1..=DEFAULT_HISTORY_LIMIT`.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    limit: usize,
    groups: BTreeMap<ResultIdentifier, Vec<TestResult>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, DEFAULT_HISTORY_LIMIT),
            groups: BTreeMap::new(),
        }
    }

    pub fn from_data(limit: usize, data: HistoryData) -> Self {
        let mut store = Self::new(limit);
        for result in data.results {
            store.push(result);
        }
        store
    }

    pub fn to_data(&self) -> HistoryData {
        let mut results: Vec<TestResult> = self.groups.values().flatten().cloned().collect();
        results.sort_by_key(|r| r.timestamp);
        HistoryData {
            results,
            ..HistoryData::default()
        }
    }

    pub fn push(&mut self, result: TestResult) {
        let group = self.groups.entry(result.identifier.clone()).or_default();
        group.push(result);
        if group.len() > self.limit {
            let excess = group.len() - self.limit;
            group.drain(..excess);
        }
    }

    /// Results for `identifier`, oldest first.
    pub fn results_for(&self, identifier: &ResultIdentifier) -> &[TestResult] {
        self.groups.get(identifier).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
