use std::sync::Arc;

use super::record::{CaseRecord, Field};

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Immutable ordered view over the loaded cases plus a "load more" cursor.
///
/// Every narrowing operation returns a new snapshot; records are shared, never
/// copied, and the receiver is left untouched.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    records: Arc<[Arc<CaseRecord>]>,
    cursor: usize,
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.cursor == other.cursor && self.records == other.records
    }
}

impl Snapshot {
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        Self::from_shared(records.into_iter().map(Arc::new).collect())
    }

    pub(super) fn from_shared(records: Vec<Arc<CaseRecord>>) -> Self {
        Self {
            records: records.into(),
            cursor: 0,
        }
    }

    pub fn records(&self) -> &[Arc<CaseRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How far "load more" has advanced.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|record| record.id.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<CaseRecord>> {
        self.records.iter().find(|record| record.id == id)
    }

    fn retain(&self, mut keep: impl FnMut(&CaseRecord) -> bool) -> Self {
        Self::from_shared(
            self.records
                .iter()
                .filter(|record| keep(record))
                .cloned()
                .collect(),
        )
    }

    /// Records whose `field` equals `value` exactly, in their original order.
    pub fn filter_by_exact(&self, field: Field, value: &str) -> Self {
        self.retain(|record| record.field(field) == value)
    }

    /// Like [`Self::filter_by_exact`] but keyed by column name. Unknown
    /// columns never match.
    pub fn filter_by_column(&self, column: &str, value: &str) -> Self {
        match Field::from_column(column) {
            Some(field) => self.filter_by_exact(field, value),
            None => self.retain(|_| false),
        }
    }

    /// Case-insensitive substring search, one narrowing pass per
    /// whitespace-separated token. An empty query returns `self` unchanged.
    pub fn search_by_substring(&self, field: Field, query: &str) -> Self {
        query.split_whitespace().fold(self.clone(), |snapshot, token| {
            let token = token.to_lowercase();
            snapshot.retain(|record| record.field(field).to_lowercase().contains(&token))
        })
    }

    pub fn search_by_column(&self, column: &str, query: &str) -> Self {
        match Field::from_column(column) {
            Some(field) => self.search_by_substring(field, query),
            None if query.split_whitespace().next().is_none() => self.clone(),
            None => self.retain(|_| false),
        }
    }

    /// Everything from the start up to `cursor + page_size`, plus the snapshot
    /// with its cursor advanced by `page_size`.
    pub fn next_page(&self, page_size: usize) -> (&[Arc<CaseRecord>], Snapshot) {
        let to = self.cursor.saturating_add(page_size);
        let items = &self.records[..to.min(self.records.len())];
        let advanced = Self {
            records: Arc::clone(&self.records),
            cursor: to,
        };
        (items, advanced)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.records.len()
    }

    /// Distinct values of `field`, sorted ascending.
    pub fn distinct_values(&self, field: Field) -> Vec<String> {
        let mut values = self
            .records
            .iter()
            .map(|record| record.field(field).to_owned())
            .collect::<Vec<_>>();
        values.sort();
        values.dedup();
        values
    }

    /// Smallest and largest non-zero weight, if any record has one.
    pub fn weight_bounds(&self) -> (Option<f64>, f64) {
        let mut min_non_zero: Option<f64> = None;
        let mut max = 0.0f64;
        for record in self.records.iter() {
            let weight = record.weight();
            max = max.max(weight);
            if weight != 0.0 {
                min_non_zero = Some(min_non_zero.map_or(weight, |current| current.min(weight)));
            }
        }
        (min_non_zero, max)
    }
}
