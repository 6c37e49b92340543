use std::collections::BTreeMap;
use std::sync::Arc;

use super::record::{CaseRecord, Field};
use super::snapshot::Snapshot;

#[derive(Clone, Debug, PartialEq)]
pub struct CaseGroup {
    pub name: String,
    pub cases: Snapshot,
}

/// Partitions `snapshot` by the exact value of `field`. Groups come back in
/// ascending name order; members keep their snapshot order.
pub fn group_by(snapshot: &Snapshot, field: Field) -> Vec<CaseGroup> {
    let mut buckets: BTreeMap<&str, Vec<Arc<CaseRecord>>> = BTreeMap::new();
    for record in snapshot.records() {
        buckets
            .entry(record.field(field))
            .or_default()
            .push(Arc::clone(record));
    }

    buckets
        .into_iter()
        .map(|(name, members)| CaseGroup {
            name: name.to_owned(),
            cases: Snapshot::from_shared(members),
        })
        .collect()
}

/// Count / Average / Median over raw amounts, the latter two rounded for display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub average: Option<f64>,
    pub median: Option<f64>,
}

impl Summary {
    pub fn of(records: &[Arc<CaseRecord>]) -> Self {
        let mut amounts = records
            .iter()
            .map(|record| record.total_amount)
            .collect::<Vec<_>>();
        let count = amounts.len();
        if count == 0 {
            return Self::default();
        }

        let average = amounts.iter().sum::<f64>() / count as f64;

        amounts.sort_by(f64::total_cmp);
        let middle = count / 2;
        let median = if count % 2 == 0 {
            (amounts[middle - 1] + amounts[middle]) / 2.0
        } else {
            amounts[middle]
        };

        Self {
            count,
            average: Some(average.round()),
            median: Some(median.round()),
        }
    }
}
