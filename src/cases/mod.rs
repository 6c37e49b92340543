mod filter;
mod group;
mod load;
mod record;
mod snapshot;

pub use filter::{FilterConfig, FilterKind, FilterValues};
pub use group::{CaseGroup, Summary, group_by};
pub use load::load_dataset;
pub use record::{CaseRecord, Field};
pub use snapshot::{DEFAULT_PAGE_SIZE, Snapshot};

#[cfg(test)]
pub(crate) use snapshot::tests::record as test_record;
