use tracing::debug;

use super::record::Field;
use super::snapshot::Snapshot;

pub const INJURY_PLACEHOLDER: &str = "Search by injury...";

/// How a filter narrows the snapshot and when it is considered active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    /// Drop-down over the distinct values of a field; `head` is the
    /// placeholder entry that means "no constraint".
    Select { head: &'static str },
    /// Free-text substring search; blank input or `placeholder` is inactive.
    Search { placeholder: &'static str },
}

impl FilterKind {
    pub fn is_active(self, value: &str) -> bool {
        match self {
            Self::Select { head } => value != head,
            Self::Search { placeholder } => !value.is_empty() && value != placeholder,
        }
    }

    fn narrow(self, snapshot: &Snapshot, column: &str, value: &str) -> Snapshot {
        match self {
            Self::Select { .. } => snapshot.filter_by_column(column, value),
            Self::Search { .. } => snapshot.search_by_column(column, value),
        }
    }

    /// Value an untouched input holds.
    pub fn idle_value(self) -> &'static str {
        match self {
            Self::Select { head } => head,
            Self::Search { .. } => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    pub label: &'static str,
    /// Dataset column the filter reads. A column the records do not carry
    /// matches nothing once the filter is active.
    pub column: &'static str,
    pub kind: FilterKind,
}

/// Static, ordered filter list. Order is also the narrowing order.
#[derive(Clone, Debug)]
pub struct FilterConfig {
    specs: Vec<FilterSpec>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(vec![
            FilterSpec {
                label: "County",
                column: "County",
                kind: FilterKind::Select { head: "County" },
            },
            FilterSpec {
                label: "State",
                column: "State",
                kind: FilterKind::Select { head: "State" },
            },
            FilterSpec {
                label: "Case type",
                column: "Case_type",
                kind: FilterKind::Select { head: "Case type" },
            },
            FilterSpec {
                label: "Injury",
                column: "Injury",
                kind: FilterKind::Search {
                    placeholder: INJURY_PLACEHOLDER,
                },
            },
        ])
    }
}

impl FilterConfig {
    pub fn new(specs: Vec<FilterSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[FilterSpec] {
        &self.specs
    }

    /// Input values with every filter idle.
    pub fn idle_values(&self) -> FilterValues {
        FilterValues {
            values: self
                .specs
                .iter()
                .map(|spec| spec.kind.idle_value().to_owned())
                .collect(),
        }
    }

    /// Option list for a select filter: distinct sorted values with the head
    /// entry first. A blank value is shown as the head entry instead.
    pub fn options(&self, index: usize, base: &Snapshot) -> Vec<String> {
        let Some(spec) = self.specs.get(index) else {
            return Vec::new();
        };
        let FilterKind::Select { head } = spec.kind else {
            return Vec::new();
        };

        let Some(field) = Field::from_column(spec.column) else {
            return vec![head.to_owned()];
        };

        let mut options = base.distinct_values(field);
        if let Some(blank) = options.iter().position(|value| value.is_empty()) {
            options[blank] = head.to_owned();
        } else {
            options.insert(0, head.to_owned());
        }
        options
    }

    /// AND of every active filter over `base`. Pure in (base, values).
    pub fn apply(&self, base: &Snapshot, values: &FilterValues) -> Snapshot {
        let mut snapshot = base.clone();
        let mut active = Vec::new();

        for (index, spec) in self.specs.iter().enumerate() {
            let value = values.get(index).trim();
            if spec.kind.is_active(value) {
                snapshot = spec.kind.narrow(&snapshot, spec.column, value);
                active.push(spec.label);
            }
        }

        debug!(?active, matched = snapshot.len(), total = base.len(), "filters applied");
        snapshot
    }
}

/// Current input value for each entry of a [`FilterConfig`], by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterValues {
    values: Vec<String>,
}

impl FilterValues {
    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut String> {
        self.values.get_mut(index)
    }

    #[cfg(test)]
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if index >= self.values.len() {
            self.values.resize(index + 1, String::new());
        }
        self.values[index] = value.into();
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::cases::record::CaseRecord;
    use crate::cases::snapshot::tests::record;

    fn case(id: &str, county: &str, state: &str, injury: &str) -> CaseRecord {
        let mut case = record(id, 10.0, county, injury);
        case.state = state.to_owned();
        case
    }

    fn base() -> Snapshot {
        Snapshot::from_records(vec![
            case("1", "Kern", "CA", "Broken arm"),
            case("2", "Kern", "NV", "Arm burn"),
            case("3", "Fresno", "CA", "head trauma"),
            case("4", "", "CA", "broken leg"),
        ])
    }

    #[test]
    fn idle_values_pass_everything_through() {
        let config = FilterConfig::default();
        let result = config.apply(&base(), &config.idle_values());
        assert_eq!(result, base());
    }

    #[test]
    fn active_filters_are_and_combined() {
        let config = FilterConfig::default();
        let mut values = config.idle_values();
        values.set(0, "Kern");
        values.set(3, "arm");
        assert_eq!(config.apply(&base(), &values).ids(), vec!["1", "2"]);

        values.set(1, "CA");
        assert_eq!(config.apply(&base(), &values).ids(), vec!["1"]);
    }

    #[test]
    fn search_placeholder_counts_as_inactive() {
        let config = FilterConfig::default();
        let mut values = config.idle_values();
        values.set(3, INJURY_PLACEHOLDER);
        assert_eq!(config.apply(&base(), &values).len(), 4);

        values.set(3, "   ");
        assert_eq!(config.apply(&base(), &values).len(), 4);
    }

    #[test]
    fn blank_field_values_only_match_the_idle_filter() {
        let config = FilterConfig::default();
        let options = config.options(0, &base());
        assert_eq!(options, vec!["County", "Fresno", "Kern"]);

        let mut values = config.idle_values();
        values.set(0, "Fresno");
        assert_eq!(config.apply(&base(), &values).ids(), vec!["3"]);
    }

    #[test]
    fn head_is_prepended_when_no_blank_values() {
        let config = FilterConfig::default();
        assert_eq!(config.options(1, &base()), vec!["State", "CA", "NV"]);
        assert!(config.options(3, &base()).is_empty());
    }

    #[test]
    fn filter_on_a_missing_column_matches_nothing_once_active() {
        let config = FilterConfig::new(vec![
            FilterSpec {
                label: "Planet",
                column: "Planet",
                kind: FilterKind::Select { head: "Planet" },
            },
            FilterSpec {
                label: "Notes",
                column: "Notes",
                kind: FilterKind::Search { placeholder: "" },
            },
        ]);
        assert_eq!(config.options(0, &base()), vec!["Planet"]);

        let mut values = config.idle_values();
        assert_eq!(config.apply(&base(), &values).len(), 4);
        values.set(1, "arm");
        assert!(config.apply(&base(), &values).is_empty());
        values.set(1, "");
        values.set(0, "Mars");
        assert!(config.apply(&base(), &values).is_empty());
    }

    proptest! {
        #[test]
        fn applying_twice_changes_nothing(
            county in prop_oneof![Just("County"), Just("Kern"), Just("Fresno")],
            state in prop_oneof![Just("State"), Just("CA"), Just("NV")],
            query in "[a-z ]{0,6}",
        ) {
            let config = FilterConfig::default();
            let mut values = config.idle_values();
            values.set(0, county);
            values.set(1, state);
            values.set(3, query);

            let once = config.apply(&base(), &values);
            let twice = config.apply(&once, &values);
            prop_assert_eq!(twice.ids(), once.ids());
            prop_assert_eq!(config.apply(&base(), &values), once);
        }
    }
}
