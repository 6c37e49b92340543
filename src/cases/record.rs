use serde::Deserialize;

/// Columns a snapshot can be filtered, searched or grouped by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    County,
    State,
    CaseType,
    Judge,
    Court,
    StartYear,
    Injury,
    Summary,
    CaseName,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Id,
        Field::County,
        Field::State,
        Field::CaseType,
        Field::Judge,
        Field::Court,
        Field::StartYear,
        Field::Injury,
        Field::Summary,
        Field::CaseName,
    ];

    /// Dataset column name.
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::County => "County",
            Self::State => "State",
            Self::CaseType => "Case_type",
            Self::Judge => "Judge",
            Self::Court => "Court",
            Self::StartYear => "Start_year",
            Self::Injury => "Injury",
            Self::Summary => "Case.summary",
            Self::CaseName => "Case_name",
        }
    }

    /// Resolves a column name. Unknown names yield `None`.
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaseRecord {
    pub id: String,
    pub total_amount: f64,
    pub is_na: bool,
    pub county: String,
    pub state: String,
    pub case_type: String,
    pub judge: String,
    pub court: String,
    pub start_year: String,
    pub injury: String,
    pub summary: String,
    pub case_name: String,
    pub color: String,
}

impl CaseRecord {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::County => &self.county,
            Field::State => &self.state,
            Field::CaseType => &self.case_type,
            Field::Judge => &self.judge,
            Field::Court => &self.court,
            Field::StartYear => &self.start_year,
            Field::Injury => &self.injury,
            Field::Summary => &self.summary,
            Field::CaseName => &self.case_name,
        }
    }

    /// Amount used to size the bubble. NA records weigh zero.
    pub fn weight(&self) -> f64 {
        if self.is_na { 0.0 } else { self.total_amount }
    }
}

/// Cell that may arrive as a JSON number, a JSON bool or text.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawScalar {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Default for RawScalar {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl RawScalar {
    pub fn as_display(&self) -> String {
        match self {
            Self::Flag(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

/// One row as handed over by the dataset parser, before normalization.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawCaseRecord {
    #[serde(rename = "Id")]
    pub id: RawScalar,
    #[serde(rename = "Total_amount")]
    pub total_amount: RawScalar,
    #[serde(default, rename = "Is_na")]
    pub is_na: RawScalar,
    #[serde(default, rename = "County")]
    pub county: String,
    #[serde(default, rename = "State")]
    pub state: String,
    #[serde(default, rename = "Case_type")]
    pub case_type: String,
    #[serde(default, rename = "Judge")]
    pub judge: String,
    #[serde(default, rename = "Court")]
    pub court: String,
    #[serde(default, rename = "Start_year")]
    pub start_year: RawScalar,
    #[serde(default, rename = "Injury")]
    pub injury: String,
    #[serde(default, rename = "Case.summary")]
    pub summary: String,
    #[serde(default, rename = "Case_name")]
    pub case_name: String,
    #[serde(default, rename = "Color")]
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_round_trip_through_lookup() {
        for field in Field::ALL {
            assert_eq!(Field::from_column(field.column()), Some(field));
        }
        assert_eq!(Field::from_column("Total_amount"), None);
        assert_eq!(Field::from_column("county"), None);
    }
}
