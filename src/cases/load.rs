use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use super::record::{CaseRecord, RawCaseRecord, RawScalar};
use super::snapshot::Snapshot;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV dataset")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON dataset")]
    Json(#[from] serde_json::Error),
    #[error("row {row} (id {id:?}): cannot coerce {column} value {value:?}")]
    Coerce {
        row: usize,
        id: String,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: duplicate case id {id:?}")]
    DuplicateId { row: usize, id: String },
}

/// Reads the dataset at `path`: JSON when the extension is `.json`, CSV
/// with a header row otherwise.
pub fn load_dataset(path: &Path) -> Result<Snapshot, LoadError> {
    let started = Instant::now();
    info!(path = %path.display(), "loading case dataset");

    let raw = if path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
    {
        read_json(path)?
    } else {
        read_csv(path)?
    };

    let snapshot = load(raw)?;
    info!(
        records = snapshot.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "case dataset ready"
    );
    Ok(snapshot)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_csv(path: &Path) -> Result<Vec<RawCaseRecord>, LoadError> {
    let file = open(path)?;
    parse_csv(file)
}

pub fn parse_csv(reader: impl Read) -> Result<Vec<RawCaseRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|header| header == name);
    let verbatim = [column("Id"), column("Start_year")];

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut raw: RawCaseRecord = record.deserialize(Some(&headers))?;
        // Cell typing would turn "0012" into 12; identifiers keep their text.
        let [id, start_year] = verbatim.map(|index| {
            index
                .and_then(|index| record.get(index))
                .map(|cell| RawScalar::Text(cell.to_owned()))
        });
        if let Some(id) = id {
            raw.id = id;
        }
        if let Some(start_year) = start_year {
            raw.start_year = start_year;
        }
        rows.push(raw);
    }
    Ok(rows)
}

fn read_json(path: &Path) -> Result<Vec<RawCaseRecord>, LoadError> {
    let file = open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

/// Normalizes raw rows into a snapshot. Any row that cannot be coerced fails
/// the whole load.
pub fn load(raw: Vec<RawCaseRecord>) -> Result<Snapshot, LoadError> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut records = Vec::with_capacity(raw.len());
    let mut blank_categorical = 0usize;

    for (row, raw) in raw.into_iter().enumerate() {
        let record = normalize(row, raw)?;
        if !seen.insert(record.id.clone()) {
            return Err(LoadError::DuplicateId { row, id: record.id });
        }
        if [&record.county, &record.state, &record.case_type, &record.judge]
            .iter()
            .any(|value| value.is_empty())
        {
            blank_categorical += 1;
        }
        records.push(record);
    }

    if blank_categorical > 0 {
        warn!(
            records = blank_categorical,
            "cases with empty county/state/case type/judge only match inactive filters"
        );
    }

    Ok(Snapshot::from_records(records))
}

fn normalize(row: usize, raw: RawCaseRecord) -> Result<CaseRecord, LoadError> {
    let id = raw.id.as_display().trim().to_owned();
    if id.is_empty() {
        return Err(LoadError::Coerce {
            row,
            id,
            column: "Id",
            value: String::new(),
        });
    }

    let coerce_error = |column: &'static str, value: &RawScalar| LoadError::Coerce {
        row,
        id: id.clone(),
        column,
        value: value.as_display(),
    };

    let total_amount = coerce_amount(&raw.total_amount)
        .ok_or_else(|| coerce_error("Total_amount", &raw.total_amount))?;
    let is_na = coerce_flag(&raw.is_na).ok_or_else(|| coerce_error("Is_na", &raw.is_na))?;

    Ok(CaseRecord {
        total_amount,
        is_na,
        county: raw.county.trim().to_owned(),
        state: raw.state.trim().to_owned(),
        case_type: raw.case_type.trim().to_owned(),
        judge: raw.judge.trim().to_owned(),
        court: raw.court,
        start_year: raw.start_year.as_display().trim().to_owned(),
        injury: raw.injury,
        summary: raw.summary,
        case_name: raw.case_name,
        color: raw.color.trim().to_owned(),
        id,
    })
}

/// Blank text counts as zero, anything else must parse as a finite number.
fn coerce_amount(value: &RawScalar) -> Option<f64> {
    let number = match value {
        RawScalar::Number(number) => *number,
        RawScalar::Flag(flag) => f64::from(u8::from(*flag)),
        RawScalar::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                0.0
            } else {
                text.parse::<f64>().ok()?
            }
        }
    };
    number.is_finite().then_some(number)
}

fn coerce_flag(value: &RawScalar) -> Option<bool> {
    match value {
        RawScalar::Flag(flag) => Some(*flag),
        RawScalar::Text(text) if text.trim().eq_ignore_ascii_case("true") => Some(true),
        RawScalar::Text(text) if text.trim().eq_ignore_ascii_case("false") => Some(false),
        other => coerce_amount(other).map(|number| number != 0.0),
    }
}
