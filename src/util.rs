use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::cases::CaseRecord;

/// Groups the integer digits in threes: `1234567.5` becomes `1,234,567.5`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let text = format!("{}", value.abs());
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 4);
    if value < 0.0 {
        grouped.push('-');
    }
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

pub fn format_amount(record: &CaseRecord) -> String {
    if record.is_na {
        "NA".to_owned()
    } else {
        format!("${}", format_thousands(record.total_amount))
    }
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::test_record as record;

    #[test]
    fn thousands_are_comma_grouped() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1_000.0), "1,000");
        assert_eq!(format_thousands(1_234_567.0), "1,234,567");
        assert_eq!(format_thousands(1_234.5), "1,234.5");
        assert_eq!(format_thousands(-45_000.0), "-45,000");
    }

    #[test]
    fn amount_shows_na_for_unavailable_cases() {
        let mut case = record("1", 2_500_000.0, "Kern", "");
        assert_eq!(format_amount(&case), "$2,500,000");
        case.is_na = true;
        assert_eq!(format_amount(&case), "NA");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let first = stable_pair("case-17");
        assert_eq!(first, stable_pair("case-17"));
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
    }
}
