//! Field normalization applied before rows are keyed
//!
//! Each helper maps a raw DICOM attribute string onto the value stored in the
//! warehouse. None of them fail: malformed input maps to `None` or a sentinel.

/// Standard detector pixel spacings in mm, in tie-breaking order
pub const PIXEL_SPACING_BINS: [f64; 5] = [0.6, 0.65, 0.7, 0.75, 0.8];

/// Stored when no usable contrast agent is recorded
pub const NO_CONTRAST_AGENT: &str = "No contrast agent";

/// Rounds a value to the closest bin
///
/// Ties go to the bin that appears first in `bins`.
pub fn round_to_nearest_bin(value: f64, bins: &[f64]) -> f64 {
    let mut best = match bins.first() {
        Some(first) => *first,
        None => return value,
    };
    let mut best_distance = (best - value).abs();

    for &bin in &bins[1..] {
        let distance = (bin - value).abs();
        if distance < best_distance {
            best = bin;
            best_distance = distance;
        }
    }

    best
}

/// Normalizes the ContrastBolusAgent attribute
///
/// Empty and single-character values mean no agent was given. The length is
/// taken from `raw` as passed in; the trim applies only to the returned value.
/// Values read through the tag helpers arrive already trimmed.
pub fn normalize_contrast_agent(raw: &str) -> String {
    if raw.chars().count() <= 1 {
        return NO_CONTRAST_AGENT.to_string();
    }
    raw.to_lowercase().trim().to_string()
}

/// Splits a DICOM DA value (`YYYYMMDD`) into year and month
///
/// Returns `(None, None)` for values shorter than six characters or with
/// non-numeric year/month digits.
pub fn extract_year_month(date: &str) -> (Option<i64>, Option<i64>) {
    let year = date.get(..4).and_then(|s| s.parse::<i64>().ok());
    let month = date.get(4..6).and_then(|s| s.parse::<i64>().ok());

    match (year, month) {
        (Some(y), Some(m)) => (Some(y), Some(m)),
        _ => (None, None),
    }
}

/// Parses a DICOM AS value (`nnnU`, e.g. `045Y`) into its numeric part
///
/// The unit letter is not interpreted; `045M` parses to 45 just like `045Y`.
pub fn format_age(age: &str) -> Option<i64> {
    if age.len() != 4 {
        log::debug!("Invalid age string: '{}'", age);
        return None;
    }
    age.get(..3).and_then(|digits| digits.parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.63, 0.65)]
    #[case(0.72, 0.7)]
    #[case(0.675, 0.7)]
    #[case(0.5, 0.6)]
    #[case(0.9, 0.8)]
    #[case(0.75, 0.75)]
    fn test_round_to_nearest_bin(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round_to_nearest_bin(value, &PIXEL_SPACING_BINS), expected);
    }

    #[test]
    fn test_round_tie_is_deterministic() {
        let first = round_to_nearest_bin(0.625, &PIXEL_SPACING_BINS);
        assert_eq!(first, 0.6);
        for _ in 0..10 {
            assert_eq!(round_to_nearest_bin(0.625, &PIXEL_SPACING_BINS), first);
        }
    }

    #[test]
    fn test_round_empty_bins() {
        assert_eq!(round_to_nearest_bin(0.63, &[]), 0.63);
    }

    #[rstest]
    #[case("", NO_CONTRAST_AGENT)]
    #[case("X", NO_CONTRAST_AGENT)]
    #[case(" ", NO_CONTRAST_AGENT)]
    #[case("  IOHEXOL ", "iohexol")]
    #[case("Omnipaque 350", "omnipaque 350")]
    fn test_normalize_contrast_agent(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_contrast_agent(raw), expected);
    }

    #[rstest]
    #[case("20230714", Some(2023), Some(7))]
    #[case("202312", Some(2023), Some(12))]
    #[case("2023", None, None)]
    #[case("", None, None)]
    #[case("2023AB01", None, None)]
    fn test_extract_year_month(
        #[case] date: &str,
        #[case] year: Option<i64>,
        #[case] month: Option<i64>,
    ) {
        assert_eq!(extract_year_month(date), (year, month));
    }

    #[rstest]
    #[case("045Y", Some(45))]
    #[case("003M", Some(3))]
    #[case("45Y", None)]
    #[case("", None)]
    #[case("0045Y", None)]
    #[case("A45Y", None)]
    fn test_format_age(#[case] age: &str, #[case] expected: Option<i64>) {
        assert_eq!(format_age(age), expected);
    }
}
