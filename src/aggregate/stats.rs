//! Small statistics helpers over raw observations

use crate::trials::UNSOLVED_THRESHOLD;

/// Arithmetic mean, 0 when empty
pub fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation over sqrt(n); `None` below two values
pub fn standard_error(values: &[i64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - avg;
            d * d
        })
        .sum::<f64>()
        / (n - 1.0);
    Some(variance.sqrt() / n.sqrt())
}

/// Percentage (0-100) of observations strictly below the unsolved threshold
pub fn solved_percentage(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let solved = values.iter().filter(|&&v| v < UNSOLVED_THRESHOLD).count();
    100.0 * solved as f64 / values.len() as f64
}

/// Round to the nearest integer, ties to even
pub fn round_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round to one decimal place and return the value with its label.
///
/// Rounds the exact binary value, so 10.35 (stored just below) gives 10.3
/// and 10.65 (stored just above) gives 10.7.
pub fn round_one_decimal(value: f64) -> (f64, String) {
    let label = format!("{:.1}", value);
    let rounded = label.parse().unwrap_or(value);
    (rounded, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10, 20, 30]), 20.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_standard_error() {
        assert_eq!(standard_error(&[5]), None);
        // stdev of [2, 4, 4, 4, 5, 5, 7, 9] with n-1 is ~2.138, / sqrt(8)
        let sem = standard_error(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert!((sem - 0.7559).abs() < 1e-3);
    }

    #[test]
    fn test_solved_percentage() {
        assert!((solved_percentage(&[50, 100, 100]) - 33.333).abs() < 1e-2);
        assert_eq!(solved_percentage(&[99, 1]), 100.0);
        assert_eq!(solved_percentage(&[]), 0.0);
    }

    #[test]
    fn test_rounding_ties_to_even() {
        assert_eq!(round_even(2.5), 2.0);
        assert_eq!(round_even(3.5), 4.0);
        assert_eq!(round_one_decimal(33.333), (33.3, "33.3".to_string()));
    }

    #[test]
    fn test_one_decimal_rounds_stored_value() {
        assert_eq!(round_one_decimal(207.0 / 20.0).1, "10.3");
        assert_eq!(round_one_decimal(213.0 / 20.0).1, "10.7");
        assert_eq!(round_one_decimal(201.0 / 20.0).1, "10.1");
        assert_eq!(round_one_decimal(1.0 / 20.0).1, "0.1");
        assert_eq!(round_one_decimal(213.0 / 20.0).0, 10.7);
    }
}
