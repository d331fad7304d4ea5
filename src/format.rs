// Decimal number patterns such as "#", "0.00" or "#,##0.#"

use crate::error::{ChartError, Result};

/// A compiled decimal pattern.
///
/// `0` is a mandatory digit, `#` an optional one, `,` marks the grouping
/// size of the integer part and `.` separates the fraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    min_integer_digits: usize,
    min_fraction_digits: usize,
    max_fraction_digits: usize,
    grouping: Option<usize>,
}

impl NumberFormat {
    pub fn new(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            ChartError::Configuration(format!("invalid number pattern '{}': {}", pattern, reason))
        };

        if pattern.is_empty() {
            return Err(invalid("pattern is empty"));
        }
        if let Some(c) = pattern.chars().find(|c| !matches!(c, '#' | '0' | ',' | '.')) {
            return Err(invalid(&format!("unexpected character '{}'", c)));
        }

        let (integer, fraction) = match pattern.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (pattern, ""),
        };
        if fraction.contains('.') {
            return Err(invalid("more than one decimal separator"));
        }
        if fraction.contains(',') {
            return Err(invalid("grouping separator in the fraction"));
        }
        if fraction.contains("#0") {
            return Err(invalid("mandatory fraction digit after an optional one"));
        }
        if integer.replace(',', "").contains("0#") {
            return Err(invalid("optional integer digit after a mandatory one"));
        }

        let grouping = match integer.rfind(',') {
            Some(pos) => {
                let size = integer.len() - pos - 1;
                if size == 0 {
                    return Err(invalid("grouping separator at the end of the integer part"));
                }
                Some(size)
            }
            None => None,
        };

        let min_fraction_digits = fraction.matches('0').count();
        Ok(NumberFormat {
            min_integer_digits: integer.matches('0').count(),
            min_fraction_digits,
            max_fraction_digits: min_fraction_digits + fraction.matches('#').count(),
            grouping,
        })
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value < 0.0 { "-∞" } else { "∞" }.to_string();
        }

        let rounded = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (integer, fraction) = match rounded.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (rounded.as_str(), ""),
        };

        let mut fraction = fraction.to_string();
        while fraction.len() > self.min_fraction_digits && fraction.ends_with('0') {
            fraction.pop();
        }

        let digits = integer.trim_start_matches('0');
        let mut integer = "0".repeat(self.min_integer_digits.saturating_sub(digits.len()));
        integer.push_str(digits);
        if let Some(size) = self.grouping {
            integer = group_digits(&integer, size);
        }

        let mut out = String::new();
        let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&integer);
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(&fraction);
        }
        if integer.is_empty() && fraction.is_empty() {
            out.push('0');
        }
        out
    }
}

fn group_digits(digits: &str, size: usize) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(count + count / size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (count - i) % size == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
