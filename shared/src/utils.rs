use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds the exact binary value to two decimal places, half away from zero.
/// Applied only when a figure is emitted, never on intermediate values.
pub fn round2(value: f64) -> f64 {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.mantissa() as f64 / 10f64.powi(rounded.scale() as i32)
        }
        // NaN, infinities and magnitudes beyond Decimal's range pass through.
        None => value,
    }
}

// Indian number formatting: lakh/crore digit grouping ("17,60,160.00") and the ₹ sign.
pub mod indian_format {
    use anyhow::{anyhow, Result};
    use std::str::FromStr;

    /// Parses amounts such as "1,23,456.78", "₹ 4,250" or "180080".
    pub fn parse_amount(s: &str) -> Result<f64> {
        let normalized: String = s
            .trim()
            .trim_start_matches('₹')
            .trim_start_matches("Rs.")
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        if normalized.is_empty() {
            return Err(anyhow!("Failed to parse amount '{}': empty value", s));
        }
        let value = f64::from_str(&normalized).map_err(|e| anyhow!("Failed to parse amount '{}': {}", s, e))?;
        if !value.is_finite() {
            return Err(anyhow!("Failed to parse amount '{}': not a finite number", s));
        }
        Ok(value)
    }

    /// Parses a rate written either as a fraction ("0.75") or a percentage ("75%").
    pub fn parse_fraction(s: &str) -> Result<f64> {
        let trimmed = s.trim();
        match trimmed.strip_suffix('%') {
            Some(percent) => parse_amount(percent).map(|v| v / 100.0),
            None => parse_amount(trimmed),
        }
    }

    /// Groups the integer digits Indian-style: the last three, then pairs.
    fn group_digits(int_part: &str) -> String {
        if int_part.len() <= 3 {
            return int_part.to_string();
        }
        let (head, tail) = int_part.split_at(int_part.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    }

    pub fn format_decimal(value: f64, decimals: usize) -> String {
        let formatted = format!("{:.decimals$}", value.abs(), decimals = decimals);
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (formatted.as_str(), None),
        };
        let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') { "-" } else { "" };
        match frac_part {
            Some(frac) => format!("{}{}.{}", sign, group_digits(int_part), frac),
            None => format!("{}{}", sign, group_digits(int_part)),
        }
    }

    pub fn format_currency(value: f64, decimals: usize) -> String {
        let body = format_decimal(value, decimals);
        match body.strip_prefix('-') {
            Some(abs) => format!("-₹{}", abs),
            None => format!("₹{}", body),
        }
    }

    pub fn format_percentage(value: f64, decimals: usize) -> String {
        format!("{:.decimals$}%", value, decimals = decimals)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(30.85623), 30.86);
        assert_eq!(round2(543120.0), 543120.0);
        assert_eq!(round2(-71.284), -71.28);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn test_round2_uses_the_stored_binary_value() {
        // 1000.005 and 0.015 are stored slightly below the half cent.
        assert_eq!(round2(1000.005), 1000.0);
        assert_eq!(round2(0.015), 0.01);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(-0.125), -0.13);
        assert!(round2(f64::NAN).is_nan());
    }
}
