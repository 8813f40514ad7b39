// src/process/viewers.rs
use once_cell::sync::Lazy;
use regex::Regex;

use super::trimming::strip_references;

static MILLIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*million").expect("millions regex should be valid")
});
static LONG_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4,}").expect("digit-run regex should be valid"));
static PLAIN_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("number regex should be valid"));

/// Bare numbers up to this are taken to be millions already.
pub const MAX_BARE_MILLIONS: f64 = 100.0;

/// Parse a free-text viewer count into millions. First rule that matches wins:
///
/// 1. `<number> million` is already in millions
/// 2. a run of 4+ digits is a raw head count
/// 3. a bare number is millions when ≤ 100, otherwise a raw head count
pub fn parse_viewers_millions(raw: &str) -> Option<f64> {
    let lowered = raw.to_lowercase();
    let cleaned = strip_references(&lowered).replace(',', "");
    let s = cleaned.trim();

    if let Some(caps) = MILLIONS.captures(s) {
        return caps[1].parse().ok();
    }
    if let Some(m) = LONG_DIGITS.find(s) {
        return m.as_str().parse::<f64>().ok().map(|n| n / 1_000_000.0);
    }
    if PLAIN_NUMBER.is_match(s) {
        let v: f64 = s.parse().ok()?;
        return Some(if v > MAX_BARE_MILLIONS {
            v / 1_000_000.0
        } else {
            v
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let v = actual.unwrap_or_else(|| panic!("expected {expected}, got None"));
        assert!((v - expected).abs() < 1e-9, "expected {expected}, got {v}");
    }

    #[test]
    fn million_suffix_wins() {
        approx(parse_viewers_millions("20.1 million[3]"), 20.1);
        approx(parse_viewers_millions("115.1 Million"), 115.1);
        approx(parse_viewers_millions("1,200 million"), 1200.0);
        approx(parse_viewers_millions("about 98million viewers"), 98.0);
    }

    #[test]
    fn long_digit_runs_are_head_counts() {
        approx(parse_viewers_millions("1234567"), 1.234567);
        approx(parse_viewers_millions("114,442,000[7]"), 114.442);
        approx(parse_viewers_millions("est. 32000000 (UK)"), 32.0);
    }

    #[test]
    fn bare_numbers_split_at_one_hundred() {
        approx(parse_viewers_millions("45"), 45.0);
        approx(parse_viewers_millions("100"), 100.0);
        approx(parse_viewers_millions("450"), 0.00045);
        approx(parse_viewers_millions(" 12.5 "), 12.5);
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse_viewers_millions("invalid"), None);
        assert_eq!(parse_viewers_millions(""), None);
        assert_eq!(parse_viewers_millions("n/a[1]"), None);
        assert_eq!(parse_viewers_millions("12.5 viewers"), None);
    }
}
