// src/process/date_parser.rs
use once_cell::sync::Lazy;
use regex::Regex;

use super::trimming::strip_references;

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digit-run regex should be valid"));

/// Year from a free-text date: the first run of exactly four digits.
pub fn parse_year(raw: &str) -> Option<i32> {
    let s = strip_references(raw);
    DIGIT_RUN
        .find_iter(&s)
        .find(|m| m.as_str().len() == 4)
        .and_then(|m| m.as_str().parse().ok())
}
