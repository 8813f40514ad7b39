// src/process/clean.rs
use tracing::{info, instrument};

use super::date_parser::parse_year;
use super::trimming::{collapse_whitespace, strip_references};
use super::unify::NormalizedRecord;
use super::viewers::parse_viewers_millions;

/// A record that made it through cleaning: it always has a title and a
/// viewer figure.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub source_table_index: usize,
    pub title: String,
    pub date: Option<String>,
    pub viewers: Option<String>,
    pub network: Option<String>,
    pub title_clean: String,
    pub viewers_millions: f64,
    pub year: Option<i32>,
}

/// `None` when the title is empty after cleaning or no viewer figure parses.
pub fn clean_record(record: NormalizedRecord) -> Option<CleanedRecord> {
    let strip = |v: Option<String>| v.map(|s| strip_references(&s));

    let title = strip(record.title)
        .map(|t| collapse_whitespace(&t))
        .unwrap_or_default();
    let date = strip(record.date);
    let viewers = strip(record.viewers);
    let network = strip(record.network);

    if title.is_empty() {
        return None;
    }
    let viewers_millions = viewers.as_deref().and_then(parse_viewers_millions)?;
    let year = date.as_deref().and_then(parse_year);

    Some(CleanedRecord {
        source_table_index: record.source_table_index,
        title_clean: title.to_lowercase(),
        title,
        date,
        viewers,
        network,
        viewers_millions,
        year,
    })
}

/// Stable filter-map over the unified records.
#[instrument(level = "info", skip_all, fields(input = records.len()))]
pub fn clean_records(records: Vec<NormalizedRecord>) -> Vec<CleanedRecord> {
    let total = records.len();
    let cleaned: Vec<CleanedRecord> = records.into_iter().filter_map(clean_record).collect();
    info!(kept = cleaned.len(), dropped = total - cleaned.len(), "cleaned records");
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: Option<&str>, date: Option<&str>, viewers: Option<&str>) -> NormalizedRecord {
        NormalizedRecord {
            source_table_index: 1,
            title: title.map(str::to_string),
            date: date.map(str::to_string),
            viewers: viewers.map(str::to_string),
            network: Some("Fox[2]".to_string()),
        }
    }

    #[test]
    fn cleans_every_field() {
        let cleaned = clean_record(record(
            Some("  Super   Bowl\nLVII[1] "),
            Some("Feb 12, 2023[1]"),
            Some("115.1 million[3]"),
        ))
        .unwrap();

        assert_eq!(cleaned.title, "Super Bowl LVII");
        assert_eq!(cleaned.title_clean, "super bowl lvii");
        assert_eq!(cleaned.date.as_deref(), Some("Feb 12, 2023"));
        assert_eq!(cleaned.viewers.as_deref(), Some("115.1 million"));
        assert_eq!(cleaned.network.as_deref(), Some("Fox"));
        assert_eq!(cleaned.viewers_millions, 115.1);
        assert_eq!(cleaned.year, Some(2023));
        assert_eq!(cleaned.source_table_index, 1);
    }

    #[test]
    fn missing_year_is_kept_as_absent() {
        let cleaned = clean_record(record(Some("A"), Some("unknown"), Some("45"))).unwrap();
        assert_eq!(cleaned.year, None);
        let cleaned = clean_record(record(Some("A"), None, Some("45"))).unwrap();
        assert_eq!(cleaned.date, None);
    }

    #[test]
    fn filter_keeps_only_titled_records_with_viewers_in_order() {
        let input = vec![
            record(Some("first"), None, Some("10 million")),
            record(None, None, Some("10 million")),
            record(Some("[1]"), None, Some("10 million")),
            record(Some("no viewers"), None, Some("invalid")),
            record(Some("no viewer column"), None, None),
            record(Some("second"), None, Some("2500000")),
        ];
        let out = clean_records(input);

        let titles: Vec<_> = out.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
        for r in &out {
            assert!(!r.title.is_empty());
            assert!(r.viewers_millions.is_finite());
        }
    }
}
