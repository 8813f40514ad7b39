// src/extract/mod.rs
pub mod cells;
pub mod raw_table;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::error::{PipelineError, TableParseError};
use cells::Cell;
pub use raw_table::{RawTable, RawTableRow};

static ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("CSS selector for table rows should be valid"));

/// Finds the structured tables on a page and turns each into rows.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    selector: Selector,
}

impl TableExtractor {
    pub fn new(selector: &str) -> Result<Self, PipelineError> {
        Selector::parse(selector)
            .map(|selector| Self { selector })
            .map_err(|e| PipelineError::InvalidSelector {
                selector: selector.to_string(),
                reason: format!("{e:?}"),
            })
    }

    /// Tables in page order. A table that cannot be parsed is skipped with a
    /// warning; no matching tables at all yields an empty vector.
    #[instrument(level = "info", skip_all)]
    pub fn extract(&self, html: &str) -> Vec<RawTable> {
        let doc = Html::parse_document(html);
        let mut tables = Vec::new();
        let mut skipped = 0usize;

        for (index, table) in doc.select(&self.selector).enumerate() {
            match parse_table(index, table) {
                Ok(t) => {
                    debug!(index, columns = ?t.columns, rows = t.len(), "parsed table");
                    tables.push(t);
                }
                Err(e) => {
                    warn!(index, error = %e, "skipping table");
                    skipped += 1;
                }
            }
        }

        info!(tables = tables.len(), skipped, "extracted tables");
        tables
    }
}

pub fn parse_table(index: usize, table: ElementRef<'_>) -> Result<RawTable, TableParseError> {
    let nested = table
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| e.value().name() == "table");
    if nested {
        return Err(TableParseError::NestedTable { index });
    }

    let rows: Vec<Vec<Cell>> = table
        .select(&ROW)
        .map(|tr| {
            tr.children()
                .filter_map(ElementRef::wrap)
                .filter(|c| matches!(c.value().name(), "td" | "th"))
                .map(Cell::from_element)
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    if rows.is_empty() {
        return Err(TableParseError::NoRows { index });
    }

    let header_rows = rows
        .iter()
        .take_while(|r| r.iter().all(|c| c.is_header))
        .count();

    let mut grid = cells::expand_spans(&rows);
    let body = grid.split_off(header_rows);
    // without a header row, columns are labelled by position
    let columns = if header_rows == 0 {
        let width = body.iter().map(Vec::len).max().unwrap_or(0);
        (0..width).map(|i| i.to_string()).collect()
    } else {
        cells::column_labels(&grid)
    };
    let width = columns.len();
    let rows = body
        .into_iter()
        .map(|mut r| {
            r.resize(width, None);
            r
        })
        .collect();

    Ok(RawTable {
        index,
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TableExtractor {
        TableExtractor::new("table.wikitable").unwrap()
    }

    #[test]
    fn extracts_wikitables_in_page_order() {
        let html = r#"<html><body>
            <table class="infobox"><tr><th>Ignored</th></tr><tr><td>x</td></tr></table>
            <table class="wikitable sortable">
              <thead><tr><th>Show</th><th>Date</th><th>Viewers</th></tr></thead>
              <tbody>
                <tr><td><i>Super Bowl LVII</i></td><td>Feb 12, 2023<sup>[1]</sup></td><td>115.1 million</td></tr>
                <tr><td>Other</td><td></td><td>99</td></tr>
              </tbody>
            </table>
            <table class="wikitable"><tr><th>Programme</th></tr><tr><td>Event X</td></tr></table>
        </body></html>"#;

        let tables = extractor().extract(html);
        assert_eq!(tables.len(), 2);

        let first = &tables[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.columns, vec!["Show", "Date", "Viewers"]);
        assert_eq!(
            first.rows[0],
            vec![
                Some("Super Bowl LVII".to_string()),
                Some("Feb 12, 2023[1]".to_string()),
                Some("115.1 million".to_string()),
            ]
        );
        assert_eq!(first.rows[1][1], None);

        assert_eq!(tables[1].index, 1);
        assert_eq!(tables[1].columns, vec!["Programme"]);
    }

    #[test]
    fn row_headers_count_as_cells() {
        let html = r#"<table class="wikitable">
            <tr><th>Rank</th><th>Broadcast</th></tr>
            <tr><th scope="row">1</th><td>Final</td></tr>
        </table>"#;
        let tables = extractor().extract(html);
        assert_eq!(
            tables[0].rows,
            vec![vec![Some("1".to_string()), Some("Final".to_string())]]
        );
    }

    #[test]
    fn unparseable_tables_are_skipped_and_the_rest_kept() {
        let html = r#"<body>
            <table class="wikitable"><tr><th>Outer</th></tr>
              <tr><td><table><tr><td>inner</td></tr></table></td></tr></table>
            <table class="wikitable"></table>
            <table class="wikitable"><tr><th>Show</th><th>Viewers</th></tr>
              <tr><td>Kept</td><td>1</td><td>extra</td></tr>
              <tr><td>Short</td></tr></table>
        </body>"#;

        let tables = extractor().extract(html);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].index, 2);
        assert_eq!(
            tables[0].rows,
            vec![
                vec![Some("Kept".to_string()), Some("1".to_string())],
                vec![Some("Short".to_string()), None],
            ]
        );
    }

    #[test]
    fn headerless_table_gets_positional_labels() {
        let html = r#"<table class="wikitable">
            <tr><td>1</td><td>Final</td><td>30 million</td></tr>
            <tr><td>2</td><td>Replay</td></tr>
        </table>"#;

        let tables = extractor().extract(html);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].columns, vec!["0", "1", "2"]);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[0].rows[1][2], None);
    }

    #[test]
    fn reports_parse_errors_per_table() {
        let doc = Html::parse_document(r#"<table class="wikitable"></table>"#);
        let sel = Selector::parse("table").unwrap();
        let table = doc.select(&sel).next().unwrap();
        assert_eq!(parse_table(7, table), Err(TableParseError::NoRows { index: 7 }));
    }

    #[test]
    fn no_matching_tables_is_empty_not_an_error() {
        assert!(extractor().extract("<p>nothing here</p>").is_empty());
    }

    #[test]
    fn rejects_bad_selector() {
        assert!(matches!(
            TableExtractor::new("table[["),
            Err(PipelineError::InvalidSelector { .. })
        ));
    }
}
