// src/extract/cells.rs
use std::collections::HashMap;

use scraper::{node::Element, ElementRef, Node};

use crate::process::trimming::collapse_whitespace;

const MAX_SPAN: usize = 1000;

/// A `td`/`th` before span expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: Option<String>,
    pub is_header: bool,
    pub colspan: usize,
    pub rowspan: usize,
}

impl Cell {
    pub fn from_element(el: ElementRef<'_>) -> Self {
        let value = el.value();
        Self {
            text: cell_text(el),
            is_header: value.name() == "th",
            colspan: span_attr(value, "colspan"),
            rowspan: span_attr(value, "rowspan"),
        }
    }
}

fn span_attr(el: &Element, name: &str) -> usize {
    el.attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(MAX_SPAN))
}

/// Visible text of a cell, whitespace collapsed. Empty text is `None`.
pub fn cell_text(el: ElementRef<'_>) -> Option<String> {
    let mut raw = String::new();
    push_visible_text(el, &mut raw);
    let text = collapse_whitespace(&raw);
    (!text.is_empty()).then_some(text)
}

fn push_visible_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) => {
                match e.name() {
                    "br" => out.push(' '),
                    "script" | "style" => {}
                    _ if is_hidden(e) => {}
                    _ => {
                        if let Some(child_el) = ElementRef::wrap(child) {
                            push_visible_text(child_el, out);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_hidden(e: &Element) -> bool {
    e.attr("style").map_or(false, |style| {
        let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
        compact.to_ascii_lowercase().contains("display:none")
    })
}

/// Lay rows out on a grid: `colspan` repeats a value to the right, `rowspan`
/// carries it down into the same column of the following rows.
pub fn expand_spans(rows: &[Vec<Cell>]) -> Vec<Vec<Option<String>>> {
    // carried[col] = (rows still covered, value)
    let mut carried: Vec<Option<(usize, Option<String>)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out: Vec<Option<String>> = Vec::new();
        let mut cells = row.iter();
        loop {
            let col = out.len();
            if let Some(slot) = carried.get_mut(col) {
                if let Some((remaining, value)) = slot.take() {
                    out.push(value.clone());
                    if remaining > 1 {
                        *slot = Some((remaining - 1, value));
                    }
                    continue;
                }
            }

            let Some(cell) = cells.next() else {
                // a span from above may still cover a column further right
                if carried.iter().skip(col).any(Option::is_some) {
                    out.push(None);
                    continue;
                }
                break;
            };

            for _ in 0..cell.colspan {
                let col = out.len();
                if cell.rowspan > 1 {
                    if carried.len() <= col {
                        carried.resize(col + 1, None);
                    }
                    carried[col] = Some((cell.rowspan - 1, cell.text.clone()));
                }
                out.push(cell.text.clone());
            }
        }
        grid.push(out);
    }

    grid
}

/// Flatten one or more header rows into unique column labels.
pub fn column_labels(header_rows: &[Vec<Option<String>>]) -> Vec<String> {
    let width = header_rows.iter().map(Vec::len).max().unwrap_or(0);
    let labels = (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for row in header_rows {
                if let Some(Some(text)) = row.get(col) {
                    if parts.last() != Some(&text.as_str()) {
                        parts.push(text);
                    }
                }
            }
            if parts.is_empty() {
                format!("Unnamed: {col}")
            } else {
                parts.join(" ")
            }
        })
        .collect();
    dedupe_labels(labels)
}

fn dedupe_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    labels
        .into_iter()
        .map(|label| {
            let count = seen.entry(label.clone()).or_insert(0);
            let out = if *count == 0 {
                label
            } else {
                format!("{label}.{count}")
            };
            *count += 1;
            out
        })
        .collect()
}
