// src/process/mod.rs
pub mod clean;
pub mod date_parser;
pub mod trimming;
pub mod unify;
pub mod viewers;

pub use clean::{clean_record, clean_records, CleanedRecord};
pub use unify::{normalize_row, unify_tables, NormalizedRecord};
