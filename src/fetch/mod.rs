// src/fetch/mod.rs
pub mod page;

pub use page::{build_client, fetch_page};
