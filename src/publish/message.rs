// src/publish/message.rs
use serde::Serialize;

use crate::process::CleanedRecord;

/// JSON body of one broker message. Absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedMessage<'a> {
    pub title: Option<&'a str>,
    pub title_clean: Option<&'a str>,
    pub date: Option<&'a str>,
    pub year: Option<i32>,
    pub viewers_millions: Option<f64>,
    pub network: Option<&'a str>,
}

impl<'a> From<&'a CleanedRecord> for PublishedMessage<'a> {
    fn from(r: &'a CleanedRecord) -> Self {
        Self {
            title: Some(&r.title),
            title_clean: Some(&r.title_clean),
            date: r.date.as_deref(),
            year: r.year,
            viewers_millions: Some(r.viewers_millions),
            network: r.network.as_deref(),
        }
    }
}

impl PublishedMessage<'_> {
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
