//! Projections of a finished task's raw payload into the shape the web page shows.
//!
//! All extractors are pure. Only presence is checked: a missing nested field
//! becomes an empty string (or an empty object for header tags) instead of
//! an error. A payload with no items yields [`ExtractedResult::NoData`].

use serde::Serialize;
use serde_json::{Map, Value};

pub const NO_DATA_MESSAGE: &str = "No data available";

/// Title, description and header tags of one crawled page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub title: String,
    pub description: String,
    pub htags: Value,
}

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerpRow {
    pub rank_absolute: Option<u64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub domain: String,
    pub title: String,
    pub url: String,
    pub description: String,
}

/// Value returned to the caller once a task completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedResult {
    Page(PageSummary),
    Pages { pages: Vec<PageSummary> },
    Rows { rows: Vec<SerpRow> },
    NoData { no_data: bool, message: String },
}

impl ExtractedResult {
    pub fn no_data() -> Self {
        ExtractedResult::NoData {
            no_data: true,
            message: NO_DATA_MESSAGE.to_string(),
        }
    }
}

fn items(payload: &Value) -> &[Value] {
    payload
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn string_at(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn page_summary(item: &Value) -> PageSummary {
    let meta = item.get("meta").unwrap_or(&Value::Null);
    let htags = meta
        .get("htags")
        .filter(|h| h.is_object())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    PageSummary {
        url: string_at(item, "url"),
        title: string_at(meta, "title"),
        description: string_at(meta, "description"),
        htags,
    }
}

/// First crawled page only.
pub fn single_page(payload: &Value) -> ExtractedResult {
    match items(payload).first() {
        Some(item) => ExtractedResult::Page(page_summary(item)),
        None => ExtractedResult::no_data(),
    }
}

/// Every crawled page.
pub fn crawled_pages(payload: &Value) -> ExtractedResult {
    let items = items(payload);
    if items.is_empty() {
        return ExtractedResult::no_data();
    }
    ExtractedResult::Pages {
        pages: items.iter().map(page_summary).collect(),
    }
}

/// Organic SERP rows.
pub fn serp_rows(payload: &Value) -> ExtractedResult {
    let items = items(payload);
    if items.is_empty() {
        return ExtractedResult::no_data();
    }
    let rows = items
        .iter()
        .map(|item| SerpRow {
            rank_absolute: item.get("rank_absolute").and_then(Value::as_u64),
            kind: string_at(item, "type"),
            domain: string_at(item, "domain"),
            title: string_at(item, "title"),
            url: string_at(item, "url"),
            description: string_at(item, "description"),
        })
        .collect();
    ExtractedResult::Rows { rows }
}
