//! Validated task input and its mapping onto upstream task objects.

use serde_json::{json, Map, Value};
use thiserror::Error;
use url::Url;

use super::operation::{
    Operation, BACKLINKS, BUSINESS_INFO, BUSINESS_PROFILE, COMPETITOR_SERP, KEYWORD_VOLUME,
    ON_PAGE_CRAWL, PAGE_AUDIT,
};

/// Pages crawled per on-page analysis task.
const SITE_CRAWL_PAGES: u32 = 10;
/// Backlinks listed per target.
const BACKLINK_LIMIT: u32 = 100;

/// Missing or malformed caller input. Raised before any upstream call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn required(field: &str) -> Self {
        ValidationError(format!("{} is required", field))
    }
}

/// Input for one task submission, built once per incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    BusinessProfile {
        business_name: String,
        category: Option<String>,
        location: Option<String>,
    },
    BusinessInfo {
        keyword: String,
        location_name: Option<String>,
        language_name: Option<String>,
    },
    /// Multi-page crawl of a whole site.
    OnPageCrawl { target: String },
    /// Crawl of one page.
    PageAudit { target: String, start_url: String },
    Backlinks { target: String },
    /// One upstream task per keyword.
    KeywordVolume {
        keywords: Vec<String>,
        location_code: u32,
        language_name: String,
    },
    CompetitorSerp {
        keyword: String,
        location_name: String,
        language_name: String,
    },
}

impl TaskRequest {
    pub fn operation(&self) -> &'static Operation {
        match self {
            TaskRequest::BusinessProfile { .. } => &BUSINESS_PROFILE,
            TaskRequest::BusinessInfo { .. } => &BUSINESS_INFO,
            TaskRequest::OnPageCrawl { .. } => &ON_PAGE_CRAWL,
            TaskRequest::PageAudit { .. } => &PAGE_AUDIT,
            TaskRequest::Backlinks { .. } => &BACKLINKS,
            TaskRequest::KeywordVolume { .. } => &KEYWORD_VOLUME,
            TaskRequest::CompetitorSerp { .. } => &COMPETITOR_SERP,
        }
    }

    /// Task objects sent in the submission body.
    pub fn to_batch(&self) -> Vec<Value> {
        match self {
            TaskRequest::BusinessProfile {
                business_name,
                category,
                location,
            } => {
                let mut task = Map::new();
                task.insert("business_name".into(), json!(business_name));
                if let Some(category) = category {
                    task.insert("category".into(), json!(category));
                }
                if let Some(location) = location {
                    task.insert("location".into(), json!(location));
                }
                vec![Value::Object(task)]
            }
            TaskRequest::BusinessInfo {
                keyword,
                location_name,
                language_name,
            } => {
                let mut task = Map::new();
                task.insert("keyword".into(), json!(keyword));
                if let Some(location_name) = location_name {
                    task.insert("location_name".into(), json!(location_name));
                }
                if let Some(language_name) = language_name {
                    task.insert("language_name".into(), json!(language_name));
                }
                vec![Value::Object(task)]
            }
            TaskRequest::OnPageCrawl { target } => vec![json!({
                "target": target,
                "max_crawl_pages": SITE_CRAWL_PAGES,
            })],
            TaskRequest::PageAudit { target, start_url } => vec![json!({
                "target": target,
                "start_url": start_url,
                "max_crawl_pages": 1,
            })],
            TaskRequest::Backlinks { target } => vec![json!({
                "target": target,
                "limit": BACKLINK_LIMIT,
            })],
            TaskRequest::KeywordVolume {
                keywords,
                location_code,
                language_name,
            } => keywords
                .iter()
                .map(|keyword| {
                    json!({
                        "keyword": keyword,
                        "location_code": location_code,
                        "language_name": language_name,
                    })
                })
                .collect(),
            TaskRequest::CompetitorSerp {
                keyword,
                location_name,
                language_name,
            } => vec![json!({
                "keyword": keyword,
                "location_name": location_name,
                "language_name": language_name,
                "se": "google",
                "se_type": "organic",
                "device": "desktop",
            })],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field validation
// ─────────────────────────────────────────────────────────────────────────────

/// Non-empty string after trimming.
pub(crate) fn required_text(value: Option<&str>, field: &str) -> Result<String, ValidationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ValidationError::required(field))
}

/// Blank optional strings are treated as absent.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A URL or bare domain with an http(s) scheme and a plausible host.
pub(crate) fn site_url(value: Option<&str>, field: &str) -> Result<Url, ValidationError> {
    let raw = required_text(value, field)?;
    let invalid = || ValidationError(format!("{} must be a valid URL or domain", field));

    let candidate = if raw.contains("://") {
        raw
    } else {
        format!("https://{}", raw)
    };
    let url = Url::parse(&candidate).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    let host = url.host_str().ok_or_else(invalid)?;
    if !(host.contains('.') || host == "localhost") {
        return Err(invalid());
    }
    Ok(url)
}

/// Host part of a validated site URL.
pub(crate) fn site_host(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_string()
}

/// Non-empty array of non-empty strings.
pub(crate) fn keyword_list(value: Option<&Value>) -> Result<Vec<String>, ValidationError> {
    let missing = || ValidationError("keywords is required and must be an array".to_string());
    let items = value.and_then(Value::as_array).ok_or_else(missing)?;
    if items.is_empty() {
        return Err(missing());
    }

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    ValidationError("keywords must contain only non-empty strings".to_string())
                })
        })
        .collect()
}

/// Positive integer, given as a JSON number or a numeric string.
pub(crate) fn location_code(value: Option<&Value>) -> Result<u32, ValidationError> {
    let invalid = || ValidationError("location_code must be a positive integer".to_string());
    let code = match value {
        None | Some(Value::Null) => return Err(ValidationError::required("location_code")),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(invalid)?,
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ValidationError::required("location_code"))
        }
        Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };
    match u32::try_from(code) {
        Ok(code) if code > 0 => Ok(code),
        _ => Err(invalid()),
    }
}
