//! Request and response bodies for the feature endpoints.
//!
//! Request fields are all optional at the serde level so a missing field is
//! reported as a validation error naming it, not as a generic parse failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::task::request::{
    keyword_list, location_code, optional_text, required_text, site_host, site_url,
};
use crate::task::{TaskRequest, ValidationError};

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct BusinessProfileRequest {
    #[serde(rename = "businessName")]
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
}

impl TryFrom<BusinessProfileRequest> for TaskRequest {
    type Error = ValidationError;

    fn try_from(req: BusinessProfileRequest) -> Result<Self, Self::Error> {
        Ok(TaskRequest::BusinessProfile {
            business_name: required_text(req.business_name.as_deref(), "businessName")?,
            category: optional_text(req.category.as_deref()),
            location: optional_text(req.location.as_deref()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BusinessInfoRequest {
    pub keyword: Option<String>,
    pub location_name: Option<String>,
    pub language_name: Option<String>,
}

impl TryFrom<BusinessInfoRequest> for TaskRequest {
    type Error = ValidationError;

    fn try_from(req: BusinessInfoRequest) -> Result<Self, Self::Error> {
        Ok(TaskRequest::BusinessInfo {
            keyword: required_text(req.keyword.as_deref(), "keyword")?,
            location_name: optional_text(req.location_name.as_deref()),
            language_name: optional_text(req.language_name.as_deref()),
        })
    }
}

/// Body shared by the site-level features.
#[derive(Debug, Default, Deserialize)]
pub struct SiteRequest {
    pub site: Option<String>,
}

impl SiteRequest {
    pub fn into_crawl(self) -> Result<TaskRequest, ValidationError> {
        let url = site_url(self.site.as_deref(), "site")?;
        Ok(TaskRequest::OnPageCrawl {
            target: site_host(&url),
        })
    }

    pub fn into_backlinks(self) -> Result<TaskRequest, ValidationError> {
        site_url(self.site.as_deref(), "site")?;
        Ok(TaskRequest::Backlinks {
            target: required_text(self.site.as_deref(), "site")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageAuditRequest {
    pub url: Option<String>,
}

impl TryFrom<PageAuditRequest> for TaskRequest {
    type Error = ValidationError;

    fn try_from(req: PageAuditRequest) -> Result<Self, Self::Error> {
        let url = site_url(req.url.as_deref(), "url")?;
        Ok(TaskRequest::PageAudit {
            target: site_host(&url),
            start_url: url.to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KeywordResearchRequest {
    pub keywords: Option<Value>,
    pub location_code: Option<Value>,
    pub language_name: Option<String>,
}

impl TryFrom<KeywordResearchRequest> for TaskRequest {
    type Error = ValidationError;

    fn try_from(req: KeywordResearchRequest) -> Result<Self, Self::Error> {
        Ok(TaskRequest::KeywordVolume {
            keywords: keyword_list(req.keywords.as_ref())?,
            location_code: location_code(req.location_code.as_ref())?,
            language_name: required_text(req.language_name.as_deref(), "language_name")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CompetitorAnalysisRequest {
    pub keyword: Option<String>,
    pub location_name: Option<String>,
    pub language_name: Option<String>,
}

impl TryFrom<CompetitorAnalysisRequest> for TaskRequest {
    type Error = ValidationError;

    fn try_from(req: CompetitorAnalysisRequest) -> Result<Self, Self::Error> {
        Ok(TaskRequest::CompetitorSerp {
            keyword: required_text(req.keyword.as_deref(), "keyword")?,
            location_name: required_text(req.location_name.as_deref(), "location_name")?,
            language_name: required_text(req.language_name.as_deref(), "language_name")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Returned with 202 when polling ran out before the task finished.
#[derive(Debug, Serialize)]
pub struct InProgressResponse {
    pub status: &'static str,
    pub task_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
