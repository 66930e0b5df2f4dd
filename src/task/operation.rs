//! Static descriptors for each supported feature.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use super::extract::{crawled_pages, serp_rows, single_page, ExtractedResult};
use super::poller::PollPolicy;
use crate::provider::StatusEndpoint;

/// When a status entry counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// `entry[field] == sentinel`.
    Progress {
        field: &'static str,
        sentinel: &'static str,
    },
    /// Any result entry at all.
    ResultReady,
}

/// How a submitted task is followed up until its result is ready.
#[derive(Clone, Copy)]
pub struct Tracking {
    pub status: StatusEndpoint,
    pub completion: Completion,
    pub policy: PollPolicy,
    pub extract: fn(&Value) -> ExtractedResult,
}

impl fmt::Debug for Tracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracking")
            .field("status", &self.status)
            .field("completion", &self.completion)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// One feature exposed to the web page.
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    /// Route slug, e.g. `on-page-seo`.
    pub slug: &'static str,
    /// Human-readable name used in logs.
    pub label: &'static str,
    /// Submission path relative to the provider base URL.
    pub submit_path: &'static str,
    /// `None` means the submission response is relayed as-is.
    pub tracking: Option<Tracking>,
}

const CRAWL_FINISHED: Completion = Completion::Progress {
    field: "crawl_progress",
    sentinel: "finished",
};

pub const BUSINESS_PROFILE: Operation = Operation {
    slug: "google-business-profile",
    label: "Google Business Profile Audit",
    submit_path: "business_data/google/my_business_info/task_post",
    tracking: None,
};

pub const BUSINESS_INFO: Operation = Operation {
    slug: "google-business-info",
    label: "Google Business Info Lookup",
    submit_path: "business_data/google/my_business_info/task_post",
    tracking: None,
};

pub const ON_PAGE_CRAWL: Operation = Operation {
    slug: "on-page-seo",
    label: "On-Page SEO Analysis",
    submit_path: "on_page/task_post",
    tracking: Some(Tracking {
        status: StatusEndpoint::Post("on_page/pages"),
        completion: CRAWL_FINISHED,
        policy: PollPolicy {
            interval: Duration::from_secs(5),
            max_attempts: 10,
        },
        extract: crawled_pages,
    }),
};

pub const PAGE_AUDIT: Operation = Operation {
    slug: "page-audit",
    label: "Single Page Audit",
    submit_path: "on_page/task_post",
    tracking: Some(Tracking {
        status: StatusEndpoint::Post("on_page/pages"),
        completion: CRAWL_FINISHED,
        policy: PollPolicy {
            interval: Duration::from_secs(2),
            max_attempts: 5,
        },
        extract: single_page,
    }),
};

pub const BACKLINKS: Operation = Operation {
    slug: "backlink-tracking",
    label: "Backlink Tracking",
    submit_path: "backlinks/links/page_one/task_post",
    tracking: None,
};

pub const KEYWORD_VOLUME: Operation = Operation {
    slug: "keyword-research",
    label: "Keyword Research",
    submit_path: "keywords_data/google/search_volume/task_post",
    tracking: None,
};

pub const COMPETITOR_SERP: Operation = Operation {
    slug: "competitor-analysis",
    label: "Competitor Analysis",
    submit_path: "serp/google/organic/task_post",
    tracking: Some(Tracking {
        status: StatusEndpoint::Get("serp/google/organic/task_get/advanced/{id}"),
        completion: Completion::ResultReady,
        policy: PollPolicy {
            interval: Duration::from_secs(2),
            max_attempts: 5,
        },
        extract: serp_rows,
    }),
};
