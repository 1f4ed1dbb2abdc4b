//! Jobs: proxies the external job-search provider (SerpAPI Google Jobs engine)
//! and projects each result to the fields the dashboard renders.

pub mod handlers;

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

const SERPAPI_SEARCH_URL: &str = "https://serpapi.com/search.json";
pub const DEFAULT_LOCATION: &str = "Remote";

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("Job search API key is not configured")]
    NotConfigured,

    #[error("Job search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job search provider returned status {status}: {message}")]
    Provider { status: u16, message: String },
}

/// One job posting, projected from the provider's result shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobListing {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub description: String,
    pub detected_extensions: Value,
    pub thumbnail: Option<String>,
}

#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    api_key: Option<String>,
}

impl JobSearchClient {
    pub fn new(api_key: Option<String>) -> Result<Self, JobSearchError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, api_key })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Searches postings for `skill` in `location`.
    pub async fn search(
        &self,
        skill: &str,
        location: &str,
    ) -> Result<Vec<JobListing>, JobSearchError> {
        let api_key = self.api_key.as_deref().ok_or(JobSearchError::NotConfigured)?;
        let query = format!("{skill} {location}");

        let response = self
            .client
            .get(SERPAPI_SEARCH_URL)
            .query(&[
                ("engine", "google_jobs"),
                ("q", query.as_str()),
                ("hl", "en"),
                ("api_key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(JobSearchError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            // SerpAPI reports "no results" as an error string on a 200.
            if error.contains("hasn't returned any results") {
                return Ok(Vec::new());
            }
            return Err(JobSearchError::Provider {
                status: status.as_u16(),
                message: error.to_string(),
            });
        }

        let jobs = project_results(&body);
        debug!("Job search for '{query}' returned {} result(s)", jobs.len());
        Ok(jobs)
    }
}

/// Projects every entry of `jobs_results`; a missing array is an empty result.
pub fn project_results(body: &Value) -> Vec<JobListing> {
    body.get("jobs_results")
        .and_then(Value::as_array)
        .map(|results| results.iter().map(project_job).collect())
        .unwrap_or_default()
}

/// Missing strings become empty, missing extensions an empty object.
pub fn project_job(raw: &Value) -> JobListing {
    let text = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    JobListing {
        title: text("title"),
        company_name: text("company_name"),
        location: text("location"),
        description: text("description"),
        detected_extensions: raw
            .get("detected_extensions")
            .filter(|v| v.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())),
        thumbnail: raw
            .get("thumbnail")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
