//! Day-planning service client.
//!
//! `POST {base_url}/plan-day` with the available minutes and task labels;
//! the response is an ordered list of blocks. Failures are returned to the
//! caller and never touch the timer.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::PlannerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub available_minutes: u32,
    pub tasks: Vec<String>,
}

impl PlanRequest {
    /// Validate inputs; an empty request is never sent.
    pub fn new(available_minutes: u32, tasks: Vec<String>) -> Result<Self, PlannerError> {
        if available_minutes == 0 {
            return Err(PlannerError::InvalidRequest(
                "available minutes must be greater than zero".into(),
            ));
        }
        if tasks.is_empty() {
            return Err(PlannerError::InvalidRequest("no tasks to plan".into()));
        }
        Ok(Self {
            available_minutes,
            tasks,
        })
    }
}

/// One block as returned by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedBlock {
    pub task_title: String,
    pub duration_minutes: u32,
}

/// Request timeout used by [`HttpPlanner::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpPlanner {
    client: Client,
    endpoint: Url,
}

impl HttpPlanner {
    /// Build a client for the planner at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, PlannerError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Like [`HttpPlanner::new`], failing any request that takes longer
    /// than `timeout` with [`PlannerError::Request`].
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, PlannerError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: base.join("plan-day")?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn plan_day(&self, request: &PlanRequest) -> Result<Vec<PlannedBlock>, PlannerError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            available_minutes = request.available_minutes,
            tasks = request.tasks.len(),
            "requesting day plan"
        );
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(PlannerError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await?;
        let blocks: Vec<PlannedBlock> =
            serde_json::from_str(&body).map_err(PlannerError::Decode)?;
        tracing::debug!(blocks = blocks.len(), "day plan received");
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_to_base_path() {
        let p = HttpPlanner::new("http://localhost:3000").unwrap();
        assert_eq!(p.endpoint().as_str(), "http://localhost:3000/plan-day");

        let p = HttpPlanner::new("http://example.com/api").unwrap();
        assert_eq!(p.endpoint().as_str(), "http://example.com/api/plan-day");
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            HttpPlanner::new("not a url"),
            Err(PlannerError::InvalidUrl(_))
        ));
    }

    #[test]
    fn request_requires_minutes_and_tasks() {
        assert!(PlanRequest::new(0, vec!["a".into()]).is_err());
        assert!(PlanRequest::new(60, vec![]).is_err());
        assert!(PlanRequest::new(60, vec!["a".into()]).is_ok());
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = PlanRequest::new(90, vec!["Write".into()]).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"availableMinutes": 90, "tasks": ["Write"]}));
    }
}
