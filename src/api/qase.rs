//! Qase REST API v1 client

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{ApiError, TestCaseService};
use crate::config::{ApiConfig, PROJECT_ENV, TOKEN_ENV};
use crate::types::{
    CreateSuite, CreateTestCase, CreatedCase, CreatedId, EntityList, QaseResponse, Suite,
};

/// Suites requested per page when listing
const PAGE_SIZE: usize = 100;

/// Longest `Retry-After` the client will wait out
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Qase API client scoped to one project
pub struct QaseClient {
    client: Client,
    base_url: String,
    token: String,
    project_code: String,
    /// Maximum retry attempts for transient failures
    max_retries: usize,
    /// Base delay for exponential backoff
    base_delay: Duration,
}

impl QaseClient {
    /// Create a client for `project_code` authenticating with `token`
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        project_code: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            project_code: project_code.into(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Create from the `[api]` config section
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::not_configured(TOKEN_ENV))?;
        let project_code = config
            .project_code
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::not_configured(PROJECT_ENV))?;

        Ok(Self::new(&config.base_url, token, project_code, config.timeout())?
            .with_retry_config(config.max_retries, Duration::from_millis(500)))
    }

    /// Override retry settings
    pub fn with_retry_config(mut self, max_retries: usize, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    pub fn project_code(&self) -> &str {
        &self.project_code
    }

    /// URL of a project-scoped resource, e.g. `{base}/case/DEMO`
    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource, self.project_code)
    }

    /// Build the retry strategy
    fn retry_strategy(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(Duration::from_secs(10))
            .with_max_times(self.max_retries)
    }

    /// Send an authenticated request and unwrap the response envelope
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header("Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        read_response(response).await
    }

    /// GET with retry on any transient failure
    async fn get<T: DeserializeOwned + Send>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!("Qase GET: {}", url);
        let op = || async move { self.execute(self.client.get(url).query(query)).await };

        op.retry(self.retry_strategy())
            .when(ApiError::is_retryable)
            .notify(|err, dur| {
                warn!("Retrying GET {} after {:?}: {}", url, dur, err);
            })
            .adjust(next_delay)
            .await
    }

    /// POST with retry on rate limiting only.
    ///
    /// A request that timed out or hit a 5xx may still have created the
    /// record, so those are not repeated.
    async fn post<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("Qase POST: {}", url);
        let op = || async move { self.execute(self.client.post(url).json(body)).await };

        op.retry(self.retry_strategy())
            .when(ApiError::is_rate_limited)
            .notify(|err, dur| {
                warn!("Retrying POST {} after {:?}: {}", url, dur, err);
            })
            .adjust(next_delay)
            .await
    }
}

/// Delay before the next attempt.
///
/// A rate-limited response waits at least its `Retry-After`, capped at
/// [`MAX_RETRY_AFTER`]. `None` means the backoff is exhausted.
fn next_delay(err: &ApiError, planned: Option<Duration>) -> Option<Duration> {
    let planned = planned?;
    let requested = err
        .retry_after()
        .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER));

    Some(requested.map_or(planned, |wait| wait.max(planned)))
}

/// Map HTTP status and envelope to a result
async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        return Err(match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            429 => ApiError::rate_limited(retry_after),
            code => ApiError::http(code, error_message(&body)),
        });
    }

    let envelope: QaseResponse<T> = response
        .json()
        .await
        .map_err(|e| ApiError::parse(e.to_string()))?;

    if !envelope.status {
        return Err(ApiError::http(
            status.as_u16(),
            envelope
                .error_message
                .unwrap_or_else(|| "request rejected".to_string()),
        ));
    }

    envelope
        .result
        .ok_or_else(|| ApiError::parse("response has no result"))
}

/// Best human-readable message from an error body
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(rename = "errorMessage")]
        error_message: Option<String>,
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_message.or(b.message))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl TestCaseService for QaseClient {
    #[instrument(skip(self), fields(project = %self.project_code))]
    async fn list_suites(&self) -> Result<Vec<Suite>, ApiError> {
        let url = self.endpoint("suite");
        let mut suites: Vec<Suite> = Vec::new();

        loop {
            let query = [
                ("limit", PAGE_SIZE.to_string()),
                ("offset", suites.len().to_string()),
            ];
            let page: EntityList<Suite> = self.get(&url, &query).await?;
            let fetched = page.entities.len();
            suites.extend(page.entities);

            if fetched == 0 || suites.len() >= page.total as usize {
                break;
            }
        }

        debug!(count = suites.len(), "Fetched suites");
        Ok(suites)
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_suite(&self, request: &CreateSuite) -> Result<Suite, ApiError> {
        let created: CreatedId = self.post(&self.endpoint("suite"), request).await?;
        info!(id = created.id, "Created suite");

        Ok(Suite {
            id: created.id,
            title: request.title.clone(),
            description: request.description.clone(),
            parent_id: None,
            cases_count: 0,
        })
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_case(&self, request: &CreateTestCase) -> Result<CreatedCase, ApiError> {
        let created: CreatedId = self.post(&self.endpoint("case"), request).await?;
        info!(id = created.id, "Created test case");

        Ok(CreatedCase {
            id: created.id,
            title: request.title.clone(),
        })
    }
}
