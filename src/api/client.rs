use super::messages::{InterviewRecord, SubmitInterviewRequest};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::interview::HistoryEntry;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, warn};

/// Remote collaborator that scores transcripts and lists past interviews
#[async_trait::async_trait]
pub trait InterviewApi: Send + Sync {
    async fn submit_interview(
        &self,
        request: &SubmitInterviewRequest,
    ) -> Result<InterviewRecord, ApiError>;

    async fn interview_history(&self) -> Result<Vec<InterviewRecord>, ApiError>;

    async fn interview_details(&self, id: i64) -> Result<InterviewRecord, ApiError>;
}

/// Fetch history and convert it, skipping records that cannot be shown
pub async fn fetch_history(api: &dyn InterviewApi) -> Result<Vec<HistoryEntry>, ApiError> {
    let records = api.interview_history().await?;
    let total = records.len();

    let entries: Vec<HistoryEntry> = records
        .into_iter()
        .filter_map(|record| match HistoryEntry::try_from(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable history entry: {}", e);
                None
            }
        })
        .collect();

    info!("Loaded {} of {} history entries", entries.len(), total);
    Ok(entries)
}

/// reqwest-backed [`InterviewApi`]
pub struct HttpInterviewApi {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpInterviewApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn submit_interview(
        &self,
        request: &SubmitInterviewRequest,
    ) -> Result<InterviewRecord, ApiError> {
        let url = self.url("interviews/submit");
        info!(
            "Submitting {} interview for {} ({} bytes of transcript)",
            request.interview_type,
            request.job_role,
            request.transcript.len()
        );

        let response = self
            .authorize(self.http.post(&url).json(request))
            .send()
            .await?;

        Self::read(response).await
    }

    async fn interview_history(&self) -> Result<Vec<InterviewRecord>, ApiError> {
        let response = self
            .authorize(self.http.get(self.url("interviews/history")))
            .send()
            .await?;

        Self::read(response).await
    }

    async fn interview_details(&self, id: i64) -> Result<InterviewRecord, ApiError> {
        let response = self
            .authorize(self.http.get(self.url(&format!("interviews/{}", id))))
            .send()
            .await?;

        Self::read(response).await
    }
}
