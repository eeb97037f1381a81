//! Submission hand-off to the collection API

use crate::correlator_core::CorrelatedEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the collection API filed a submitted event.
#[derive(Debug, Clone)]
pub struct Submission {
    pub location: String,
}

#[derive(Debug)]
pub enum SubmitError {
    Transport(String),
    Api(String),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Transport(msg) => write!(f, "Transport error: {}", msg),
            SubmitError::Api(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl std::error::Error for SubmitError {}

#[async_trait]
pub trait SubmissionClient: Send {
    async fn submit(&mut self, event: &CorrelatedEvent) -> Result<Submission, SubmitError>;
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    indicator: &'a CorrelatedEvent,
}

#[derive(Deserialize)]
struct SubmitResponse {
    location: String,
}

/// HTTP submission client for the collection API.
pub struct HttpSubmissionClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpSubmissionClient {
    pub fn new(api_url: String, token: Option<String>) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn submit(&mut self, event: &CorrelatedEvent) -> Result<Submission, SubmitError> {
        let url = format!(
            "{}/users/{}/feeds/{}/indicators",
            self.api_url.trim_end_matches('/'),
            event.user,
            event.feed
        );

        let mut request = self.client.post(&url).json(&SubmitBody { indicator: event });

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Token token={}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SubmitError::Api(format!(
                "submission rejected: {}",
                response.status()
            )));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::Api(e.to_string()))?;

        Ok(Submission {
            location: body.location,
        })
    }
}
