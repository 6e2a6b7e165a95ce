//! HTTP transport to the prediction service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{PredictRequest, PredictionResult};
use tracing::{debug, warn};
use url::Url;

use crate::{error::SubmitError, PredictionService};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpPredictionService {
    http: Client,
    endpoint: Url,
}

impl HttpPredictionService {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn transport_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        SubmitError::Transport("request timed out".to_string())
    } else {
        SubmitError::Transport(err.to_string())
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, SubmitError> {
        debug!(url = %self.endpoint, "posting prediction request");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %self.endpoint, "prediction service rejected request");
            return Err(SubmitError::Protocol {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport_error)?;
        PredictionResult::from_json(&body).map_err(|err| SubmitError::Parse(err.to_string()))
    }
}
