use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GrokError;
use crate::model::ChatRequest;
use crate::model_gateway::{ModelGateway, ModelGatewayFuture, RawResponse};
use crate::providers::http_errors::{api_request_error, body_read_error};

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    api_url: String,
    timeout_secs: u64,
}

impl HttpGateway {
    pub fn new(cfg: &Config) -> Result<Self, GrokError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|err| {
                GrokError::unexpected(format!("failed to initialize HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            api_url: cfg.api_url.clone(),
            timeout_secs: cfg.timeout_secs,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl ModelGateway for HttpGateway {
    fn send<'a>(&'a self, api_key: &'a str, request: &'a ChatRequest) -> ModelGatewayFuture<'a> {
        Box::pin(async move {
            debug!(
                api_url = %self.api_url,
                model = %request.model,
                message_count = request.messages.len(),
                "sending chat completion request"
            );

            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(api_key)
                .json(request)
                .send()
                .await
                .map_err(|err| {
                    warn!(
                        api_url = %self.api_url,
                        model = %request.model,
                        error = %err,
                        "chat completion request failed"
                    );
                    api_request_error(err, &self.api_url, self.timeout_secs)
                })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| body_read_error(err, &self.api_url, self.timeout_secs))?;
            debug!(
                api_url = %self.api_url,
                status,
                response_body_len = body.len(),
                "received chat completion response"
            );

            Ok(RawResponse { status, body })
        })
    }
}
