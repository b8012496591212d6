use std::io::{self, Write};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GrokError;
use crate::extract::{ExtractionPolicy, ResponseExtractor};
use crate::model::ChatRequest;
use crate::model_gateway::ModelGateway;
use crate::prompt::system_prompt;
use crate::providers::xai::HttpGateway;

pub struct Assistant<G = HttpGateway> {
    cfg: Config,
    gateway: G,
    extractor: ResponseExtractor,
}

impl<G> Assistant<G>
where
    G: ModelGateway,
{
    pub fn new(cfg: Config, gateway: G) -> Self {
        let extractor = ResponseExtractor::new(cfg.extraction, cfg.language.clone());
        Self {
            cfg,
            gateway,
            extractor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn policy(&self) -> ExtractionPolicy {
        self.extractor.policy()
    }

    pub fn set_policy(&mut self, policy: ExtractionPolicy) {
        self.extractor.set_policy(policy);
    }

    /// Returns the extracted answer, `None` when there is nothing to show.
    ///
    /// A missing credential is the only error returned; everything else is
    /// reported on the console and turned into `None`.
    pub async fn ask(&self, prompt: &str) -> Result<Option<String>, GrokError> {
        let api_key = self.cfg.require_api_key()?;

        match self.request(api_key, prompt).await {
            Ok(text) if text.trim().is_empty() => {
                debug!("model returned no displayable content");
                Ok(None)
            }
            Ok(text) => Ok(Some(text)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                report(&err);
                Ok(None)
            }
        }
    }

    pub async fn grok(&self, prompt: &str) -> Result<(), GrokError> {
        if let Some(answer) = self.ask(prompt).await? {
            write_answer(&mut io::stdout().lock(), &answer);
        }
        Ok(())
    }

    pub async fn grok_into<W: Write>(&self, prompt: &str, out: &mut W) -> Result<(), GrokError> {
        if let Some(answer) = self.ask(prompt).await? {
            write_answer(out, &answer);
        }
        Ok(())
    }

    async fn request(&self, api_key: &str, prompt: &str) -> Result<String, GrokError> {
        let request = ChatRequest::new(
            self.cfg.model.clone(),
            system_prompt(&self.cfg.host_context, &self.cfg.language),
            prompt,
        );
        let response = self.gateway.send(api_key, &request).await?;
        self.extractor.extract(response.status, &response.body)
    }
}

fn write_answer<W: Write>(out: &mut W, answer: &str) {
    if let Err(err) = writeln!(out, "{answer}") {
        report(&GrokError::unexpected(format!("failed to write answer: {err}")));
    }
}

pub fn report(err: &GrokError) {
    warn!(kind = err.kind().as_str(), error = %err, "grok request failed");
    eprintln!("{err}");
}
