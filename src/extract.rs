use serde_json::Value;
use tracing::debug;

use crate::error::GrokError;

pub const FENCE: &str = "```";
pub const RESULT_MARKER: &str = "#=>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPolicy {
    Raw,
    Code,
}

impl ExtractionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Code => "code",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseExtractor {
    policy: ExtractionPolicy,
    fence_tag: String,
}

impl ResponseExtractor {
    pub fn new(policy: ExtractionPolicy, fence_tag: impl Into<String>) -> Self {
        Self {
            policy,
            fence_tag: fence_tag.into(),
        }
    }

    pub fn policy(&self) -> ExtractionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ExtractionPolicy) {
        self.policy = policy;
    }

    pub fn extract(&self, status: u16, body: &str) -> Result<String, GrokError> {
        if status != 200 {
            return Err(GrokError::api(status, body));
        }

        let parsed: Value =
            serde_json::from_str(body).map_err(|err| GrokError::parse(err.to_string()))?;
        let content = message_content(&parsed);
        debug!(
            policy = self.policy.as_str(),
            content_len = content.len(),
            "extracting chat response content"
        );
        Ok(self.post_process(content))
    }

    pub fn post_process(&self, content: &str) -> String {
        match self.policy {
            ExtractionPolicy::Raw => content.to_string(),
            ExtractionPolicy::Code => extract_code(content, &self.fence_tag),
        }
    }
}

pub fn message_content(parsed: &Value) -> &str {
    parsed
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

pub fn extract_code(content: &str, fence_tag: &str) -> String {
    let code = if content.contains(FENCE) {
        content
            .split(FENCE)
            .find_map(|segment| strip_fence_tag(segment, fence_tag))
            .or_else(|| content.split(FENCE).nth(1).map(str::trim))
            .unwrap_or_default()
    } else {
        content.trim()
    };

    strip_result_annotations(code)
}

fn strip_fence_tag<'a>(segment: &'a str, tag: &str) -> Option<&'a str> {
    if tag.is_empty() {
        return None;
    }

    let rest = segment.trim().strip_prefix(tag)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

pub fn strip_result_annotations(code: &str) -> String {
    code.lines()
        .map(|line| {
            line.split(RESULT_MARKER)
                .next()
                .unwrap_or_default()
                .trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
