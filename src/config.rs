use std::env;

use crate::error::GrokError;
use crate::extract::ExtractionPolicy;
use crate::prompt::HostContext;

pub const API_KEY_VAR: &str = "GROK_API_KEY";

const DEFAULT_API_URL: &str = "https://api.x.ai/v1/chat/completions";
const DEFAULT_MODEL: &str = "grok-2-latest";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LANGUAGE: &str = "ruby";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub extraction: ExtractionPolicy,
    pub language: String,
    pub host_context: HostContext,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        let api_key = non_blank(get_var(API_KEY_VAR));
        let timeout_secs = parse_timeout_secs(get_var("GROK_TIMEOUT_SECS").as_deref());
        let extraction = parse_extraction(get_var("GROK_EXTRACTION").as_deref());
        let language = non_blank(get_var("GROK_LANGUAGE"))
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let host_context = parse_host_context(
            get_var("GROK_HOST_CONTEXT"),
            get_var("GROK_FRAMEWORK"),
            get_var("GROK_FRAMEWORK_VERSION"),
            get_var("GROK_LIBRARIES"),
        );

        Self {
            api_key,
            api_url: non_blank(get_var("GROK_API_URL"))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: non_blank(get_var("GROK_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs,
            extraction,
            language,
            host_context,
        }
    }

    pub fn require_api_key(&self) -> Result<&str, GrokError> {
        self.api_key.as_deref().ok_or_else(|| {
            GrokError::configuration(format!("{API_KEY_VAR} not found in environment"))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env_with(|_| None)
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

fn parse_extraction(raw: Option<&str>) -> ExtractionPolicy {
    match raw.unwrap_or("code").trim().to_ascii_lowercase().as_str() {
        "raw" => ExtractionPolicy::Raw,
        _ => ExtractionPolicy::Code,
    }
}

fn parse_libraries(raw: Option<&str>) -> Vec<String> {
    let mut libraries: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    libraries.sort();
    libraries
}

fn parse_host_context(
    custom: Option<String>,
    framework: Option<String>,
    framework_version: Option<String>,
    libraries: Option<String>,
) -> HostContext {
    if let Some(custom) = non_blank(custom) {
        return HostContext::Custom(custom);
    }

    match non_blank(framework) {
        Some(name) => HostContext::Framework {
            name,
            version: non_blank(framework_version),
            libraries: parse_libraries(libraries.as_deref()),
        },
        None => HostContext::Standard,
    }
}
