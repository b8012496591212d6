use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Network,
    Parse,
    Api,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Network => "network",
            Self::Parse => "parse",
            Self::Api => "api",
            Self::Unexpected => "unexpected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration error",
            Self::Network => "Network error",
            Self::Parse => "Invalid JSON response",
            Self::Api => "API error",
            Self::Unexpected => "Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GrokError {
    kind: ErrorKind,
    message: String,
}

impl GrokError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn api(status: u16, body: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Api, format!("status {}: {}", status, body.as_ref()))
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::Configuration
    }
}
