use std::error::Error as StdError;
use std::io::ErrorKind;

use crate::error::GrokError;

fn error_chain_matches(err: &(dyn StdError + 'static), kind: ErrorKind, needle: &str) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == kind
        {
            return true;
        }

        if source.to_string().to_ascii_lowercase().contains(needle) {
            return true;
        }

        current = source.source();
    }

    false
}

fn error_chain_has_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    error_chain_matches(err, ErrorKind::ConnectionRefused, "connection refused")
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    error_chain_matches(err, ErrorKind::TimedOut, "timed out")
}

pub(crate) fn api_request_error(
    err: reqwest::Error,
    api_url: &str,
    timeout_secs: u64,
) -> GrokError {
    if err.is_timeout() || error_chain_has_timeout(&err) {
        return GrokError::network(format!(
            "request timed out after {}s while calling '{}'. \
             Increase GROK_TIMEOUT_SECS or try again later.",
            timeout_secs, api_url
        ));
    }

    if err.is_connect() {
        if error_chain_has_connection_refused(&err) {
            return GrokError::network(format!(
                "connection refused by '{}'. Check GROK_API_URL.",
                api_url
            ));
        }

        return GrokError::network(format!(
            "failed to connect to '{}'. Check GROK_API_URL and network connectivity.",
            api_url
        ));
    }

    GrokError::network(format!("failed to call '{}': {}", api_url, err))
}

pub(crate) fn body_read_error(
    err: reqwest::Error,
    api_url: &str,
    timeout_secs: u64,
) -> GrokError {
    if err.is_timeout() || error_chain_has_timeout(&err) {
        return api_request_error(err, api_url, timeout_secs);
    }

    GrokError::unexpected(format!(
        "failed to read response body from '{}': {}",
        api_url, err
    ))
}
