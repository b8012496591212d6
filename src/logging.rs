use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

const DEFAULT_LOG_FILTER: &str = "warn,grok=info";
const DEFAULT_LOG_FILE_PATH: &str = "logs/grok.log";

type InitResult = Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync + 'static>>;

#[must_use = "dropping the guard stops file logging"]
#[derive(Debug, Default)]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogOutput {
    Stderr,
    File,
    Both,
}

impl LogOutput {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::Both => "both",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct LogSettings {
    format: LogFormat,
    output: LogOutput,
    file_path: PathBuf,
}

impl LogSettings {
    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        let format = match normalized(get_var("LOG_FORMAT")).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let output = match normalized(get_var("LOG_OUTPUT")).as_deref() {
            Some("file") => LogOutput::File,
            Some("both") => LogOutput::Both,
            _ => LogOutput::Stderr,
        };
        let file_path = get_var("LOG_FILE_PATH")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH));

        Self {
            format,
            output,
            file_path,
        }
    }
}

fn normalized(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_ascii_lowercase())
}

fn build_file_writer(path: &Path) -> std::io::Result<(non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("grok.log"));

    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_with_writer(format: LogFormat, writer: BoxMakeWriter) -> InitResult {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(writer)
            .try_init()?,
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter())
            .with_writer(writer)
            .try_init()?,
    }
    Ok(None)
}

fn init_file_output(settings: &LogSettings) -> InitResult {
    let include_stderr = settings.output == LogOutput::Both;

    match build_file_writer(&settings.file_path) {
        Ok((file_writer, guard)) => {
            let writer = if include_stderr {
                BoxMakeWriter::new(std::io::stderr.and(file_writer))
            } else {
                BoxMakeWriter::new(file_writer)
            };

            init_with_writer(settings.format, writer)?;
            Ok(Some(guard))
        }
        Err(err) => {
            eprintln!(
                "grok: failed to initialize LOG_OUTPUT={} at '{}': {}; {}",
                settings.output.as_str(),
                settings.file_path.display(),
                err,
                if include_stderr {
                    "using stderr only"
                } else {
                    "using stderr instead"
                }
            );
            init_with_writer(settings.format, BoxMakeWriter::new(std::io::stderr))
        }
    }
}

pub fn init() -> LogGuard {
    let settings = LogSettings::from_env_with(|key| env::var(key).ok());

    let init_result = match settings.output {
        LogOutput::Stderr => init_with_writer(settings.format, BoxMakeWriter::new(std::io::stderr)),
        LogOutput::File | LogOutput::Both => init_file_output(&settings),
    };

    LogGuard {
        _worker: init_result.ok().flatten(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::{DEFAULT_LOG_FILE_PATH, LogFormat, LogOutput, LogSettings};

    fn settings_from_pairs(pairs: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        LogSettings::from_env_with(|key| vars.get(key).map(|value| value.to_string()))
    }

    #[test]
    fn defaults_to_pretty_stderr() {
        let settings = settings_from_pairs(&[]);
        assert_eq!(settings.format, LogFormat::Pretty);
        assert_eq!(settings.output, LogOutput::Stderr);
        assert_eq!(settings.file_path, PathBuf::from(DEFAULT_LOG_FILE_PATH));
    }

    #[test]
    fn reads_json_format_and_outputs_case_insensitively() {
        let settings = settings_from_pairs(&[
            ("LOG_FORMAT", " JSON "),
            ("LOG_OUTPUT", "Both"),
            ("LOG_FILE_PATH", "custom/grok.log"),
        ]);
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.output, LogOutput::Both);
        assert_eq!(settings.file_path, PathBuf::from("custom/grok.log"));

        let settings = settings_from_pairs(&[("LOG_OUTPUT", "file")]);
        assert_eq!(settings.output, LogOutput::File);
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let settings = settings_from_pairs(&[
            ("LOG_FORMAT", "xml"),
            ("LOG_OUTPUT", "syslog"),
            ("LOG_FILE_PATH", "   "),
        ]);
        assert_eq!(settings.format, LogFormat::Pretty);
        assert_eq!(settings.output, LogOutput::Stderr);
        assert_eq!(settings.file_path, PathBuf::from(DEFAULT_LOG_FILE_PATH));
    }
}
