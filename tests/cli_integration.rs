use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(suffix: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "grok-cli-{suffix}-{stamp}-{}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("failed to create temp directory");
    dir
}

/// Runs `grok hi` without a credential; the endpoint is a local listener
/// that must never see a connection.
fn run_without_credential(
    workdir: &Path,
    listener: &TcpListener,
    envs: &[(&str, &str)],
) -> Output {
    let addr = listener.local_addr().expect("address should be available");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_grok"));
    cmd.arg("hi")
        .current_dir(workdir)
        .env_remove("GROK_API_KEY")
        .env_remove("LOG_FILE_PATH")
        .env("GROK_API_URL", format!("http://{addr}/v1/chat/completions"))
        .env("RUST_LOG", "grok=info");
    for (key, value) in envs {
        cmd.env(key, value);
    }

    cmd.output().expect("failed to run grok binary")
}

fn local_listener() -> TcpListener {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    listener
        .set_nonblocking(true)
        .expect("listener should switch to non-blocking");
    listener
}

fn assert_no_connection(listener: &TcpListener) {
    match listener.accept() {
        Err(err) if err.kind() == ErrorKind::WouldBlock => {}
        Err(err) => panic!("unexpected accept error: {err}"),
        Ok((_, peer)) => panic!("grok connected to the API from {peer} without a credential"),
    }
}

fn find_rotated_log_file(dir: &Path, base_file_name: &str) -> PathBuf {
    let expected_prefix = format!("{base_file_name}.");
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .expect("failed to read log directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(&expected_prefix))
                .unwrap_or(false)
        })
        .collect();

    matches.sort();
    matches
        .pop()
        .expect("expected a rotated log file to be created")
}

#[test]
fn missing_credential_fails_before_any_network_call() {
    let dir = unique_temp_dir("credential");
    let listener = local_listener();
    let output = run_without_credential(&dir, &listener, &[("LOG_OUTPUT", "stderr")]);

    assert!(
        !output.status.success(),
        "missing credential should fail the command"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("GROK_API_KEY not found in environment"),
        "expected configuration error on stderr, got:\n{stderr}"
    );
    assert!(
        output.stdout.is_empty(),
        "nothing should be printed on stdout"
    );
    assert_no_connection(&listener);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn json_format_emits_json_log_lines_on_stderr() {
    let dir = unique_temp_dir("json");
    let listener = local_listener();
    let output = run_without_credential(
        &dir,
        &listener,
        &[("LOG_OUTPUT", "stderr"), ("LOG_FORMAT", "json")],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let parsed: Vec<Value> = stderr
        .lines()
        .filter(|line| line.trim_start().starts_with('{'))
        .map(|line| serde_json::from_str::<Value>(line).expect("line should be valid JSON"))
        .collect();
    assert!(
        parsed.iter().any(|entry| {
            entry
                .get("fields")
                .and_then(|fields| fields.get("message"))
                .and_then(Value::as_str)
                == Some("loaded runtime configuration")
        }),
        "expected startup log message in JSON output, got stderr:\n{stderr}"
    );
    assert!(
        parsed.iter().any(|entry| {
            entry
                .get("fields")
                .and_then(|fields| fields.get("api_key_present"))
                .and_then(Value::as_bool)
                == Some(false)
        }),
        "expected api_key_present=false in JSON output, got stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn file_output_writes_logs_to_rotated_file() {
    let dir = unique_temp_dir("file");
    let log_path = dir.join("logs").join("grok.log");
    let listener = local_listener();
    let output = run_without_credential(
        &dir,
        &listener,
        &[
            ("LOG_OUTPUT", "file"),
            ("LOG_FILE_PATH", log_path.to_str().expect("utf8 path")),
        ],
    );
    assert!(!output.status.success());

    let rotated = find_rotated_log_file(&dir.join("logs"), "grok.log");
    let file_contents = fs::read_to_string(&rotated).expect("failed to read rotated log file");
    assert!(
        file_contents.contains("loaded runtime configuration"),
        "expected startup log message in file, got:\n{file_contents}"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("loaded runtime configuration"),
        "did not expect logs on stderr for file-only mode:\n{stderr}"
    );
    assert!(
        stderr.contains("GROK_API_KEY"),
        "expected command error output on stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_file_path_falls_back_to_stderr_logging() {
    let dir = unique_temp_dir("fallback");
    let blocking_file = dir.join("not-a-directory");
    fs::write(&blocking_file, "block").expect("failed to create blocking file");
    let log_path = blocking_file.join("grok.log");
    let listener = local_listener();

    let output = run_without_credential(
        &dir,
        &listener,
        &[
            ("LOG_OUTPUT", "file"),
            ("LOG_FILE_PATH", log_path.to_str().expect("utf8 path")),
        ],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to initialize LOG_OUTPUT=file"),
        "expected fallback warning, got:\n{stderr}"
    );
    assert!(
        stderr.contains("using stderr instead"),
        "expected stderr fallback message, got:\n{stderr}"
    );
    assert!(
        stderr.contains("loaded runtime configuration"),
        "expected logs to continue on stderr after fallback, got:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}
