use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const NOW: &str = "2026-03-31T00:00:00Z";

const SOURCE_CSV: &str = "id,timestamp,amount,category,merchant,account_id
t1,2026-03-01,-5.00,coffee,Blue Bottle,acct_card
t2,2026-03-20T18:30:00Z,-42.10,groceries,Corner Market,acct_card
t3,2026-03-25T09:00:00Z,-18.00,restaurants,Noodle Bar,acct_card
t4,2026-03-28,2500.00,income,Acme Payroll,acct_checking
t5,2025-11-02,-60.00,groceries,Corner Market,acct_card
";

static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

fn unique_test_dir() -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(value) => value.as_nanos(),
        Err(_) => 0,
    };
    let sequence = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!(
        "tallyboard-cli-test-{}-{stamp}-{sequence}",
        std::process::id()
    ));
    path
}

fn tallyboard() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tallyboard"));
    command.env_remove("TALLYBOARD_SEED");
    command.env_remove("TALLYBOARD_FIXTURE_DAYS");
    command.env_remove("TALLYBOARD_UTC_OFFSET_MINUTES");
    command.env_remove("TALLYBOARD_INVALIDATION_QUEUE");
    command.env_remove("TALLYBOARD_LOG");
    command
}

/// Returns (exit code, stdout).
fn run_cli(args: &[&str]) -> (Option<i32>, String) {
    let output = tallyboard().args(args).output();
    assert!(output.is_ok());
    if let Ok(result) = output {
        let stdout = String::from_utf8(result.stdout);
        assert!(stdout.is_ok());
        if let Ok(stdout_text) = stdout {
            return (result.status.code(), stdout_text);
        }
    }
    (None, String::new())
}

fn write_source_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let create_dir = fs::create_dir_all(dir);
    assert!(create_dir.is_ok());

    let source_path = dir.join(name);
    let write = fs::write(&source_path, body);
    assert!(write.is_ok());
    source_path
}

fn parse_json(body: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(body);
    assert!(parsed.is_ok());
    if let Ok(value) = parsed {
        return value;
    }
    Value::Null
}

fn assert_json_error_contract(body: &str, code: &str) -> Value {
    let payload = parse_json(body);
    assert_eq!(payload["ok"], Value::Bool(false));
    assert_eq!(payload["error"]["code"], Value::String(code.to_string()));
    assert!(payload["error"]["message"].is_string());
    assert!(payload["error"]["recovery_steps"].is_array());
    payload
}

fn assert_pipe_close_does_not_panic(args: &[&str], expect_success: bool) {
    let mut producer = tallyboard();
    producer.args(args);
    producer.stdout(Stdio::piped());
    producer.stderr(Stdio::piped());

    let producer_spawn = producer.spawn();
    assert!(producer_spawn.is_ok());
    if let Ok(mut producer_child) = producer_spawn {
        let producer_stdout = producer_child.stdout.take();
        let producer_stderr = producer_child.stderr.take();
        assert!(producer_stdout.is_some());
        assert!(producer_stderr.is_some());

        if let Some(stdout_pipe) = producer_stdout {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            let read_result = reader.read_line(&mut first_line);
            assert!(read_result.is_ok());
            assert!(!first_line.is_empty());
            drop(reader);
        }

        let status = producer_child.wait();
        assert!(status.is_ok());
        if let Ok(exit_status) = status {
            assert_eq!(exit_status.success(), expect_success);
        }

        if let Some(mut stderr_pipe) = producer_stderr {
            let mut stderr_bytes = Vec::new();
            let stderr_read = stderr_pipe.read_to_end(&mut stderr_bytes);
            assert!(stderr_read.is_ok());
            let stderr = String::from_utf8(stderr_bytes);
            assert!(stderr.is_ok());
            if let Ok(stderr_text) = stderr {
                assert!(!stderr_text.contains("Broken pipe"));
                assert!(!stderr_text.contains("panicked"));
            }
        }
    }
}

#[test]
fn root_command_prints_usage() {
    let (code, body) = run_cli(&[]);
    assert_eq!(code, Some(0));
    assert!(body.contains("Usage: tallyboard"));
    assert!(body.contains("grocery-vs-restaurant"));
    assert!(body.contains("invalidate"));
}

#[test]
fn help_and_version_return_success_output() {
    let (help_code, help_body) = run_cli(&["daily", "--help"]);
    assert_eq!(help_code, Some(0));
    assert!(help_body.contains("--filter"));
    assert!(help_body.contains("Unknown filters are treated as `all`"));

    let (version_code, version_body) = run_cli(&["--version"]);
    assert_eq!(version_code, Some(0));
    assert_eq!(version_body.trim(), "tallyboard 0.1.0");
}

#[test]
fn count_json_uses_the_success_envelope() {
    let dir = unique_test_dir();
    let source = write_source_file(&dir, "transactions.csv", SOURCE_CSV);
    let source_arg = source.display().to_string();

    let (code, body) = run_cli(&[
        "count", "--filter", "30d", "--now", NOW, "--source", &source_arg, "--json",
    ]);
    assert_eq!(code, Some(0));
    let payload = parse_json(&body);
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["command"], Value::String("count".to_string()));
    assert!(payload["version"].is_string());
    assert_eq!(payload["data"]["filter"], Value::String("30d".to_string()));
    assert_eq!(payload["data"]["filter_recognized"], Value::Bool(true));
    assert_eq!(
        payload["data"]["range"]["end"],
        Value::String(NOW.to_string())
    );
    assert_eq!(payload["data"]["count"], Value::from(4));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn unknown_filter_falls_back_to_all() {
    let dir = unique_test_dir();
    let source = write_source_file(&dir, "transactions.csv", SOURCE_CSV);
    let source_arg = source.display().to_string();

    let (code, body) = run_cli(&[
        "count", "--filter", "fortnight", "--now", NOW, "--source", &source_arg, "--json",
    ]);
    assert_eq!(code, Some(0));
    let payload = parse_json(&body);
    assert_eq!(payload["data"]["filter"], Value::String("all".to_string()));
    assert_eq!(payload["data"]["filter_recognized"], Value::Bool(false));
    assert!(payload["data"]["range"]["start"].is_null());
    assert_eq!(payload["data"]["count"], Value::from(5));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn grocery_vs_restaurant_text_output_is_a_table() {
    let dir = unique_test_dir();
    let source = write_source_file(&dir, "transactions.csv", SOURCE_CSV);
    let source_arg = source.display().to_string();

    let (code, body) = run_cli(&[
        "grocery-vs-restaurant",
        "--filter",
        "30d",
        "--now",
        NOW,
        "--source",
        &source_arg,
    ]);
    assert_eq!(code, Some(0));
    assert!(body.starts_with("Grocery vs restaurant (30d: 2026-03-01 to 2026-03-31)"));
    assert!(body.contains("Bucket"));
    assert!(body.contains("$42.10"));
    assert!(body.contains("$23.00"));
    assert!(body.contains("Groceries are"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn fixture_bundles_succeed_for_every_command() {
    let commands = [
        "daily",
        "trends",
        "savings",
        "grocery-vs-restaurant",
        "stats",
        "count",
        "analytics",
        "library",
    ];
    for command in commands {
        let (code, body) = run_cli(&[command, "--filter", "90d", "--now", NOW, "--json"]);
        assert_eq!(code, Some(0));
        let payload = parse_json(&body);
        assert_eq!(payload["command"], Value::String(command.to_string()));
        assert_eq!(payload["data"]["generation"], Value::from(1));
    }
}

#[test]
fn invalidate_reports_scope_and_generation() {
    let (code, body) = run_cli(&["invalidate", "--scope", "analytics", "--now", NOW, "--json"]);
    assert_eq!(code, Some(0));
    let payload = parse_json(&body);
    assert_eq!(payload["command"], Value::String("invalidate".to_string()));
    assert_eq!(
        payload["data"]["scope"],
        Value::String("analytics".to_string())
    );
    assert_eq!(payload["data"]["generation"], Value::from(1));
}

#[test]
fn unknown_scope_is_an_invalid_argument() {
    let (code, body) = run_cli(&["invalidate", "--scope", "receipts", "--json"]);
    assert_eq!(code, Some(1));
    let payload = assert_json_error_contract(&body, "invalid_argument");
    assert_eq!(
        payload["data"]["command_hint"],
        Value::String("invalidate".to_string())
    );
}

#[test]
fn reload_from_csv_bumps_the_generation() {
    let dir = unique_test_dir();
    let source = write_source_file(&dir, "transactions.csv", SOURCE_CSV);
    let source_arg = source.display().to_string();

    let (code, body) = run_cli(&["reload", "--source", &source_arg, "--now", NOW, "--json"]);
    assert_eq!(code, Some(0));
    let payload = parse_json(&body);
    assert_eq!(payload["data"]["previous_generation"], Value::from(1));
    assert_eq!(payload["data"]["generation"], Value::from(2));
    assert_eq!(payload["data"]["transaction_count"], Value::from(5));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn missing_source_is_a_store_failure() {
    let dir = unique_test_dir();
    let missing = dir.join("nope.csv").display().to_string();

    let (code, body) = run_cli(&["stats", "--source", &missing, "--json"]);
    assert_eq!(code, Some(2));
    assert_json_error_contract(&body, "store_unavailable");

    let (text_code, text_body) = run_cli(&["stats", "--source", &missing]);
    assert_eq!(text_code, Some(2));
    assert!(text_body.starts_with("tallyboard: store_unavailable"));
    assert!(text_body.contains("Next steps:"));
}

#[test]
fn corrupt_source_rows_are_reported() {
    let dir = unique_test_dir();
    let source = write_source_file(
        &dir,
        "broken.csv",
        "id,timestamp,amount,category,merchant,account_id\nt1,2026-03-01,twelve,coffee,Blue Bottle,acct_card\n",
    );
    let source_arg = source.display().to_string();

    let (code, body) = run_cli(&["daily", "--source", &source_arg, "--json"]);
    assert_eq!(code, Some(2));
    assert_json_error_contract(&body, "store_corrupt");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn parse_errors_use_the_requested_output_mode() {
    let (code, body) = run_cli(&["trends", "--bogus", "--json"]);
    assert_eq!(code, Some(1));
    let payload = assert_json_error_contract(&body, "invalid_argument");
    assert_eq!(
        payload["data"]["command_hint"],
        Value::String("trends".to_string())
    );
    assert!(
        payload["error"]["recovery_steps"][0]
            .as_str()
            .is_some_and(|step| step.contains("tallyboard trends --help"))
    );

    let (text_code, text_body) = run_cli(&["stats", "--now", "yesterday"]);
    assert_eq!(text_code, Some(1));
    assert!(text_body.starts_with("tallyboard: invalid_argument"));
    assert!(!text_body.contains("Usage:"));
}

#[test]
fn success_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["library", "--filter", "all", "--now", NOW], true);
}

#[test]
fn error_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["daily", "--nope"], false);
}
