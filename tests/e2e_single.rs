
use std::fs;
use std::process::Output;

use serde_json::Value;
use tempfile::tempdir;

use support_single::{
    STORED_LOGS, closed_port_url, run_logstress, spawn_log_server, spawn_rejecting_log_server,
};

fn ensure_success(output: &Output) -> Result<(), String> {
    if output.status.success() {
        return Ok(());
    }
    Err(format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    ))
}

fn read_report(path: &std::path::Path) -> Result<Value, String> {
    let contents = fs::read_to_string(path).map_err(|err| format!("read report failed: {}", err))?;
    serde_json::from_str(&contents).map_err(|err| format!("report is not JSON: {}", err))
}

fn expect_u64(report: &Value, key: &str, expected: u64) -> Result<(), String> {
    let value = report.get(key).and_then(Value::as_u64);
    if value != Some(expected) {
        return Err(format!("{} expected {}, got {:?} in {}", key, expected, value, report));
    }
    Ok(())
}

#[test]
fn e2e_insert_json_report() -> Result<(), String> {
    let (url, server) = spawn_log_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_path = dir.path().join("insert.json");

    let output = run_logstress([
        "insert",
        "-u",
        url.as_str(),
        "-n",
        "25",
        "-b",
        "10",
        "-m",
        "4",
        "--output-format",
        "json",
        "-o",
        report_path.to_str().ok_or("Invalid report path")?,
    ])?;
    ensure_success(&output)?;

    let report = read_report(&report_path)?;
    expect_u64(&report, "total_requests", 25)?;
    expect_u64(&report, "successful_requests", 25)?;
    expect_u64(&report, "failed_requests", 0)?;
    if report.get("command").and_then(Value::as_str) != Some("insert") {
        return Err(format!("Unexpected command in {}", report));
    }
    if report.get("latency_seconds").is_none_or(Value::is_null) {
        return Err(format!("Expected latency figures in {}", report));
    }
    if server.requests() != 25 {
        return Err(format!("Server saw {} requests", server.requests()));
    }
    Ok(())
}

#[test]
fn e2e_query_text_summary() -> Result<(), String> {
    let (url, _server) = spawn_log_server()?;

    let output = run_logstress(["query", "-u", url.as_str(), "-r", "2"])?;
    ensure_success(&output)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = [
        "Total Requests: 2".to_owned(),
        "Successful: 2 (100.00%)".to_owned(),
        format!("Fetched Logs: {}", STORED_LOGS.saturating_mul(2)),
    ];
    for line in &expected {
        if !stdout.lines().any(|candidate| candidate == line) {
            return Err(format!("Missing {:?} in stdout:\n{}", line, stdout));
        }
    }
    Ok(())
}

#[test]
fn e2e_config_file_supplies_defaults() -> Result<(), String> {
    let (url, server) = spawn_log_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config_path = dir.path().join("logstress.toml");
    let report_path = dir.path().join("report.json");
    let config = format!(
        "url = \"{}\"\nmax_concurrency = 3\noutput_format = \"json\"\n\n[insert]\nnum_logs = 6\nbatch_size = 4\n",
        url
    );
    fs::write(&config_path, config).map_err(|err| format!("write config failed: {}", err))?;

    let output = run_logstress([
        "insert",
        "-c",
        config_path.to_str().ok_or("Invalid config path")?,
        "-o",
        report_path.to_str().ok_or("Invalid report path")?,
    ])?;
    ensure_success(&output)?;

    let report = read_report(&report_path)?;
    expect_u64(&report, "total_requests", 6)?;
    expect_u64(&report, "max_concurrency", 3)?;
    if server.requests() != 6 {
        return Err(format!("Server saw {} requests", server.requests()));
    }
    Ok(())
}

#[test]
fn e2e_closed_port_fails_every_request() -> Result<(), String> {
    let url = closed_port_url()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_path = dir.path().join("failed.json");

    let output = run_logstress([
        "insert",
        "-u",
        url.as_str(),
        "-n",
        "5",
        "--connect-timeout",
        "500ms",
        "--output-format",
        "json",
        "-o",
        report_path.to_str().ok_or("Invalid report path")?,
    ])?;
    ensure_success(&output)?;

    let report = read_report(&report_path)?;
    expect_u64(&report, "total_requests", 5)?;
    expect_u64(&report, "successful_requests", 0)?;
    expect_u64(&report, "failed_requests", 5)?;
    if report.get("latency_seconds").is_some_and(|value| !value.is_null()) {
        return Err(format!("Expected null latency in {}", report));
    }
    Ok(())
}

#[test]
fn e2e_rejects_unsupported_scheme() -> Result<(), String> {
    let output = run_logstress(["query", "-u", "ftp://127.0.0.1/logs"])?;
    if output.status.success() {
        return Err("Expected a non-zero exit for an ftp endpoint".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_rejected_queries_report_server_error() -> Result<(), String> {
    let (url, _server) = spawn_rejecting_log_server("disk_full")?;

    let output = run_logstress(["query", "-u", url.as_str(), "-r", "2"])?;
    ensure_success(&output)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.lines().any(|line| line == "Failed: 2 (application 2)") {
        return Err(format!("Missing failure counts in stdout:\n{}", stdout));
    }
    let first_failure = stdout
        .lines()
        .find(|line| line.starts_with("First Failure:"))
        .ok_or_else(|| format!("Missing first failure line in stdout:\n{}", stdout))?;
    if !first_failure.contains("disk_full") {
        return Err(format!("Failure line lacks the server error: {}", first_failure));
    }
    if !stdout.contains("First Failure Response: {\"error\":\"disk_full\",\"success\":false}") {
        return Err(format!("Missing server response in stdout:\n{}", stdout));
    }
    Ok(())
}
