//! Integration tests for the tidycsv command line

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn temp_path(tag: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "tidycsv_cli_{}_{}_{}.{}",
        tag,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos(),
        ext
    ))
}

struct Cleanup(PathBuf);
impl Drop for Cleanup {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tidycsv"));
    // Tests must not pick up a user's ~/.config/tidycsv/options.toml.
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("tidycsv_cli_no_config"))
        .env_remove("RUST_LOG");
    cmd
}

fn run_with_stdin(args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

fn run(args: &[&str]) -> (String, String, i32) {
    run_with_stdin(args, "")
}

const MESSY: &str = "name,joined,amount\n  alice ,1/15/1985,$75000\nbob,2023/02/15,$5\n  alice ,1/15/1985,$75000\n\n";

#[test]
fn test_clean_stdin_to_stdout() {
    let (stdout, _, code) = run_with_stdin(&[], MESSY);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "name,joined,amount\nalice,1985-01-15,$75000.00\nbob,2023-02-15,$5.00\n"
    );
}

#[test]
fn test_dash_reads_stdin() {
    let (stdout, _, code) = run_with_stdin(&["-", "--enable", "normalize-case"], MESSY);
    assert_eq!(code, 0);
    assert!(stdout.contains("Alice,1985-01-15"));
}

#[test]
fn test_list_stages() {
    let (stdout, _, code) = run(&["--list-stages"]);
    assert_eq!(code, 0);
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(names.len(), 13);
    assert_eq!(names[0], "trim");
    assert_eq!(names[12], "detect-outliers");
}

#[test]
fn test_unknown_stage_fails() {
    let (_, stderr, code) = run(&["--disable", "bogus"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown stage: bogus"));
}

#[test]
fn test_missing_file_fails() {
    let path = temp_path("missing", "csv");
    let (_, stderr, code) = run(&[path.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn test_empty_input_fails() {
    let (_, stderr, code) = run_with_stdin(&[], "\n  \n");
    assert_eq!(code, 1);
    assert!(stderr.contains("CSV file is empty"));
}

#[test]
fn test_outliers_enabled() {
    let (stdout, _, code) = run_with_stdin(
        &["--enable", "detect-outliers"],
        "v\n10\n10\n10\n10\n1000\n",
    );
    assert_eq!(code, 0);
    assert_eq!(stdout, "v\n10\n10\n10\n10\n1000 [OUTLIER]\n");
}

#[test]
fn test_file_to_file_with_json_report() {
    let input = temp_path("in", "csv");
    let output = temp_path("out", "csv");
    let _c1 = Cleanup(input.clone());
    let _c2 = Cleanup(output.clone());
    std::fs::write(&input, MESSY).unwrap();

    let (stdout, _, code) = run(&[
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--types",
        "--stats",
        "--json",
    ]);
    assert_eq!(code, 0);

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "name,joined,amount\nalice,1985-01-15,$75000.00\nbob,2023-02-15,$5.00\n"
    );

    assert!(stdout.contains("\"types\""));
    assert!(stdout.contains("\"type\": \"currency\""));
    assert!(stdout.contains("\"type\": \"date\""));
    assert!(stdout.contains("\"stats\""));
    assert!(stdout.contains("\"name\": \"amount\""));
}

#[test]
fn test_reports_go_to_stderr_when_csv_on_stdout() {
    let (stdout, stderr, code) = run_with_stdin(&["--insights"], "v\n10\n10\n10\n10\n1000\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "v\n10\n10\n10\n10\n1000\n");
    assert!(stderr.contains("Insights:"));
    assert!(stderr.contains("Outliers detected in \"v\""));
}

#[test]
fn test_config_file_and_overrides() {
    let config = temp_path("config", "toml");
    let _c = Cleanup(config.clone());
    std::fs::write(&config, "normalize-case = true\nremove-duplicates = false\n").unwrap();

    let (stdout, _, code) = run_with_stdin(&["-c", config.to_str().unwrap()], MESSY);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("Alice,")).count(), 2);

    let (stdout, _, _) = run_with_stdin(
        &["-c", config.to_str().unwrap(), "--enable", "remove-duplicates"],
        MESSY,
    );
    assert_eq!(stdout.lines().filter(|l| l.starts_with("Alice,")).count(), 1);
}

#[test]
fn test_bad_config_warns_and_uses_defaults() {
    let config = temp_path("badconfig", "toml");
    let _c = Cleanup(config.clone());
    std::fs::write(&config, "shuffle = true\n").unwrap();

    let (stdout, stderr, code) = run_with_stdin(&["--config", config.to_str().unwrap()], MESSY);
    assert_eq!(code, 0);
    assert!(stderr.contains("Failed to parse"));
    assert!(stdout.starts_with("name,joined,amount\nalice,"));
}

#[test]
fn test_help() {
    let (_, stderr, code) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Usage: tidycsv"));
}
