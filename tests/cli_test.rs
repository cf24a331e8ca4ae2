//! Integration tests for the hostcheck binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn hostcheck() -> Command {
    let mut cmd = Command::new(cargo_bin("hostcheck"));
    cmd.env_remove("HOSTCHECK_ARGS_FILE").arg("--no-color");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("host verification"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("hostcheck"));
    cmd.assert().failure().code(2);
    Ok(())
}

#[test]
fn list_shows_types_and_aliases() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("compile-gcc"))
        .stdout(predicate::str::contains("ulimit"))
        .stdout(predicate::str::contains("file-does-not-exist (alias of file-exists)"));
    Ok(())
}

#[test]
fn list_json_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let output = hostcheck().args(["list", "--json"]).output()?;
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert!(names.contains(&"open-files"));
    assert!(names.contains(&"python-module-version"));
    Ok(())
}

#[test]
fn eval_file_exists_passes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = temp.path().join("present");
    fs::write(&path, "")?;

    let mut cmd = hostcheck();
    cmd.args(["eval", "file-exists", "-a"])
        .arg(format!("name={}", path.display()));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("✓ file-exists"));
    Ok(())
}

#[test]
fn eval_quiet_prints_nothing_on_success() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;

    let mut cmd = hostcheck();
    cmd.args(["--quiet", "eval", "file-exists", "-a"])
        .arg(format!("name={}", temp.path().display()));
    cmd.assert().success().stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn eval_failed_assertion_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let missing = temp.path().join("missing");

    let mut cmd = hostcheck();
    cmd.args(["eval", "file-exists", "-a"])
        .arg(format!("name={}", missing.display()));
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("✗ file-exists"))
        .stdout(predicate::str::contains("doesn't exist and should"));
    Ok(())
}

#[test]
fn eval_alias_from_args_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let args = temp.path().join("args.yml");
    fs::write(&args, format!("Name: {}\n", temp.path().display()))?;

    let mut cmd = hostcheck();
    cmd.args(["eval", "file-does-not-exist", "-f"]).arg(&args);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("does exist and shouldn't"));
    Ok(())
}

#[test]
fn eval_reads_args_file_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let args = temp.path().join("args.json");
    fs::write(&args, format!("{{\"name\": {:?}}}", temp.path().display().to_string()))?;

    let mut cmd = hostcheck();
    cmd.env("HOSTCHECK_ARGS_FILE", &args)
        .args(["eval", "file-exists"]);
    cmd.assert().success();
    Ok(())
}

#[test]
fn eval_unknown_type_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.args(["eval", "no-such-check"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no-such-check is not a known check type"));
    Ok(())
}

#[test]
fn eval_missing_argument_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.args(["eval", "ulimit", "-a", "item=nofile"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("missing required argument 'limit'"));
    Ok(())
}

#[test]
fn eval_duplicate_argument_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let args = temp.path().join("args.yml");
    fs::write(&args, "temp-dir: /tmp\ntemp_dir: /var/tmp\nsource: 'int main(void){return 0;}'\n")?;

    let mut cmd = hostcheck();
    cmd.args(["eval", "compile-gcc", "-f"]).arg(&args);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("given more than once"));
    Ok(())
}

#[test]
fn eval_bad_args_file_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.args(["eval", "ulimit", "-f", "/definitely/not/here.yml"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Failed to load check arguments"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn eval_zero_limit_always_passes() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.args([
        "eval", "ulimit", "-a", "item=nofile", "-a", "limit=0", "-a", "type=soft",
    ]);
    cmd.assert().success();
    Ok(())
}

#[cfg(unix)]
#[test]
fn eval_run_script_failure_reports_output() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.args(["eval", "run-script", "-a", "script=echo broken >&2; exit 3"]);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("broken"));
    Ok(())
}

#[test]
fn completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = hostcheck();
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hostcheck"));
    Ok(())
}
