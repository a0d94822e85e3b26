use std::io::Write;
use std::process::{Command, Output};

fn federc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_federc"))
        .args(args)
        .output()
        .expect("could not run federc")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_expression_mode() {
    let output = federc(&["expr", "-e", "a := b + 1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "(a := (b + 1))\n");
}

#[test]
fn test_expression_trailing_tokens() {
    let output = federc(&["expr", "-e", "a b"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error:<arg>:1: After parsing one expression: EOF not reached!"),
        "{stderr}"
    );
}

#[test]
fn test_no_echo() {
    let output = federc(&["expr", "--no-echo", "-e", "a b"]);
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn test_tokens_mode() {
    let output = federc(&["tokens", "-e", "f(x)"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "identifier\n(\nidentifier\n)\n");

    let output = federc(&["tokens", "--no-echo", "-e", "\"open"]);
    assert!(!output.status.success());
}

#[test]
fn test_program_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("could not create temp file");
    write!(file, "func twice(x : int) : int\n  x * 2\n;\ntwice(4)\n").expect("could not write");
    let path = file.path().to_str().expect("temp path is not utf-8");

    let output = federc(&["program", "--name", "twice.fd", path]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output), "func twice(x : int) : int\ntwice(4)\n");
}

#[test]
fn test_program_with_errors() {
    let mut file = tempfile::NamedTempFile::new().expect("could not create temp file");
    write!(file, "ok := 1\nbad := )\n").expect("could not write");
    let path = file.path().to_str().expect("temp path is not utf-8");

    let output = federc(&["program", "--name", "bad.fd", path]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:bad.fd:2:"), "{stderr}");
}
