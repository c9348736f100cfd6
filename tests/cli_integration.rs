//! CLI integration tests
//!
//! Tests the command-line interface end-to-end, feeding keystrokes via stdin.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Get path to the passmask binary
fn passmask_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps/
    path.push("passmask");
    path
}

/// Run passmask with the given keystrokes on stdin
fn run_passmask_with_keys(args: &[&str], keys: &[u8]) -> Result<Output, std::io::Error> {
    let mut child = Command::new(passmask_bin())
        .arg("--keys-stdin")
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        // Ignore BrokenPipe errors - the command may exit before reading
        // all keystrokes (e.g. after Enter).
        let _ = stdin.write_all(keys);
    }

    child.wait_with_output()
}

#[test]
fn test_submit_prints_secret_on_stdout() {
    let result = run_passmask_with_keys(&[], b"hunter2\r").unwrap();

    assert!(
        result.status.success(),
        "passmask failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&result.stdout), "hunter2\n");

    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("*******"), "mask missing from: {:?}", stderr);
    assert!(!stderr.contains("hunter2"), "secret echoed: {:?}", stderr);
}

#[test]
fn test_label_and_custom_mask() {
    let result = run_passmask_with_keys(&["--label", "Login: ", "--mask", "#"], b"pass\x7fS\r")
        .unwrap();

    assert!(result.status.success());
    assert_eq!(String::from_utf8_lossy(&result.stdout), "pasS\n");

    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Login: ####"), "got: {:?}", stderr);
}

#[test]
fn test_escape_cancels_with_exit_status() {
    let result = run_passmask_with_keys(&["--cancel-on-escape"], b"secret\x1b").unwrap();

    assert_eq!(result.status.code(), Some(2));
    assert!(result.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("cancelled"), "got: {:?}", stderr);
}

#[test]
fn test_escape_ignored_by_default() {
    let result = run_passmask_with_keys(&[], b"ab\x1bcd\r").unwrap();

    assert!(result.status.success());
    assert_eq!(String::from_utf8_lossy(&result.stdout), "abcd\n");
}

#[test]
fn test_digits_only() {
    let result = run_passmask_with_keys(&["--digits-only"], b"a1b2\r").unwrap();

    assert!(result.status.success());
    assert_eq!(String::from_utf8_lossy(&result.stdout), "12\n");
}

#[test]
fn test_empty_submit() {
    let result = run_passmask_with_keys(&[], b"\n").unwrap();

    assert!(result.status.success());
    assert_eq!(String::from_utf8_lossy(&result.stdout), "\n");
}

#[test]
fn test_beep_rings_bell() {
    let result = run_passmask_with_keys(&["--beep"], b"ab\r").unwrap();

    assert!(result.status.success());
    let bells = result.stderr.iter().filter(|&&b| b == 0x07).count();
    assert_eq!(bells, 3);
}

#[test]
fn test_stream_without_enter_fails() {
    let result = run_passmask_with_keys(&[], b"abc").unwrap();

    assert!(!result.status.success());
    assert_eq!(result.status.code(), Some(1));
    assert!(result.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("failed to read key"), "got: {:?}", stderr);
    // The underlying cause is printed after the context.
    assert!(
        stderr.contains("failed to read key: key stream ended"),
        "cause missing from: {:?}",
        stderr
    );
}

#[test]
fn test_empty_label_rejected() {
    let result = run_passmask_with_keys(&["--label", ""], b"abc\r").unwrap();

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("label cannot be empty"), "got: {:?}", stderr);
}

#[test]
fn test_verbose_logging_never_shows_secret() {
    let result = run_passmask_with_keys(&["--verbose"], b"topsecret\r").unwrap();

    assert!(result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("[session] submitted with 9 characters"), "got: {:?}", stderr);
    assert!(!stderr.contains("topsecret"), "secret logged: {:?}", stderr);
}

#[test]
fn test_terminal_required_without_keys_stdin() {
    let output = Command::new(passmask_bin())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a terminal"), "got: {:?}", stderr);
}
