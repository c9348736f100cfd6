//! Golden session validation
//!
//! Each vector is a raw keystroke stream fed through the byte-stream key
//! source, together with the session options and the expected outcome.

use anyhow::{Result, bail};
use serde::Deserialize;

use passmask::{
    AcceptancePolicy, DEFAULT_MASK, EditBuffer, MaskedInput, ReaderKeySource, RecordingSink,
    SessionConfig,
};

#[derive(Debug, Deserialize)]
struct GoldenSession {
    keys: String,
    mask: char,
    #[serde(default)]
    cancel_on_escape: bool,
    #[serde(default)]
    label: Option<String>,
    policy: String,
    expected_text: String,
    expected_cancelled: bool,
    expected_line: String,
    comment: String,
}

fn load_golden_sessions() -> Result<Vec<GoldenSession>> {
    let json_data = include_str!("../testdata/golden-sessions.json");
    let sessions: Vec<GoldenSession> = serde_json::from_str(json_data)?;
    Ok(sessions)
}

fn policy_named(name: &str) -> Result<AcceptancePolicy> {
    Ok(match name {
        "standard" => AcceptancePolicy::Standard,
        "digits" => AcceptancePolicy::custom(|e| e.ch().is_some_and(|c| c.is_ascii_digit())),
        "reject_all" => AcceptancePolicy::custom(|_| false),
        "accept_all" => AcceptancePolicy::custom(|_| true),
        other => bail!("unknown policy {:?}", other),
    })
}

fn config_for(vector: &GoldenSession) -> Result<SessionConfig> {
    let mut config = SessionConfig::new()
        .mask(vector.mask)
        .cancel_on_escape(vector.cancel_on_escape)
        .policy(policy_named(&vector.policy)?);
    if let Some(label) = &vector.label {
        config = config.label(label.clone());
    }
    Ok(config)
}

#[test]
fn test_golden_sessions() {
    let vectors = load_golden_sessions().expect("failed to load golden sessions");
    println!("Testing {} golden sessions", vectors.len());

    let mut passed = 0;
    let mut failed = 0;

    for (i, vector) in vectors.iter().enumerate() {
        let config = config_for(vector).expect("invalid vector configuration");
        let mut sink = RecordingSink::new();
        let keys = ReaderKeySource::new(vector.keys.as_bytes());

        let result = match MaskedInput::new(config, keys, &mut sink).and_then(MaskedInput::run) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Session {}: FAILED to run - {}", i, e);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
        };

        if result.text() != vector.expected_text || result.is_cancelled() != vector.expected_cancelled
        {
            eprintln!("Session {}: FAILED - result mismatch", i);
            eprintln!("  Comment: {}", vector.comment);
            eprintln!(
                "  Expected: {:?} (cancelled: {})",
                vector.expected_text, vector.expected_cancelled
            );
            eprintln!(
                "  Actual:   {:?} (cancelled: {})",
                result.text(),
                result.is_cancelled()
            );
            failed += 1;
            continue;
        }

        if sink.current_line() != vector.expected_line {
            eprintln!("Session {}: FAILED - rendered line mismatch", i);
            eprintln!("  Comment: {}", vector.comment);
            eprintln!("  Expected: {:?}", vector.expected_line);
            eprintln!("  Actual:   {:?}", sink.current_line());
            failed += 1;
            continue;
        }

        let label = vector.label.as_deref().unwrap_or("");
        let drifted = sink.frames().iter().find(|frame| {
            frame
                .strip_prefix(label)
                .is_none_or(|masks| masks.chars().any(|c| c != vector.mask))
        });
        if let Some(frame) = drifted {
            eprintln!("Session {}: FAILED - frame {:?} is not label + masks", i, frame);
            eprintln!("  Comment: {}", vector.comment);
            failed += 1;
            continue;
        }

        passed += 1;
    }

    println!(
        "Results: {} passed, {} failed out of {} total",
        passed,
        failed,
        passed + failed
    );

    assert_eq!(failed, 0, "Some golden sessions failed validation");
    assert!(passed > 0, "No golden sessions were tested");
}

#[test]
fn test_unknown_policy_name_rejected() {
    assert!(policy_named("nope").is_err());
}

#[test]
fn test_crate_root_exports_defaults_and_buffer() {
    assert_eq!(SessionConfig::new().mask_char(), DEFAULT_MASK);

    let mut buffer = EditBuffer::new();
    for c in "pé1".chars() {
        buffer.push(c);
    }
    assert!(buffer.pop());
    assert_eq!(buffer.as_str(), "pé");
    assert_eq!(buffer.len(), 2);
    buffer.clear();
    assert!(buffer.is_empty());
    assert!(!buffer.pop());
}
