//! Integration tests for the `overtone` binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn overtone(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_overtone"))
        .args(args)
        .output()
        .expect("failed to run overtone")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is UTF-8")
}

#[test]
fn cli_state_encode_defaults() {
    let output = overtone(&["state", "encode"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "00000000000000000000803f01");
}

#[test]
fn cli_state_decode_round_trip() {
    let encoded = overtone(&["state", "encode", "--second", "0.5", "--no-oversampling"]);
    assert!(encoded.status.success());
    let hex = String::from_utf8_lossy(&encoded.stdout).trim().to_string();

    let decoded = overtone(&["state", "decode", &hex]);
    assert!(decoded.status.success());
    let stdout = String::from_utf8_lossy(&decoded.stdout);
    assert!(stdout.contains("second_harmonic = 0.5"));
    assert!(stdout.contains("oversampling    = false"));
}

#[test]
fn cli_state_decode_rejects_short_record() {
    let output = overtone(&["state", "decode", "0000"]);
    assert!(!output.status.success());
}

#[test]
fn cli_presets_list_and_show() {
    let output = overtone(&["presets", "list", "--factory"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Factory Presets"));
    assert!(stdout.contains("Warm"));

    let output = overtone(&["presets", "show", "tape"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[params]"));
    assert!(stdout.contains("second_order"));
}

#[test]
fn cli_unknown_preset_fails() {
    let output = overtone(&["presets", "show", "no_such_preset"]);
    assert!(!output.status.success());
}

#[test]
fn cli_generate_process_analyze() {
    let dir = TempDir::new().unwrap();
    let tone = dir.path().join("tone.wav");
    let processed = dir.path().join("processed.wav");

    let output = overtone(&["generate", path_str(&tone), "--freq", "1000", "--duration", "1"]);
    assert!(output.status.success(), "generate failed");

    let output = overtone(&[
        "process",
        path_str(&tone),
        path_str(&processed),
        "--second",
        "1",
        "--bit-depth",
        "24",
    ]);
    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (input, _) = overtone_io::read_wav_stereo(&tone).unwrap();
    let (result, spec) = overtone_io::read_wav_stereo(&processed).unwrap();
    assert_eq!(spec.bits_per_sample, 24);
    assert_eq!(result.len(), input.len());
    assert!(result.peak() <= 1.0);

    let output = overtone(&[
        "analyze",
        path_str(&processed),
        "--fundamental",
        "1000",
        "--fft-size",
        "16384",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("H2"));
    assert!(stdout.contains("THD"));
}

#[test]
fn cli_analyze_rejects_short_file() {
    let dir = TempDir::new().unwrap();
    let tone = dir.path().join("short.wav");
    let output = overtone(&["generate", path_str(&tone), "--duration", "0.01"]);
    assert!(output.status.success());

    let output = overtone(&["analyze", path_str(&tone)]);
    assert!(!output.status.success());
}
