//! Export policy and file-set tests.

use cmt_vna::data::save_capture;
use cmt_vna::measurement::{SettingsSnapshot, Sweep, Trace};
use cmt_vna::VnaConfig;
use num_complex::Complex64;
use std::fs;

fn sample_sweep() -> Sweep {
    let s11 = Trace {
        label: "S11".to_string(),
        values: vec![
            Complex64::new(0.9, 0.1),
            Complex64::new(0.5, -0.5),
            Complex64::new(-0.3, 0.4),
            Complex64::new(0.1, 0.0),
        ],
    };
    let s21 = Trace {
        label: "S21".to_string(),
        values: vec![
            Complex64::new(0.01, 0.0),
            Complex64::new(0.02, 0.01),
            Complex64::new(0.05, -0.02),
            Complex64::new(0.1, 0.1),
        ],
    };
    Sweep::assemble(vec![1000.0, 2000.0, 3000.0, 4000.0], vec![s11, s21]).unwrap()
}

fn snapshot() -> SettingsSnapshot {
    SettingsSnapshot::from_config(&VnaConfig::default().with_traces(["S11", "S21"]))
}

#[test]
fn fresh_directory_gets_exactly_six_files() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("capture");

    save_capture(&dir, &sample_sweep(), &snapshot()).unwrap();

    let mut names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "VNAsettings.txt",
            "data.txt",
            "linplot.png",
            "logplot.png",
            "phaseplot.png",
            "phaseplot2.png",
        ]
    );
}

#[test]
fn existing_directory_is_skipped_without_error() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("capture");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("precious.txt"), "do not clobber").unwrap();

    // Must not raise and must write nothing.
    save_capture(&dir, &sample_sweep(), &snapshot()).unwrap();

    let names: Vec<_> = fs::read_dir(&dir).unwrap().collect();
    assert_eq!(names.len(), 1);
    assert_eq!(
        fs::read_to_string(dir.join("precious.txt")).unwrap(),
        "do not clobber"
    );
}

#[test]
fn data_table_has_frequency_and_trace_columns() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("capture");

    save_capture(&dir, &sample_sweep(), &snapshot()).unwrap();

    let table = fs::read_to_string(dir.join("data.txt")).unwrap();
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("Freq (MHz),S11,S21"));
    // One row per frequency point follows the header.
    assert_eq!(lines.count(), 4);
    assert!(table.contains("0.9+0.1j"));
    assert!(table.contains("0.5-0.5j"));
}

#[test]
fn settings_table_lists_session_parameters() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("capture");

    save_capture(&dir, &sample_sweep(), &snapshot()).unwrap();

    let table = fs::read_to_string(dir.join("VNAsettings.txt")).unwrap();
    assert!(table.contains("Num_Traces,2"));
    assert!(table.contains("Freq Start,3 GHz"));
    assert!(table.contains("Freq End,4 GHz"));
    assert!(table.contains("IFBW,1 kHz"));
    assert!(table.contains("Points,3001"));
    assert!(table.contains("Power (dBm),-10"));
}
