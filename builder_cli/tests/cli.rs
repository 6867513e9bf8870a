//! Runs the vagabond-builder binary against the bundled library

use serde_json::Value;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vagabond-builder"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_arrays_lists_twelve() {
    let out = run(&["arrays"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 12);
    assert!(stdout.starts_with(" 1: [5, 5, 5, 4, 4, 3]"));
}

#[test]
fn test_seeded_random_is_repeatable() {
    let first = run(&["random", "--seed", "9", "--json"]);
    let second = run(&["random", "--seed", "9", "--json"]);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let sheet: Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(sheet["report"]["character_id"], "cli-hero");
    assert_eq!(sheet["character"]["system"]["attributes"]["constructed"], true);
}

#[test]
fn test_build_prints_a_sheet() {
    let out = run(&["build", "--ancestry", "human", "--class", "fighter", "--array", "8"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("Wanderer (Human Fighter, level 1)"));
    assert!(stdout.contains("\nSaves\n"));
}

#[test]
fn test_unknown_ancestry_fails() {
    let out = run(&["build", "--ancestry", "nobody", "--class", "fighter", "--array", "1"]);
    assert!(!out.status.success());
}
