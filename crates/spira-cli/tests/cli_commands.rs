//! End-to-end tests for the `spira` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn spira() -> Command {
    Command::cargo_bin("spira").expect("binary builds")
}

#[test]
fn seed_prints_notable_streams() {
    spira()
        .args(["seed", "12345"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rng10"))
        .stdout(predicate::str::contains("yojimbo"));
}

#[test]
fn roll_previews_values_deterministically() {
    let first = spira().args(["roll", "20", "5", "--seed", "42"]).output().unwrap();
    let second = spira().args(["roll", "20", "5", "--seed", "42"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn roll_rejects_out_of_range_streams() {
    spira()
        .args(["roll", "68", "5", "--seed", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn resolve_rejects_ps2_without_table() {
    spira()
        .args(["resolve", "243", "117", "250", "--platform", "ps2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("seed"));
}

#[test]
fn resolve_rejects_illegal_damage_values() {
    spira()
        .args(["resolve", "1", "2", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("damage value"));
}

#[test]
fn replay_runs_a_script_and_reports() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "# opening").unwrap();
    writeln!(script, "party ta").unwrap();
    writeln!(script, "encounter boss klikk normal").unwrap();
    writeln!(script, "tidus attack klikk").unwrap();
    writeln!(script, "kill klikk tidus").unwrap();
    writeln!(script, "this line is nonsense").unwrap();

    spira()
        .args(["replay", script.path().to_str().unwrap(), "--seed", "777"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kill klikk"))
        .stdout(predicate::str::contains("# !"))
        .stdout(predicate::str::contains("events"));
}
