//! Integration tests for the `castle` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn castle() -> Command {
    Command::cargo_bin("castle").unwrap()
}

// -- rooms --

#[test]
fn rooms_lists_every_room() {
    castle()
        .arg("rooms")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prison Cell"))
        .stdout(predicate::str::contains("Coal Cellar"))
        .stdout(predicate::str::contains("Great Hall"))
        .stdout(predicate::str::contains("Castle Courtyard"))
        .stdout(predicate::str::contains("needs stone_moved"))
        .stdout(predicate::str::contains("4 rooms"));
}

// -- play --

#[test]
fn offline_play_prints_welcome_and_status() {
    castle()
        .args(["play", "--offline"])
        .write_stdin("search the straw bed\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("You stand in a dark stone cell."))
        .stdout(predicate::str::contains("-- You are in the Prison Cell. --"))
        .stdout(predicate::str::contains(
            "You notice a loose stone beneath the straw bed.",
        ))
        .stdout(predicate::str::contains("[Noise this turn: 0]"));
}

#[test]
fn offline_play_local_commands() {
    castle()
        .args(["play", "--offline"])
        .write_stdin("inventory\nhelp\nquit\nlook around\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Inventory: empty]"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("*** GAME OVER ***"))
        .stdout(predicate::str::contains("You take a careful look around.").not());
}

#[test]
fn sentence_starting_with_i_is_an_action() {
    castle()
        .args(["play", "--offline", "--json"])
        .write_stdin("I search the straw bed\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""events":["straw_rummaged"]"#))
        .stdout(predicate::str::contains("[Inventory").not());
}

#[test]
fn offline_play_shouting_hurts() {
    castle()
        .args(["play", "--offline"])
        .write_stdin("shout for the guard\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[HP 80 (-20)"))
        .stdout(predicate::str::contains("[Noise this turn: 3]"));
}

#[test]
fn json_mode_prints_reports() {
    castle()
        .args(["play", "--offline", "--json"])
        .write_stdin("search the straw bed\nlift the loose stone\nstatus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""welcome":"#))
        .stdout(predicate::str::contains(r#""room_id":"cell_01""#))
        .stdout(predicate::str::contains(r#""events":["stone_lifted"]"#))
        .stdout(predicate::str::contains(r#""output":"Room: Prison Cell"#));
}

#[test]
fn json_mode_quit_ends_game() {
    castle()
        .args(["play", "--offline", "--json"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("You give up."));
}

#[test]
fn play_writes_journal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.md");

    castle()
        .args(["play", "--offline", "--journal"])
        .arg(&path)
        .write_stdin("search the straw bed\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Journal written to"));

    let journal = fs::read_to_string(&path).unwrap();
    assert!(journal.starts_with("# Escape the Castle Journal"));
    assert!(journal.contains("## Prison Cell"));
    assert!(journal.contains("> search the straw bed"));
    assert!(journal.contains("**Game over**: gave up"));
}

#[test]
fn unknown_subcommand_fails() {
    castle().arg("dance").assert().failure();
}
