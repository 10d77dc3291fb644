// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `carelog config` and config file handling.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

#[path = "common.rs"]
mod common;

use common::*;

#[test]
fn config_prints_path_and_settings() {
    let home = Home::offline();

    home.carelog()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            home.config_path().display().to_string(),
        ))
        .stdout(predicate::str::contains("url = \"ws://127.0.0.1:1\""))
        .stdout(predicate::str::contains("outbox.jsonl"));
}

#[test]
fn config_flag_overrides_env() {
    let home = Home::offline();
    let other = home.temp.path().join("missing.toml");

    home.carelog()
        .args(["config", "--config"])
        .arg(&other)
        .assert()
        .success()
        .stdout(predicate::str::contains("not found, using defaults"))
        .stdout(predicate::str::contains("ws://127.0.0.1:7890"));
}

#[test]
fn malformed_config_fails_with_hint() {
    let home = Home::offline();
    std::fs::write(home.config_path(), "[remote\n").unwrap();

    home.carelog()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn invalid_url_is_rejected() {
    let home = Home::offline();
    std::fs::write(home.config_path(), "[remote]\nurl = \"http://example.org\"\n").unwrap();

    home.carelog()
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ws://"));
}

#[test]
fn configured_outbox_path_is_used() {
    let home = Home::offline();
    let outbox = home.temp.path().join("elsewhere").join("queue.jsonl");
    std::fs::write(
        home.config_path(),
        format!(
            "outbox = \"{}\"\n[remote]\nurl = \"ws://127.0.0.1:1\"\n",
            outbox.display()
        ),
    )
    .unwrap();

    home.record_drink(75);

    assert!(outbox.exists());
    assert!(home.outbox_lines().is_empty());
}

#[test]
fn version_flag() {
    let home = Home::offline();

    home.carelog()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("carelog "));
}
