// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `carelog sync`, `status` and `pending` with queued events.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

#[path = "common.rs"]
mod common;

use common::*;

#[test]
fn sync_with_empty_outbox() {
    let home = Home::offline();

    home.carelog()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to sync"));
}

#[test]
fn sync_offline_keeps_entries() {
    let home = Home::offline();
    home.record_drink(100);
    home.record_drink(200);

    home.carelog()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 0 events, 2 still queued"));

    assert_eq!(home.outbox_lines().len(), 2);
}

#[test]
fn sync_json_reports_counts() {
    let home = Home::offline();
    home.record_drink(100);

    let output = home.carelog().args(["sync", "-o", "json"]).output().unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["success_count"], 0);
    assert_eq!(result["remaining_count"], 1);
}

#[test]
fn status_reports_queue_and_unreachable_store() {
    let home = Home::offline();
    home.record_drink(100);

    home.carelog()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("ws://127.0.0.1:1 (unreachable)"))
        .stdout(predicate::str::contains("Queued: 1 event"));
}

#[test]
fn pending_lists_queued_events() {
    let home = Home::offline();

    home.carelog()
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("No queued events"));

    home.record_drink(150);

    home.carelog()
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("[drink]"))
        .stdout(predicate::str::contains("150 ml"));
}

#[test]
fn pending_json_matches_outbox() {
    let home = Home::offline();
    home.record_drink(150);

    let output = home.carelog().args(["pending", "-o", "json"]).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert_eq!(stdout.lines().count(), 1);
    let entry: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(entry["volume_ml"], 150);
}

#[test]
fn list_offline_fails() {
    let home = Home::offline();

    home.carelog()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("network error"));
}
