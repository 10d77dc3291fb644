// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `carelog record` against an unreachable event store.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

#[path = "common.rs"]
mod common;

use common::*;

#[test]
fn record_offline_queues_event() {
    let home = Home::offline();

    home.carelog()
        .args(["record", "drink", "--patient", PATIENT, "--volume-ml", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[drink] provisional:"))
        .stdout(predicate::str::contains("Queued"))
        .stdout(predicate::str::contains("Volume: 200 ml"));

    let lines = home.outbox_lines();
    assert_eq!(lines.len(), 1);
    let entry: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(entry["type"], "drink");
    assert_eq!(entry["volume_ml"], 200);
    assert_eq!(entry["patient_id"], PATIENT);
}

#[test]
fn record_offline_json_has_provisional_id() {
    let home = Home::offline();

    let output = home
        .carelog()
        .args(["record", "med", "-p", PATIENT, "--med", "metformin", "--dose", "500mg"])
        .args(["-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let event: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(event["id"]["kind"], "provisional");
    assert_eq!(event["med_name"], "metformin");
    assert_eq!(event["med_dose"], "500mg");
}

#[test]
fn record_keeps_queue_order() {
    let home = Home::offline();
    home.record_drink(100);
    home.record_drink(200);
    home.record_drink(300);

    let volumes: Vec<i64> = home
        .outbox_lines()
        .iter()
        .map(|line| {
            let v: serde_json::Value = serde_json::from_str(line).unwrap();
            v["volume_ml"].as_i64().unwrap()
        })
        .collect();
    assert_eq!(volumes, vec![100, 200, 300]);
}

#[test]
fn record_negative_volume_is_rejected_and_not_queued() {
    let home = Home::offline();

    home.carelog()
        .args(["record", "drink", "--patient", PATIENT, "--volume-ml", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));

    assert!(home.outbox_lines().is_empty());
}

#[test]
fn record_bad_timestamp_fails() {
    let home = Home::offline();

    home.carelog()
        .args(["record", "meal", "--patient", PATIENT, "--at", "noon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timestamp"));
}

#[test]
fn record_unknown_type_fails() {
    let home = Home::offline();

    home.carelog()
        .args(["record", "snack", "--patient", PATIENT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid types are"));
}

#[test]
fn update_while_offline_is_not_queued() {
    let home = Home::offline();

    home.carelog()
        .args([
            "update",
            "0b6d3c1e-7f2a-4c55-9a10-2f4e8d9b7a61",
            "--volume-ml",
            "250",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("network error"));

    assert!(home.outbox_lines().is_empty());
}

#[test]
fn update_without_fields_fails() {
    let home = Home::offline();

    home.carelog()
        .args(["update", "0b6d3c1e-7f2a-4c55-9a10-2f4e8d9b7a61"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to update"));
}
