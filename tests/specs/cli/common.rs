// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub const PATIENT: &str = "6f1c2a9e-0000-4000-8000-000000000001";

/// An isolated carelog home: its own config and data directory.
///
/// The config points at a port nothing listens on, so every command sees
/// the event store as unreachable.
pub struct Home {
    pub temp: TempDir,
}

impl Home {
    pub fn offline() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "[remote]\nurl = \"ws://127.0.0.1:1\"\nconnect_timeout_ms = 500\nrequest_timeout_ms = 500\n",
        )
        .unwrap();
        Home { temp }
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp.path().join("data")
    }

    pub fn outbox_path(&self) -> PathBuf {
        self.data_dir().join("outbox.jsonl")
    }

    pub fn outbox_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.outbox_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn carelog(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("carelog");
        cmd.env("CARELOG_CONFIG", self.config_path())
            .env("CARELOG_DATA_DIR", self.data_dir())
            .env_remove("CARELOG_LOG")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn record_drink(&self, ml: u32) {
        self.carelog()
            .args(["record", "drink", "--patient", PATIENT, "--volume-ml"])
            .arg(ml.to_string())
            .assert()
            .success();
    }
}
