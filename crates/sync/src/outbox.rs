// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outbox for persisting care events the event store has not acknowledged.
//!
//! The on-disk store uses JSONL - each entry is written as a single line and
//! fsynced immediately. Entries are replayed to the event store in order by
//! the sync engine.
//!
//! Storage failures never reach the caller: `load` degrades to an empty
//! queue and `save`/`enqueue` log and carry on. Durability for that one call
//! is lost, nothing else is.
//!
//! Several processes may share one outbox file. Every read and write of the
//! file holds an exclusive lock on `<outbox>.lock`, and a drain holds
//! `<outbox>.drain.lock` from snapshot to commit. A drain commit only removes
//! the lines it delivered, so entries appended by other processes and lines
//! that no longer decode are kept.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use carelog_core::{jsonl, CareEventInsert};

/// Error type for outbox operations.
#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or file error from the JSONL layer.
    #[error("storage error: {0}")]
    Storage(#[from] carelog_core::Error),
}

/// Result type for outbox operations.
pub type OutboxResult<T> = Result<T, OutboxError>;

/// Entries taken for one drain.
///
/// `slots[i]` is the position of `entries[i]` in the store, and `len` is the
/// number of positions the snapshot covers. Positions without an entry hold
/// records that could not be decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainSnapshot {
    pub entries: Vec<CareEventInsert>,
    pub slots: Vec<usize>,
    pub len: usize,
}

impl DrainSnapshot {
    fn from_entries(entries: Vec<CareEventInsert>) -> Self {
        let len = entries.len();
        DrainSnapshot {
            entries,
            slots: (0..len).collect(),
            len,
        }
    }
}

/// Durable FIFO of care events waiting for delivery.
pub trait OutboxStore: Send {
    /// Returns every queued entry in enqueue order.
    ///
    /// Returns an empty list if the storage is missing or unreadable.
    fn load(&self) -> Vec<CareEventInsert>;

    /// Replaces the queue with `entries`, keeping their order.
    fn save(&mut self, entries: &[CareEventInsert]);

    /// Appends one entry to the end of the queue.
    fn enqueue(&mut self, entry: &CareEventInsert);

    /// Number of queued entries.
    fn count(&self) -> usize {
        self.load().len()
    }

    /// Take the entries a drain will try to deliver.
    fn snapshot(&mut self) -> DrainSnapshot {
        DrainSnapshot::from_entries(self.load())
    }

    /// Remove the `delivered` positions of a snapshot covering `len`
    /// positions. Everything else, including entries enqueued after the
    /// snapshot, stays queued in order.
    fn remove_delivered(&mut self, len: usize, delivered: &[usize]) {
        let delivered: HashSet<usize> = delivered.iter().copied().collect();
        let kept: Vec<CareEventInsert> = self
            .load()
            .into_iter()
            .enumerate()
            .filter(|(slot, _)| *slot >= len || !delivered.contains(slot))
            .map(|(_, entry)| entry)
            .collect();
        self.save(&kept);
    }

    /// Lock file serializing drains across processes, if the store is
    /// visible to other processes.
    fn drain_lock_path(&self) -> Option<PathBuf> {
        None
    }
}

/// Outbox stored as a JSONL file, one entry per line.
#[derive(Debug)]
pub struct JsonlOutbox {
    /// Path to the outbox file.
    path: PathBuf,
    /// Sibling lock file held around every file access.
    lock_path: PathBuf,
}

impl JsonlOutbox {
    /// Create or open an outbox at the given path.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> OutboxResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(path)?;

        Ok(JsonlOutbox {
            path: path.to_path_buf(),
            lock_path: sibling(path, ".lock"),
        })
    }

    /// Read all entries, surfacing storage errors.
    pub fn read_entries(&self) -> OutboxResult<Vec<CareEventInsert>> {
        let _lock = lock_file(&self.lock_path)?;
        Ok(jsonl::read_all(&self.path)?)
    }

    /// Rewrite the file with `entries`, surfacing storage errors.
    pub fn write_entries(&self, entries: &[CareEventInsert]) -> OutboxResult<()> {
        let _lock = lock_file(&self.lock_path)?;
        Ok(jsonl::write_all(&self.path, entries)?)
    }

    /// Append one entry, surfacing storage errors.
    pub fn append_entry(&self, entry: &CareEventInsert) -> OutboxResult<()> {
        let _lock = lock_file(&self.lock_path)?;
        Ok(jsonl::append(&self.path, entry)?)
    }

    fn read_snapshot(&self) -> OutboxResult<DrainSnapshot> {
        let _lock = lock_file(&self.lock_path)?;
        let lines = jsonl::read_lines(&self.path)?;

        let mut snapshot = DrainSnapshot {
            len: lines.len(),
            ..DrainSnapshot::default()
        };
        for (slot, line) in lines.iter().enumerate() {
            match serde_json::from_str(line) {
                Ok(entry) => {
                    snapshot.entries.push(entry);
                    snapshot.slots.push(slot);
                }
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = slot + 1,
                        "outbox line does not decode, leaving it in place: {}",
                        e
                    );
                }
            }
        }
        Ok(snapshot)
    }

    fn rewrite_without(&self, len: usize, delivered: &[usize]) -> OutboxResult<()> {
        let _lock = lock_file(&self.lock_path)?;
        let delivered: HashSet<usize> = delivered.iter().copied().collect();
        let kept: Vec<String> = jsonl::read_lines(&self.path)?
            .into_iter()
            .enumerate()
            .filter(|(slot, _)| *slot >= len || !delivered.contains(slot))
            .map(|(_, line)| line)
            .collect();
        Ok(jsonl::write_lines(&self.path, &kept)?)
    }
}

impl OutboxStore for JsonlOutbox {
    fn load(&self) -> Vec<CareEventInsert> {
        match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), "outbox unreadable, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&mut self, entries: &[CareEventInsert]) {
        if let Err(e) = self.write_entries(entries) {
            warn!(
                path = %self.path.display(),
                entries = entries.len(),
                "failed to persist outbox: {}",
                e
            );
        }
    }

    fn enqueue(&mut self, entry: &CareEventInsert) {
        if let Err(e) = self.append_entry(entry) {
            warn!(
                path = %self.path.display(),
                patient = %entry.patient_id,
                "failed to persist queued event: {}",
                e
            );
        }
    }

    fn snapshot(&mut self) -> DrainSnapshot {
        match self.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.path.display(), "outbox unreadable, nothing to drain: {}", e);
                DrainSnapshot::default()
            }
        }
    }

    fn remove_delivered(&mut self, len: usize, delivered: &[usize]) {
        if delivered.is_empty() {
            return;
        }
        if let Err(e) = self.rewrite_without(len, delivered) {
            warn!(
                path = %self.path.display(),
                delivered = delivered.len(),
                "failed to remove delivered entries, they will be sent again: {}",
                e
            );
        }
    }

    fn drain_lock_path(&self) -> Option<PathBuf> {
        Some(sibling(&self.path, ".drain.lock"))
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Open `path` and block until this process holds its exclusive lock.
///
/// The lock is released when the returned file is dropped.
fn lock_file(path: &Path) -> io::Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(file)
}

/// Outbox kept in memory only. Nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct MemoryOutbox {
    entries: Vec<CareEventInsert>,
}

impl MemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutboxStore for MemoryOutbox {
    fn load(&self) -> Vec<CareEventInsert> {
        self.entries.clone()
    }

    fn save(&mut self, entries: &[CareEventInsert]) {
        self.entries = entries.to_vec();
    }

    fn enqueue(&mut self, entry: &CareEventInsert) {
        self.entries.push(entry.clone());
    }

    fn count(&self) -> usize {
        self.entries.len()
    }
}

/// An [`OutboxStore`] shared between capture and sync.
///
/// Every access goes through one lock. A drain snapshot records how many
/// positions it covers, so its commit keeps whatever was enqueued after it:
/// `after = undelivered(snapshot) ++ enqueued_during_drain`.
pub struct SharedOutbox {
    store: Mutex<Box<dyn OutboxStore>>,
}

/// A drain in progress, from [`SharedOutbox::begin_drain`] to
/// [`SharedOutbox::commit_drain`].
pub(crate) struct Drain {
    snapshot: DrainSnapshot,
    /// Cross-process drain lock, released on drop.
    _lock: Option<File>,
}

impl Drain {
    pub(crate) fn entries(&self) -> &[CareEventInsert] {
        &self.snapshot.entries
    }
}

impl SharedOutbox {
    pub fn new(store: impl OutboxStore + 'static) -> Self {
        SharedOutbox {
            store: Mutex::new(Box::new(store)),
        }
    }

    /// Append an entry to the queue.
    pub async fn enqueue(&self, entry: &CareEventInsert) {
        self.store.lock().await.enqueue(entry);
    }

    /// Number of queued entries.
    pub async fn count(&self) -> usize {
        self.store.lock().await.count()
    }

    /// All queued entries in order.
    pub async fn entries(&self) -> Vec<CareEventInsert> {
        self.store.lock().await.load()
    }

    /// Wait for the drain lock, then take the drain snapshot.
    ///
    /// Drains within one process must also be serialized by the caller;
    /// see `SyncEngine::drain`.
    pub(crate) async fn begin_drain(&self) -> Drain {
        let lock_path = self.store.lock().await.drain_lock_path();
        let lock = match lock_path {
            Some(path) => acquire_drain_lock(path).await,
            None => None,
        };

        let snapshot = self.store.lock().await.snapshot();
        Drain {
            snapshot,
            _lock: lock,
        }
    }

    /// Remove the entries at `delivered` (indices into
    /// [`Drain::entries`]) and release the drain lock.
    pub(crate) async fn commit_drain(&self, drain: Drain, delivered: &[usize]) {
        let slots: Vec<usize> = delivered
            .iter()
            .filter_map(|&i| drain.snapshot.slots.get(i).copied())
            .collect();
        self.store
            .lock()
            .await
            .remove_delivered(drain.snapshot.len, &slots);
        debug!(delivered = slots.len(), "outbox drain committed");
    }
}

async fn acquire_drain_lock(path: PathBuf) -> Option<File> {
    let result = tokio::task::spawn_blocking(move || lock_file(&path).map_err(|e| (path, e))).await;
    match result {
        Ok(Ok(file)) => Some(file),
        Ok(Err((path, e))) => {
            warn!(path = %path.display(), "could not take drain lock, draining anyway: {}", e);
            None
        }
        Err(e) => {
            warn!("drain lock task failed, draining anyway: {}", e);
            None
        }
    }
}
