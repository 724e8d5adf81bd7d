//! # Worker table: which launched workers are still alive.
//!
//! Maintains the authoritative state of every launched worker, keyed by pid.
//!
//! ## Architecture
//! ```text
//! Coordinator ──► register_with(spawn) ──┐
//!                                        ▼
//!                         HashMap<Pid, WorkerState{handle, alive}>
//!                                        ▲              │
//! Reaper ──► mark_exited(pid) ───────────┘              ▼
//!                                     Supervisor ──► is_alive(pid)
//! ```
//!
//! ## Rules
//! - A worker transitions alive → dead **at most once**; `mark_exited` returns
//!   the handle only on that transition, which is what keeps the counter from
//!   being bumped twice for one worker.
//! - Registration holds the write lock across the spawn, so a child that dies
//!   instantly cannot be reaped before it is known: the reaper's
//!   `mark_exited` waits for the lock.
//! - Reads are non-blocking apart from the short lock.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use nix::unistd::Pid;

use crate::workers::WorkerHandle;

/// Per-worker state.
#[derive(Debug, Clone, Copy)]
struct WorkerState {
    handle: WorkerHandle,
    alive: bool,
}

/// Thread-safe table of launched workers.
#[derive(Debug, Default)]
pub struct WorkerTable {
    state: RwLock<HashMap<Pid, WorkerState>>,
}

impl WorkerTable {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Pid, WorkerState>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Pid, WorkerState>> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `spawn` under the write lock and registers the handle it returns as alive.
    pub fn register_with<E>(
        &self,
        spawn: impl FnOnce() -> Result<WorkerHandle, E>,
    ) -> Result<WorkerHandle, E> {
        let mut state = self.write();
        let handle = spawn()?;
        state.insert(
            handle.id,
            WorkerState {
                handle,
                alive: true,
            },
        );
        Ok(handle)
    }

    /// Registers an already launched worker as alive.
    pub fn register(&self, handle: WorkerHandle) {
        let _ = self.register_with(|| Ok::<_, std::convert::Infallible>(handle));
    }

    /// Marks `pid` as dead.
    ///
    /// Returns the handle on the alive → dead transition, `None` for unknown
    /// pids or workers already marked.
    pub fn mark_exited(&self, pid: Pid) -> Option<WorkerHandle> {
        let mut state = self.write();
        let entry = state.get_mut(&pid)?;
        if !entry.alive {
            return None;
        }
        entry.alive = false;
        Some(entry.handle)
    }

    /// True if `pid` is registered and has not been reaped.
    pub fn is_alive(&self, pid: Pid) -> bool {
        self.read().get(&pid).map(|ws| ws.alive).unwrap_or(false)
    }

    /// Returns the sorted pids of workers still alive.
    pub fn snapshot(&self) -> Vec<Pid> {
        let mut alive: Vec<Pid> = self
            .read()
            .values()
            .filter(|ws| ws.alive)
            .map(|ws| ws.handle.id)
            .collect();
        alive.sort_unstable();
        alive
    }
}
