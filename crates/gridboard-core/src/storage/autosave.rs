//! Debounced persistence of the workspace collection.
//!
//! Every mutation restarts the debounce timer; the collection is written
//! once no mutation has happened for the configured delay. A save replaces
//! the stored document as a whole.

use crate::model::Workspace;
use crate::storage::{Storage, StorageResult, load_workspaces, save_workspaces};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default debounce delay in milliseconds.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 300;

/// Manages debounced persistence of the workspace collection.
pub struct AutoSaveManager<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    /// Quiet period required before a save.
    delay: Duration,
    /// When the collection last changed.
    last_change: Option<Instant>,
    /// Whether there are unsaved changes.
    dirty: bool,
    /// Last store revision seen by [`AutoSaveManager::track`].
    seen_revision: Option<u64>,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create a new auto-save manager with the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            delay: Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS),
            last_change: None,
            dirty: false,
            seen_revision: None,
        }
    }

    /// Set the debounce delay.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Get the debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a change now.
    pub fn mark_dirty(&mut self) {
        self.mark_dirty_at(Instant::now());
    }

    /// Record a change at `at`, restarting the debounce timer.
    pub fn mark_dirty_at(&mut self, at: Instant) {
        self.dirty = true;
        self.last_change = Some(at);
    }

    /// Mark dirty when the store revision moved since the last call.
    pub fn track(&mut self, revision: u64) {
        if self.seen_revision.is_some_and(|seen| seen != revision) {
            self.mark_dirty();
        }
        self.seen_revision = Some(revision);
    }

    /// Check if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a save is due at `now`: dirty, and quiet for the full delay.
    pub fn is_due_at(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_change {
            Some(changed) => now.saturating_duration_since(changed) >= self.delay,
            None => true,
        }
    }

    /// Whether a save is due now.
    pub fn is_due(&self) -> bool {
        self.is_due_at(Instant::now())
    }

    /// Save if a save is due at `now`. Returns true if a save was performed.
    pub fn maybe_save_at(&mut self, now: Instant, workspaces: &[Workspace]) -> StorageResult<bool> {
        if !self.is_due_at(now) {
            return Ok(false);
        }
        self.flush(workspaces)?;
        Ok(true)
    }

    /// Save if a save is due now.
    pub fn maybe_save(&mut self, workspaces: &[Workspace]) -> StorageResult<bool> {
        self.maybe_save_at(Instant::now(), workspaces)
    }

    /// Save immediately, regardless of the debounce timer.
    pub fn flush(&mut self, workspaces: &[Workspace]) -> StorageResult<()> {
        save_workspaces(self.storage.as_ref(), workspaces)?;
        log::info!("Saved {} workspace(s)", workspaces.len());
        self.dirty = false;
        self.last_change = None;
        Ok(())
    }

    /// Load the stored collection, clearing any pending change.
    pub fn load(&mut self) -> StorageResult<Vec<Workspace>> {
        let workspaces = load_workspaces(self.storage.as_ref())?;
        log::info!("Loaded {} workspace(s)", workspaces.len());
        self.dirty = false;
        self.last_change = None;
        Ok(workspaces)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
