//! Shared Device State
//!
//! [`DeviceState`] is the logical device context every
//! [`DeviceHandle`](crate::DeviceHandle) shares. It owns:
//!
//! - the submission counter that mints [`Fence`]s,
//! - the completed watermark and the out-of-order [`SequenceTracker`],
//! - the resource [`SlotTable`] and its deferred-release queue.
//!
//! The counter and the watermark are atomics; the slot table, the tracker and
//! the release queue each carry their own lock.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;
use tessera_core::{Fence, Handle, Result, SequenceTracker, SlotTable, TesseraError};

use crate::resource::ResourceDesc;
use crate::settings::DeviceSettings;

/// Process-wide device id generator
static NEXT_DEVICE_ID: AtomicU64 = AtomicU64::new(1);

/// A slot release waiting for its last submission to retire.
#[derive(Debug, Clone, Copy)]
struct PendingRelease {
    handle: Handle,
    fence: Fence,
}

/// Snapshot of a device's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DeviceStats {
    /// Occupied resource slots
    pub live_resources: usize,
    /// Slots waiting to be reused
    pub free_slots: usize,
    /// Releases queued behind unretired fences
    pub pending_releases: usize,
    /// Last sequence number handed out
    pub last_submitted: i64,
    /// Completed watermark
    pub completed: i64,
}

pub struct DeviceState {
    id: u64,
    settings: DeviceSettings,
    /// Last issued sequence number. The first submission gets 1.
    submitted: AtomicI64,
    /// Highest sequence known to be retired, along with everything below it.
    completed: AtomicI64,
    tracker: Mutex<SequenceTracker>,
    resources: SlotTable<ResourceDesc>,
    garbage: Mutex<Vec<PendingRelease>>,
}

impl DeviceState {
    pub(crate) fn new(settings: DeviceSettings) -> Self {
        let id = NEXT_DEVICE_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("Device '{}' (#{id}) created", settings.label);
        Self {
            id,
            resources: SlotTable::with_capacity(settings.initial_slot_capacity),
            settings,
            submitted: AtomicI64::new(0),
            completed: AtomicI64::new(0),
            tracker: Mutex::new(SequenceTracker::new(0)),
            garbage: Mutex::new(Vec::new()),
        }
    }

    /// Process-unique id of this device.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    // ========================================================================
    // Submission sequencing
    // ========================================================================

    /// Reserves the next submission sequence number.
    ///
    /// Values are unique and strictly increasing in the order the increments
    /// land. The counter wraps on `i64` overflow.
    pub fn allocate_sequence(&self) -> Fence {
        let seq = self.submitted.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        log::trace!("Device #{} issued sequence {seq}", self.id);
        Fence::new(seq)
    }

    /// Last sequence number handed out, or 0 before the first submission.
    #[inline]
    #[must_use]
    pub fn last_submitted(&self) -> i64 {
        self.submitted.load(Ordering::Acquire)
    }

    /// Completion entry point: everything up to `seq` has retired.
    ///
    /// The watermark never moves backwards; a smaller `seq` is ignored.
    pub fn advance_completed(&self, seq: i64) {
        let last = self.last_submitted();
        if seq > last {
            log::warn!(
                "Device #{}: completion reported up to {seq}, but only {last} was submitted",
                self.id
            );
        }
        self.completed.fetch_max(seq, Ordering::AcqRel);
    }

    /// Records the retirement of one specific submission.
    ///
    /// Submissions may finish out of order; the watermark only advances once
    /// every earlier sequence has completed too. Returns `false` if `fence`
    /// was already known to be complete.
    pub fn complete(&self, fence: Fence) -> Result<bool> {
        let seq = fence.get();
        if fence.is_none() || seq <= 0 || seq > self.last_submitted() {
            return Err(TesseraError::UnknownSequence(seq));
        }

        let (newly_completed, completed_till) = {
            let mut tracker = self.tracker.lock();
            tracker.advance_to(self.completed.load(Ordering::Acquire));
            let newly_completed = tracker.complete(seq);
            (newly_completed, tracker.completed_till())
        };

        self.completed.fetch_max(completed_till, Ordering::AcqRel);
        Ok(newly_completed)
    }

    /// Completed watermark.
    #[inline]
    #[must_use]
    pub fn completed(&self) -> i64 {
        self.completed.load(Ordering::Acquire)
    }

    /// `true` when `fence` is at or below the completed watermark.
    ///
    /// The sentinel fence is never retired.
    #[inline]
    #[must_use]
    pub fn is_retired(&self, fence: Fence) -> bool {
        !fence.is_none() && fence.get() <= self.completed()
    }

    /// Like [`is_retired`](Self::is_retired), but also sees submissions that
    /// completed ahead of an earlier, still running one.
    #[must_use]
    pub fn has_completed(&self, fence: Fence) -> bool {
        if fence.is_none() {
            return false;
        }
        self.is_retired(fence) || self.tracker.lock().has_completed(fence.get())
    }

    // ========================================================================
    // Resource slots
    // ========================================================================

    pub fn allocate_slot(&self, desc: impl Into<ResourceDesc>) -> Handle {
        self.resources.allocate(desc)
    }

    pub(crate) fn allocate_shared_slot(&self, desc: Arc<ResourceDesc>) -> Handle {
        self.resources.allocate_shared(desc)
    }

    /// Frees the slot immediately. Fails with `StaleHandle` if `handle` is
    /// no longer valid.
    pub fn free_slot(&self, handle: Handle) -> Result<()> {
        self.resources.free(handle).map(drop).inspect_err(|err| {
            log::warn!("Device #{}: failed to free {handle:?}: {err}", self.id);
        })
    }

    pub fn resolve(&self, handle: Handle) -> Result<Arc<ResourceDesc>> {
        self.resources.resolve(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.resources.contains(handle)
    }

    /// Frees `handle` once `fence` has retired.
    ///
    /// If `fence` is the sentinel (nothing was ever submitted) or has already
    /// completed, the slot is freed right away. Failures are logged here, so
    /// callers may ignore the result.
    pub fn defer_free(&self, handle: Handle, fence: Fence) -> Result<()> {
        if fence.is_none() || self.has_completed(fence) {
            return self.free_slot(handle);
        }
        if !self.resources.contains(handle) {
            log::warn!("Device #{}: deferred free of stale {handle:?}", self.id);
            return Err(TesseraError::StaleHandle {
                slot: handle.slot_index(),
                generation: handle.generation(),
            });
        }

        let mut garbage = self.garbage.lock();
        garbage.push(PendingRelease { handle, fence });
        if garbage.len() > self.settings.garbage_warn_threshold {
            log::warn!(
                "Device '{}': {} releases waiting on the GPU (completed {}, submitted {})",
                self.settings.label,
                garbage.len(),
                self.completed(),
                self.last_submitted()
            );
        }
        Ok(())
    }

    /// Frees every deferred slot whose fence has completed.
    ///
    /// Returns the number of slots released.
    pub fn collect_garbage(&self) -> usize {
        let ready: Vec<PendingRelease> = {
            let mut garbage = self.garbage.lock();
            let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut *garbage)
                .into_iter()
                .partition(|pending| self.has_completed(pending.fence));
            *garbage = waiting;
            ready
        };

        let released = ready
            .iter()
            .filter(|pending| self.free_slot(pending.handle).is_ok())
            .count();

        if !ready.is_empty() {
            log::debug!(
                "Device '{}': released {released} of {} retired resources",
                self.settings.label,
                ready.len()
            );
        }
        released
    }

    #[must_use]
    pub fn stats(&self) -> DeviceStats {
        DeviceStats {
            live_resources: self.resources.len(),
            free_slots: self.resources.free_len(),
            pending_releases: self.garbage.lock().len(),
            last_submitted: self.last_submitted(),
            completed: self.completed(),
        }
    }
}

impl fmt::Debug for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceState")
            .field("id", &self.id)
            .field("label", &self.settings.label)
            .field("submitted", &self.last_submitted())
            .field("completed", &self.completed())
            .field("live_resources", &self.resources.len())
            .finish_non_exhaustive()
    }
}

impl Drop for DeviceState {
    fn drop(&mut self) {
        log::debug!(
            "Device '{}' (#{}) destroyed with {} live resources",
            self.settings.label,
            self.id,
            self.resources.len()
        );
    }
}
