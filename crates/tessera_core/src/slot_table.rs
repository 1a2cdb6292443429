//! Generational Slot Table
//!
//! A growable arena of slots, each paired with a generation counter. Handles
//! minted by [`SlotTable::allocate`] stay valid until the slot is freed; every
//! free bumps the slot's generation so older handles resolve as stale.
//!
//! # Locking
//!
//! - Each slot sits behind its own `RwLock`, so `resolve` on different slots
//!   only takes shared locks.
//! - The slot vector is write-locked only while the table grows.
//! - The free list has its own `Mutex`.
//!
//! Generations wrap on overflow. A slot that is freed 2^32 times will hand out
//! a generation that collides with its very first handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::errors::{Result, TesseraError};
use crate::handle::Handle;

struct SlotEntry<T> {
    generation: u32,
    payload: Option<Arc<T>>,
}

// Thread-safe generational storage.
pub struct SlotTable<T> {
    slots: RwLock<Vec<RwLock<SlotEntry<T>>>>,
    free_list: Mutex<Vec<u32>>,
    live: AtomicUsize,
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: RwLock::new(Vec::with_capacity(capacity)),
            free_list: Mutex::new(Vec::new()),
            live: AtomicUsize::new(0),
        }
    }

    /// [Write] Stores `payload` in a free slot (growing the table if none is
    /// free) and returns a handle carrying the slot's current generation.
    pub fn allocate(&self, payload: impl Into<T>) -> Handle {
        self.allocate_shared(Arc::new(payload.into()))
    }

    /// [Write] Like [`allocate`](Self::allocate), but stores an existing `Arc`
    /// so the caller and the table share one payload.
    pub fn allocate_shared(&self, payload: Arc<T>) -> Handle {
        let recycled = self.free_list.lock().pop();

        let handle = match recycled {
            Some(index) => {
                let slots = self.slots.read();
                let mut entry = slots[index as usize].write();
                entry.payload = Some(payload);
                Handle::new(index as i32, entry.generation as i32)
            }
            None => {
                let mut slots = self.slots.write();
                let index = slots.len();
                if index == slots.capacity() && index > 0 {
                    log::debug!("Slot table growing past {index} slots");
                }
                slots.push(RwLock::new(SlotEntry {
                    generation: 0,
                    payload: Some(payload),
                }));
                Handle::new(index as i32, 0)
            }
        };

        self.live.fetch_add(1, Ordering::Relaxed);
        log::trace!("Allocated {handle:?}");
        handle
    }

    /// [Write] Clears the slot referenced by `handle` and bumps its
    /// generation, invalidating every handle issued for it so far.
    ///
    /// Returns the payload that was stored in the slot.
    pub fn free(&self, handle: Handle) -> Result<Arc<T>> {
        let payload = {
            let slots = self.slots.read();
            let slot = Self::slot(&slots, handle)?;
            let mut entry = slot.write();
            if entry.generation as i32 != handle.generation() {
                return Err(Self::stale(handle));
            }
            let payload = entry.payload.take().ok_or_else(|| Self::stale(handle))?;
            entry.generation = entry.generation.wrapping_add(1);
            payload
        };

        self.free_list.lock().push(handle.slot_index() as u32);
        self.live.fetch_sub(1, Ordering::Relaxed);
        log::trace!("Freed {handle:?}");
        Ok(payload)
    }

    /// [Read] Returns the payload referenced by `handle`.
    ///
    /// The returned `Arc` keeps the payload itself alive, but the handle stops
    /// resolving as soon as the slot is freed.
    pub fn resolve(&self, handle: Handle) -> Result<Arc<T>> {
        let slots = self.slots.read();
        let entry = Self::slot(&slots, handle)?.read();
        match &entry.payload {
            Some(payload) if entry.generation as i32 == handle.generation() => {
                Ok(Arc::clone(payload))
            }
            _ => Err(Self::stale(handle)),
        }
    }

    /// [Read] `true` if `handle` currently resolves.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Current generation of the slot at `index`, if the slot exists.
    #[must_use]
    pub fn generation(&self, index: i32) -> Option<i32> {
        let slots = self.slots.read();
        let slot = slots.get(usize::try_from(index).ok()?)?;
        let generation = slot.read().generation;
        Some(generation as i32)
    }

    /// Number of occupied slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots ever created, occupied or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.read().len()
    }

    /// Number of slots waiting to be reused.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free_list.lock().len()
    }

    fn slot(slots: &[RwLock<SlotEntry<T>>], handle: Handle) -> Result<&RwLock<SlotEntry<T>>> {
        usize::try_from(handle.slot_index())
            .ok()
            .and_then(|index| slots.get(index))
            .ok_or_else(|| Self::stale(handle))
    }

    fn stale(handle: Handle) -> TesseraError {
        TesseraError::StaleHandle {
            slot: handle.slot_index(),
            generation: handle.generation(),
        }
    }
}
