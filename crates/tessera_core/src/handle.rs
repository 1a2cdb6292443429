//! Generational Handle Encoding
//!
//! A handle packs a `(slot_index, generation)` pair into one 64-bit value:
//! the slot index occupies the upper 32 bits and the generation the lower
//! 32 bits. Both halves are reinterpreted as raw bit patterns, so negative
//! values survive a round trip.
//!
//! ```rust,ignore
//! use tessera_core::handle::{pack, unpack};
//!
//! let raw = pack(5, -3);
//! assert_eq!(unpack(raw), (5, -3));
//! ```

use std::fmt;

/// Packs a slot index and a generation into a single `i64`.
#[inline]
#[must_use]
pub const fn pack(slot_index: i32, generation: i32) -> i64 {
    ((slot_index as i64) << 32) | (generation as u32 as i64)
}

/// Splits a packed value back into `(slot_index, generation)`.
///
/// The slot index is recovered with an arithmetic shift, the generation by
/// truncating to the low 32 bits.
#[inline]
#[must_use]
pub const fn unpack(value: i64) -> (i32, i32) {
    ((value >> 32) as i32, value as i32)
}

/// Opaque 64-bit resource handle.
///
/// A handle is only meaningful against the slot table that minted it; it is
/// *valid* while the slot's generation still equals [`Handle::generation`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(i64);

impl Handle {
    #[inline]
    #[must_use]
    pub const fn new(slot_index: i32, generation: i32) -> Self {
        Self(pack(slot_index, generation))
    }

    /// Wraps a raw value received across an API boundary.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn slot_index(self) -> i32 {
        unpack(self.0).0
    }

    #[inline]
    #[must_use]
    pub const fn generation(self) -> i32 {
        unpack(self.0).1
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.slot_index(), self.generation())
    }
}

impl From<Handle> for i64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl From<i64> for Handle {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
