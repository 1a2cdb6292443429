//! Tessera Core
//!
//! Foundational, device-agnostic building blocks:
//!
//! - [`handle`]: 64-bit `(slot_index, generation)` packing and the [`Handle`] newtype
//! - [`fence`]: [`Fence`] sequence-number markers with a `-1` sentinel
//! - [`sequence`]: [`SequenceTracker`] for out-of-order completion
//! - [`slot_table`]: [`SlotTable`] generational storage
//! - [`errors`]: [`TesseraError`] and the crate-wide [`Result`] alias

pub mod errors;
pub mod fence;
pub mod handle;
pub mod sequence;
pub mod slot_table;

pub use errors::{Result, TesseraError};
pub use fence::Fence;
pub use handle::{Handle, pack, unpack};
pub use sequence::SequenceTracker;
pub use slot_table::SlotTable;
