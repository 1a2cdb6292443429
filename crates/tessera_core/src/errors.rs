//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`TesseraError`] covers the typed failures of the
//! ownership and completion-tracking layer:
//! - Orphaned resources whose device is gone
//! - Stale generational handles
//! - Completion reports for sequence numbers that were never issued
//!
//! None of these are fatal; callers decide how severe they are.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, TesseraError>`.
//!
//! ```rust,ignore
//! use tessera_core::errors::{TesseraError, Result};
//!
//! fn touch(table: &SlotTable<u32>, handle: Handle) -> Result<()> {
//!     let value = table.resolve(handle)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for Tessera.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TesseraError {
    // ========================================================================
    // Ownership Errors
    // ========================================================================
    /// The resource has no parent device, or every strong owner of the
    /// device has already been dropped.
    #[error("Resource has no live parent device")]
    InvalidParent,

    // ========================================================================
    // Handle Errors
    // ========================================================================
    /// The handle's generation does not match the slot's current generation
    /// (the slot was freed and possibly reused), or the slot does not exist.
    #[error("Stale handle: slot {slot}, generation {generation}")]
    StaleHandle {
        /// Slot index encoded in the handle
        slot: i32,
        /// Generation encoded in the handle
        generation: i32,
    },

    // ========================================================================
    // Completion Errors
    // ========================================================================
    /// A completion was reported for a sequence number that was never issued
    /// (including the `-1` sentinel).
    #[error("Unknown sequence number: {0}")]
    UnknownSequence(i64),
}

/// Alias for `Result<T, TesseraError>`.
pub type Result<T> = std::result::Result<T, TesseraError>;
