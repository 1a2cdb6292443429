#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! # Tessera
//!
//! Device-scoped GPU resource ownership and completion tracking.
//!
//! - A [`DeviceHandle`] strongly owns the shared [`DeviceState`].
//! - Resources keep a [`ResourceBase`], a non-owning back-reference they
//!   upgrade only for the duration of a call.
//! - Submissions are ordered by [`Fence`] sequence numbers; the completed
//!   watermark tells resources when the GPU is done with them.
//! - Resources are named across API boundaries by generational [`Handle`]s,
//!   which go stale once their slot is freed.
//!
//! ```rust,ignore
//! use tessera::prelude::*;
//!
//! let device = DeviceHandle::new();
//! let mut buffer = device.create_resource(ResourceDesc::buffer("vertices", 4096));
//!
//! let fence = device.submit([buffer.base_mut()]);
//! device.advance_completed(fence.get());
//! assert!(buffer.is_idle()?);
//! ```

pub use tessera_core::{Fence, Handle, Result, SequenceTracker, SlotTable, TesseraError, pack, unpack};
pub use tessera_device::{
    DeviceHandle, DeviceResource, DeviceSettings, DeviceState, DeviceStats, Resource, ResourceBase,
    ResourceDesc, ResourceKind,
};

pub mod prelude {
    pub use tessera_core::{Fence, Handle, Result, TesseraError};
    pub use tessera_device::{
        DeviceHandle, DeviceResource, DeviceSettings, Resource, ResourceBase, ResourceDesc,
        ResourceKind,
    };
}
