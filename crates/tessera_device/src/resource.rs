//! Device Resources
//!
//! Resources reach their device through a non-owning back-reference,
//! [`ResourceBase`]. Holding one never keeps the device alive: the device's
//! slot table already refers to its resources, so a strong back-reference
//! would form a cycle and block teardown.
//!
//! To do work, a resource upgrades its back-reference with
//! [`ResourceBase::device`], uses the returned [`DeviceHandle`] for the call at
//! hand and drops it again.
//!
//! ```rust,ignore
//! let device = DeviceHandle::new();
//! let mut buffer = device.create_resource(ResourceDesc::buffer("vertices", 4096));
//!
//! let fence = device.submit([buffer.base_mut()]);
//! assert_eq!(buffer.base().last_write(), fence);
//!
//! drop(device);
//! assert!(buffer.device().is_err());
//! ```

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use tessera_core::{Fence, Handle, Result, TesseraError};

use crate::device::DeviceHandle;
use crate::state::DeviceState;

// ============================================================================
// ResourceBase
// ============================================================================

/// Non-owning link from a resource to the device it was created on, plus the
/// fence of the last submission that wrote to it.
#[derive(Debug, Clone, Default)]
pub struct ResourceBase {
    parent: Weak<DeviceState>,
    last_write: Fence,
}

impl ResourceBase {
    /// A base with no parent. [`device`](Self::device) fails until
    /// [`set_parent`](Self::set_parent) is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attached(device: &DeviceHandle) -> Self {
        Self {
            parent: device.state(),
            last_write: Fence::none(),
        }
    }

    /// Points this resource at `device`, replacing any previous parent.
    pub fn set_parent(&mut self, device: &DeviceHandle) {
        self.parent = device.state();
    }

    /// Upgrades the back-reference into a strong handle.
    ///
    /// Fails with [`TesseraError::InvalidParent`] if no parent was set or the
    /// device has been destroyed. Drop the returned handle as soon as the
    /// current operation is done.
    pub fn device(&self) -> Result<DeviceHandle> {
        self.parent
            .upgrade()
            .map(DeviceHandle::from_state)
            .ok_or(TesseraError::InvalidParent)
    }

    /// `true` while the parent device is alive.
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.strong_count() > 0
    }

    /// `true` if `device` is this resource's parent.
    #[must_use]
    pub fn belongs_to(&self, device: &DeviceHandle) -> bool {
        self.parent.ptr_eq(&device.state())
    }

    #[inline]
    #[must_use]
    pub fn last_write(&self) -> Fence {
        self.last_write
    }

    /// Records a submission that wrote to this resource. Older fences never
    /// replace newer ones.
    pub fn mark_written(&mut self, fence: Fence) {
        self.last_write = self.last_write.latest(fence);
    }

    /// `true` when the GPU is done with the last write to this resource.
    ///
    /// A resource that was never written is idle.
    pub fn is_idle(&self) -> Result<bool> {
        if self.last_write.is_none() {
            return Ok(true);
        }
        Ok(self.device()?.has_completed(self.last_write))
    }
}

// ============================================================================
// DeviceResource
// ============================================================================

/// Attachment protocol for anything created against a device.
pub trait DeviceResource {
    fn base(&self) -> &ResourceBase;

    fn base_mut(&mut self) -> &mut ResourceBase;

    fn set_parent(&mut self, device: &DeviceHandle) {
        self.base_mut().set_parent(device);
    }

    fn device(&self) -> Result<DeviceHandle> {
        self.base().device()
    }

    fn is_idle(&self) -> Result<bool> {
        self.base().is_idle()
    }
}

impl DeviceResource for ResourceBase {
    fn base(&self) -> &ResourceBase {
        self
    }

    fn base_mut(&mut self) -> &mut ResourceBase {
        self
    }
}

// ============================================================================
// Resource
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Buffer,
    Texture,
    CommandStream,
}

/// What the device's slot table records about a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDesc {
    pub kind: ResourceKind,
    pub label: String,
    pub size_bytes: u64,
}

impl ResourceDesc {
    #[must_use]
    pub fn buffer(label: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            kind: ResourceKind::Buffer,
            label: label.into(),
            size_bytes,
        }
    }

    #[must_use]
    pub fn texture(label: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            kind: ResourceKind::Texture,
            label: label.into(),
            size_bytes,
        }
    }

    #[must_use]
    pub fn command_stream(label: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::CommandStream,
            label: label.into(),
            size_bytes: 0,
        }
    }
}

/// A resource that owns one slot in its device's table.
///
/// Dropping it hands the slot back to the device, deferred until the last
/// write retires. If the device is already gone the drop does nothing.
///
/// The handle only means something to the device that minted it, so a
/// `Resource` cannot be reparented and always releases into its owner.
#[derive(Debug)]
pub struct Resource {
    base: ResourceBase,
    /// Device whose slot table issued `handle`.
    owner: Weak<DeviceState>,
    handle: Handle,
    desc: Arc<ResourceDesc>,
}

impl Resource {
    pub(crate) fn new(device: &DeviceHandle, handle: Handle, desc: Arc<ResourceDesc>) -> Self {
        Self {
            base: ResourceBase::attached(device),
            owner: device.state(),
            handle,
            desc,
        }
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    #[must_use]
    pub fn desc(&self) -> &ResourceDesc {
        &self.desc
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.desc.kind
    }
}

impl DeviceResource for Resource {
    fn base(&self) -> &ResourceBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ResourceBase {
        &mut self.base
    }

    /// Only accepts the device that created the resource.
    fn set_parent(&mut self, device: &DeviceHandle) {
        if self.owner.ptr_eq(&device.state()) {
            self.base.set_parent(device);
        } else {
            log::warn!(
                "'{}' belongs to another device and cannot be reparented",
                self.desc.label
            );
        }
    }
}

impl Drop for Resource {
    fn drop(&mut self) {
        let Some(state) = self.owner.upgrade() else {
            log::trace!("'{}' outlived its device", self.desc.label);
            return;
        };
        // The device logs failed releases itself.
        let _ = state.defer_free(self.handle, self.base.last_write());
    }
}
