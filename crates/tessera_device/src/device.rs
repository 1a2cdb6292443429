//! Device Handle
//!
//! [`DeviceHandle`] is the strong, cloneable owner of a [`DeviceState`]. The
//! state lives exactly as long as the last `DeviceHandle` pointing at it;
//! resources only ever hold the [`Weak`] returned by [`DeviceHandle::state`].

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use tessera_core::Fence;

use crate::resource::{Resource, ResourceBase, ResourceDesc};
use crate::settings::DeviceSettings;
use crate::state::DeviceState;

#[derive(Clone)]
pub struct DeviceHandle {
    state: Arc<DeviceState>,
}

impl DeviceHandle {
    /// Creates a fresh device with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(DeviceSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: DeviceSettings) -> Self {
        Self {
            state: Arc::new(DeviceState::new(settings)),
        }
    }

    pub(crate) fn from_state(state: Arc<DeviceState>) -> Self {
        Self { state }
    }

    /// Non-owning reference for resources to store.
    #[must_use]
    pub fn state(&self) -> Weak<DeviceState> {
        Arc::downgrade(&self.state)
    }

    /// `true` if both handles share the same [`DeviceState`].
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &DeviceHandle) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Number of live `DeviceHandle`s sharing this device.
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.state)
    }

    /// Allocates a slot for `desc` and returns a resource attached to this
    /// device.
    #[must_use]
    pub fn create_resource(&self, desc: ResourceDesc) -> Resource {
        let desc = Arc::new(desc);
        let handle = self.state.allocate_shared_slot(Arc::clone(&desc));
        log::trace!("Created {:?} '{}' as {handle:?}", desc.kind, desc.label);
        Resource::new(self, handle, desc)
    }

    /// Issues one submission and stamps its fence as the last write of every
    /// resource in `written`.
    ///
    /// Resources attached to another device (or to none) are skipped: their
    /// completion is tracked against a different sequence.
    pub fn submit<'a>(&self, written: impl IntoIterator<Item = &'a mut ResourceBase>) -> Fence {
        let fence = self.state.allocate_sequence();
        for base in written {
            if base.belongs_to(self) {
                base.mark_written(fence);
            } else {
                log::warn!(
                    "Device #{}: not stamping {fence:?} on a resource of another device",
                    self.state.id()
                );
            }
        }
        fence
    }
}

impl Default for DeviceHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for DeviceHandle {
    type Target = DeviceState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl PartialEq for DeviceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DeviceHandle {}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.state.id())
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
