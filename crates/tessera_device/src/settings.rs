//! Device Settings
//!
//! Construction-time configuration for a logical device.
//!
//! ```rust,ignore
//! use tessera_device::{DeviceHandle, DeviceSettings};
//!
//! let device = DeviceHandle::with_settings(DeviceSettings {
//!     label: "offscreen".into(),
//!     initial_slot_capacity: 1024,
//!     ..Default::default()
//! });
//! ```

use serde::{Deserialize, Serialize};

/// Configuration applied when a [`DeviceState`](crate::DeviceState) is created.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Human-readable device name used in log output.
    pub label: String,
    /// Number of resource slots reserved up front.
    pub initial_slot_capacity: usize,
    /// Queue length past which deferred releases are reported with a warning.
    pub garbage_warn_threshold: usize,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            label: "device".to_string(),
            initial_slot_capacity: 64,
            garbage_warn_threshold: 1024,
        }
    }
}
