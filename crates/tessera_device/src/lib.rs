//! Tessera Device
//!
//! Ownership model for a logical GPU device and the resources created on it:
//!
//! - [`DeviceState`]: shared context with submission sequencing, completion
//!   tracking and resource slots
//! - [`DeviceHandle`]: the only strong owner of a `DeviceState`
//! - [`ResourceBase`] / [`DeviceResource`]: non-owning back-reference that
//!   resources use to reach their device
//! - [`DeviceSettings`]: construction-time configuration

pub mod device;
pub mod resource;
pub mod settings;
pub mod state;

pub use device::DeviceHandle;
pub use resource::{DeviceResource, Resource, ResourceBase, ResourceDesc, ResourceKind};
pub use settings::DeviceSettings;
pub use state::{DeviceState, DeviceStats};
