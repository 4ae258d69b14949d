//! Infrastructure layer - in-memory collaborators
//!
//! Stand-ins for the BLE transport and the cloud settings store, used for
//! local runs and tests.

pub mod cloud;
pub mod device;

pub use cloud::InMemoryCloudStore;
pub use device::InMemoryDevice;
