pub mod ios;
pub mod traits;

pub use traits::{DeviceBackend, DeviceError};
