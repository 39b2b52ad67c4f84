//! iOS device access
//!
//! Device enumeration and version probing go through a [`DeviceBackend`]
//! (usbmuxd in production). Disk image mounting and location simulation
//! shell out to the libimobiledevice tools.
//!
//! [`DeviceBackend`]: crate::driver::traits::DeviceBackend

pub mod device;
pub mod disk_image;
pub mod location;
pub mod mounter;
pub mod usbmux;

pub use device::{get_os_version, list_connected_devices};
pub use disk_image::{locate_disk_image, normalize_version, DiskImage, MountPolicy};
pub use location::{reset_location, set_location};
pub use mounter::mount_image;
pub use usbmux::UsbmuxBackend;
