use async_trait::async_trait;
use idevice::IdeviceError;
use thiserror::Error;

/// Errors reported by a device backend
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No device is attached (or the requested UDID is not attached)
    #[error("no device connected")]
    NoDevice,

    /// The device did not answer within the configured timeout
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// Error from the usbmuxd/lockdown protocol layer
    #[error("device protocol error: {0}")]
    Protocol(#[from] IdeviceError),

    /// Any other backend failure
    #[error("{0}")]
    Backend(String),
}

/// Access to attached devices.
///
/// Each handle type is an owned value that releases its native resource on
/// drop. Callers acquire `Connection`, then `Session`, then `Property`, and
/// must drop them in the reverse order.
#[async_trait]
pub trait DeviceBackend: Send + Sync {
    /// Open device connection
    type Connection: Send;
    /// Lockdown session established over a connection
    type Session: Send;
    /// Property value fetched through a session
    type Property: Send;

    /// List UDIDs of all attached devices
    async fn list_udids(&self) -> Result<Vec<String>, DeviceError>;

    /// Open a connection to the device with the given UDID
    async fn connect(&self, udid: &str) -> Result<Self::Connection, DeviceError>;

    /// Perform the lockdown handshake on an open connection
    async fn handshake(
        &self,
        connection: &mut Self::Connection,
        label: &str,
    ) -> Result<Self::Session, DeviceError>;

    /// Read a named value from the device configuration store
    async fn get_value(
        &self,
        session: &mut Self::Session,
        key: &str,
    ) -> Result<Self::Property, DeviceError>;

    /// String contents of a property, if it holds a string
    fn property_string(property: &Self::Property) -> Option<String>;
}
