//! Device backend over usbmuxd and lockdown
//!
//! Talks to the local usbmuxd daemon through the `idevice` crate.

use async_trait::async_trait;
use idevice::{
    lockdown::LockdownClient,
    provider::UsbmuxdProvider,
    usbmuxd::{UsbmuxdAddr, UsbmuxdConnection},
    IdeviceError, IdeviceService,
};
use log::debug;

use crate::driver::traits::{DeviceBackend, DeviceError};

/// Backend that reaches devices through usbmuxd
#[derive(Debug, Clone, Default)]
pub struct UsbmuxBackend {
    label: String,
}

impl UsbmuxBackend {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

/// An open usbmuxd connection bound to one device
pub struct UsbmuxConnection {
    udid: String,
    usbmuxd: UsbmuxdConnection,
    provider: UsbmuxdProvider,
}

fn map_error(e: IdeviceError) -> DeviceError {
    match e {
        IdeviceError::DeviceNotFound => DeviceError::NoDevice,
        other => DeviceError::Protocol(other),
    }
}

#[async_trait]
impl DeviceBackend for UsbmuxBackend {
    type Connection = UsbmuxConnection;
    type Session = LockdownClient;
    type Property = plist::Value;

    async fn list_udids(&self) -> Result<Vec<String>, DeviceError> {
        let mut usbmuxd = UsbmuxdConnection::default().await.map_err(map_error)?;
        let devices = usbmuxd.get_devices().await.map_err(map_error)?;
        debug!("usbmuxd reported {} device(s)", devices.len());
        Ok(devices.into_iter().map(|d| d.udid).collect())
    }

    async fn connect(&self, udid: &str) -> Result<Self::Connection, DeviceError> {
        let mut usbmuxd = UsbmuxdConnection::default().await.map_err(map_error)?;
        let device = usbmuxd.get_device(udid).await.map_err(map_error)?;
        let provider = device.to_provider(UsbmuxdAddr::default(), &self.label);
        Ok(UsbmuxConnection {
            udid: udid.to_string(),
            usbmuxd,
            provider,
        })
    }

    async fn handshake(
        &self,
        connection: &mut Self::Connection,
        label: &str,
    ) -> Result<Self::Session, DeviceError> {
        debug!("Starting lockdown session '{}' with {}", label, connection.udid);
        let mut client = LockdownClient::connect(&connection.provider)
            .await
            .map_err(map_error)?;
        let pairing_file = connection
            .usbmuxd
            .get_pair_record(&connection.udid)
            .await
            .map_err(map_error)?;
        client.start_session(&pairing_file).await.map_err(map_error)?;
        Ok(client)
    }

    async fn get_value(
        &self,
        session: &mut Self::Session,
        key: &str,
    ) -> Result<Self::Property, DeviceError> {
        session.get_value(key, None).await.map_err(map_error)
    }

    fn property_string(property: &Self::Property) -> Option<String> {
        property.as_string().map(str::to_string)
    }
}
