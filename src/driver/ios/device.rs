//! Device enumeration and OS version probing

use log::{debug, error, warn};
use std::future::Future;
use std::time::Duration;

use crate::driver::traits::{DeviceBackend, DeviceError};

/// Lockdown key holding the iOS version
pub const PRODUCT_VERSION_KEY: &str = "ProductVersion";

/// Run a native call with an upper bound on how long it may block
async fn bounded<T, F>(timeout: Duration, operation: &str, fut: F) -> Result<T, DeviceError>
where
    F: Future<Output = Result<T, DeviceError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(DeviceError::Timeout {
            operation: operation.to_string(),
            seconds: timeout.as_secs(),
        }),
    }
}

/// List UDIDs of attached devices.
///
/// "No device" is an empty list, not an error. A device attached over both
/// USB and the network is listed once.
pub async fn list_connected_devices<B: DeviceBackend>(
    backend: &B,
    timeout: Duration,
) -> Result<Vec<String>, DeviceError> {
    let udids = match bounded(timeout, "device enumeration", backend.list_udids()).await {
        Ok(udids) => udids,
        Err(DeviceError::NoDevice) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut unique: Vec<String> = Vec::with_capacity(udids.len());
    for udid in udids {
        if !unique.contains(&udid) {
            unique.push(udid);
        }
    }
    debug!("Connected devices: {:?}", unique);
    Ok(unique)
}

/// Read the OS version of a device, or an empty string if any step fails.
///
/// Handles are released in reverse acquisition order on every path:
/// property, then session, then connection.
pub async fn get_os_version<B: DeviceBackend>(
    backend: &B,
    udid: &str,
    label: &str,
    timeout: Duration,
) -> String {
    let mut connection = match bounded(timeout, "device connection", backend.connect(udid)).await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to connect to device with UDID: {} ({})", udid, e);
            return String::new();
        }
    };

    let mut session = match bounded(
        timeout,
        "lockdown handshake",
        backend.handshake(&mut connection, label),
    )
    .await
    {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to start lockdown session with device: {} ({})", udid, e);
            drop(connection);
            return String::new();
        }
    };

    let version = match bounded(
        timeout,
        "version query",
        backend.get_value(&mut session, PRODUCT_VERSION_KEY),
    )
    .await
    {
        Ok(property) => {
            let version = B::property_string(&property).unwrap_or_default();
            if version.is_empty() {
                warn!("{} of {} is not a string", PRODUCT_VERSION_KEY, udid);
            }
            drop(property);
            version
        }
        Err(e) => {
            error!("Failed to retrieve iOS version from device: {} ({})", udid, e);
            String::new()
        }
    };

    drop(session);
    drop(connection);
    version
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, ListBehavior};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_no_device_is_empty_list() {
        let backend = FakeBackend::with_list(ListBehavior::NoDevice);
        let devices = list_connected_devices(&backend, TIMEOUT).await.unwrap();
        assert!(devices.is_empty());

        let backend = FakeBackend::with_devices(&[]);
        let devices = list_connected_devices(&backend, TIMEOUT).await.unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn test_enumeration_failure_is_error() {
        let backend = FakeBackend::with_list(ListBehavior::Fail("usbmuxd not running".into()));
        let err = list_connected_devices(&backend, TIMEOUT).await.unwrap_err();
        assert!(err.to_string().contains("usbmuxd not running"));
    }

    #[tokio::test]
    async fn test_duplicate_udids_collapsed() {
        let backend = FakeBackend::with_devices(&["AAA", "BBB", "AAA"]);
        let devices = list_connected_devices(&backend, TIMEOUT).await.unwrap();
        assert_eq!(devices, vec!["AAA".to_string(), "BBB".to_string()]);
    }

    #[tokio::test]
    async fn test_version_probe_releases_in_reverse_order() {
        let backend = FakeBackend::with_devices(&["AAA"]).version("AAA", "16.0.2");
        let version = get_os_version(&backend, "AAA", "test", TIMEOUT).await;
        assert_eq!(version, "16.0.2");
        assert_eq!(
            backend.events(),
            vec![
                "acquire connection",
                "acquire session",
                "acquire property",
                "release property",
                "release session",
                "release connection",
            ]
        );
    }

    #[tokio::test]
    async fn test_connect_failure_returns_empty() {
        let mut backend = FakeBackend::with_devices(&["AAA"]).version("AAA", "16.0");
        backend.fail_connect = true;
        assert_eq!(get_os_version(&backend, "AAA", "test", TIMEOUT).await, "");
        assert!(backend.events().is_empty());
    }

    #[tokio::test]
    async fn test_handshake_failure_releases_connection() {
        let mut backend = FakeBackend::with_devices(&["AAA"]).version("AAA", "16.0");
        backend.fail_handshake = true;
        assert_eq!(get_os_version(&backend, "AAA", "test", TIMEOUT).await, "");
        assert_eq!(
            backend.events(),
            vec!["acquire connection", "release connection"]
        );
    }

    #[tokio::test]
    async fn test_value_failure_releases_session_then_connection() {
        let mut backend = FakeBackend::with_devices(&["AAA"]).version("AAA", "16.0");
        backend.fail_get_value = true;
        assert_eq!(get_os_version(&backend, "AAA", "test", TIMEOUT).await, "");
        assert_eq!(
            backend.events(),
            vec![
                "acquire connection",
                "acquire session",
                "release session",
                "release connection",
            ]
        );
    }

    #[tokio::test]
    async fn test_hung_handshake_times_out() {
        let mut backend = FakeBackend::with_devices(&["AAA"]).version("AAA", "16.0");
        backend.hang_handshake = true;
        let version = get_os_version(&backend, "AAA", "test", Duration::from_millis(50)).await;
        assert_eq!(version, "");
        assert_eq!(
            backend.events(),
            vec!["acquire connection", "release connection"]
        );
    }
}
