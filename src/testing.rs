//! Fakes for the device backend and the external tool runner

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::driver::traits::{DeviceBackend, DeviceError};
use crate::runner::process::{ToolOutput, ToolRunner};

type EventLog = Arc<Mutex<Vec<String>>>;

/// What the fake enumeration call reports
#[derive(Debug, Clone)]
pub enum ListBehavior {
    Devices(Vec<String>),
    NoDevice,
    Fail(String),
}

/// Handle that records its acquisition and release
pub struct TrackedHandle {
    name: &'static str,
    log: EventLog,
    value: Option<String>,
}

impl TrackedHandle {
    fn acquire(name: &'static str, log: &EventLog, value: Option<String>) -> Self {
        log.lock().unwrap().push(format!("acquire {}", name));
        Self {
            name,
            log: log.clone(),
            value,
        }
    }
}

impl Drop for TrackedHandle {
    fn drop(&mut self) {
        self.log.lock().unwrap().push(format!("release {}", self.name));
    }
}

/// In-memory device backend
pub struct FakeBackend {
    pub list: ListBehavior,
    pub versions: HashMap<String, String>,
    pub fail_connect: bool,
    pub fail_handshake: bool,
    pub fail_get_value: bool,
    pub hang_handshake: bool,
    log: EventLog,
}

impl FakeBackend {
    pub fn with_list(list: ListBehavior) -> Self {
        Self {
            list,
            versions: HashMap::new(),
            fail_connect: false,
            fail_handshake: false,
            fail_get_value: false,
            hang_handshake: false,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_devices(udids: &[&str]) -> Self {
        Self::with_list(ListBehavior::Devices(
            udids.iter().map(|u| u.to_string()).collect(),
        ))
    }

    pub fn version(mut self, udid: &str, version: &str) -> Self {
        self.versions.insert(udid.to_string(), version.to_string());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceBackend for FakeBackend {
    type Connection = TrackedHandle;
    type Session = TrackedHandle;
    type Property = TrackedHandle;

    async fn list_udids(&self) -> Result<Vec<String>, DeviceError> {
        match &self.list {
            ListBehavior::Devices(udids) => Ok(udids.clone()),
            ListBehavior::NoDevice => Err(DeviceError::NoDevice),
            ListBehavior::Fail(message) => Err(DeviceError::Backend(message.clone())),
        }
    }

    async fn connect(&self, udid: &str) -> Result<Self::Connection, DeviceError> {
        if self.fail_connect {
            return Err(DeviceError::Backend("connection refused".into()));
        }
        Ok(TrackedHandle::acquire(
            "connection",
            &self.log,
            Some(udid.to_string()),
        ))
    }

    async fn handshake(
        &self,
        connection: &mut Self::Connection,
        _label: &str,
    ) -> Result<Self::Session, DeviceError> {
        if self.hang_handshake {
            std::future::pending::<()>().await;
        }
        if self.fail_handshake {
            return Err(DeviceError::Backend("handshake rejected".into()));
        }
        Ok(TrackedHandle::acquire(
            "session",
            &self.log,
            connection.value.clone(),
        ))
    }

    async fn get_value(
        &self,
        session: &mut Self::Session,
        _key: &str,
    ) -> Result<Self::Property, DeviceError> {
        if self.fail_get_value {
            return Err(DeviceError::Backend("value unavailable".into()));
        }
        let version = session
            .value
            .as_ref()
            .and_then(|udid| self.versions.get(udid))
            .cloned();
        Ok(TrackedHandle::acquire("property", &self.log, version))
    }

    fn property_string(property: &Self::Property) -> Option<String> {
        property.value.clone()
    }
}

/// One recorded tool invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub tool: String,
    pub args: Vec<String>,
}

/// Tool runner that records invocations instead of spawning processes
#[derive(Clone, Default)]
pub struct RecordingRunner {
    pub invocations: Arc<Mutex<Vec<Invocation>>>,
    pub output: ToolOutput,
    pub fail_spawn: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            output: ToolOutput {
                success: true,
                stdout: String::new(),
                stderr: String::new(),
            },
            ..Default::default()
        }
    }

    pub fn with_output(stdout: &str, stderr: &str, success: bool) -> Self {
        Self {
            output: ToolOutput {
                success,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for RecordingRunner {
    async fn run(&self, tool: &str, args: &[String]) -> Result<ToolOutput> {
        self.invocations.lock().unwrap().push(Invocation {
            tool: tool.to_string(),
            args: args.to_vec(),
        });
        if self.fail_spawn {
            anyhow::bail!("Could not find binary '{}'", tool);
        }
        Ok(self.output.clone())
    }
}

/// Unique scratch directory under the system temp dir
pub fn scratch_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}_{}", prefix, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
