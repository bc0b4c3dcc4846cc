//! Gripper configuration types.
//!
//! This module contains the configuration surface of the hardware interface:
//! - `GripperConfig` - Connection parameters loaded from `gripper.toml`
//! - `DeviceDescription` / `AxisDescriptor` - Declared interface topology
//!
//! The session timeouts, ports and frame-identifier modulus default to the
//! device's factory values but are plain config fields, not literals.

use crate::consts::{
    DEFAULT_CONNECTION_INACTIVITY_TIMEOUT_MS, DEFAULT_FRAME_ID_MODULUS, DEFAULT_PORT,
    DEFAULT_REALTIME_PORT, DEFAULT_SESSION_INACTIVITY_TIMEOUT_MS,
};
use crate::error::HalError;
use crate::session::{Credentials, SessionConfig};
use crate::types::InterfaceKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default function for port
fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default function for realtime_port
fn default_realtime_port() -> u16 {
    DEFAULT_REALTIME_PORT
}

/// Default function for session_inactivity_timeout_ms
fn default_session_timeout_ms() -> u32 {
    DEFAULT_SESSION_INACTIVITY_TIMEOUT_MS
}

/// Default function for connection_inactivity_timeout_ms
fn default_connection_timeout_ms() -> u32 {
    DEFAULT_CONNECTION_INACTIVITY_TIMEOUT_MS
}

/// Default function for frame_id_modulus
fn default_frame_id_modulus() -> u32 {
    DEFAULT_FRAME_ID_MODULUS
}

/// Connection configuration loaded from `gripper.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GripperConfig {
    /// Device network address. The one required parameter.
    pub address: String,

    /// Configuration-channel port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Cyclic real-time channel port.
    #[serde(default = "default_realtime_port")]
    pub realtime_port: u16,

    /// Controller login credentials (factory defaults if omitted).
    #[serde(default)]
    pub credentials: Credentials,

    /// Session inactivity timeout in milliseconds.
    #[serde(default = "default_session_timeout_ms")]
    pub session_inactivity_timeout_ms: u32,

    /// Connection inactivity timeout in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_inactivity_timeout_ms: u32,

    /// Frame-identifier wraparound modulus for cyclic commands.
    #[serde(default = "default_frame_id_modulus")]
    pub frame_id_modulus: u32,
}

impl GripperConfig {
    /// Build a config with defaults for everything but the address.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: default_port(),
            realtime_port: default_realtime_port(),
            credentials: Credentials::default(),
            session_inactivity_timeout_ms: default_session_timeout_ms(),
            connection_inactivity_timeout_ms: default_connection_timeout_ms(),
            frame_id_modulus: default_frame_id_modulus(),
        }
    }

    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `address` non-empty
    /// 2. `port` and `realtime_port` nonzero and distinct
    /// 3. `frame_id_modulus` >= 2 (a modulus of 1 would pin every frame to 0)
    pub fn validate(&self) -> Result<(), HalError> {
        if self.address.trim().is_empty() {
            return Err(HalError::Config("address must not be empty".to_string()));
        }

        if self.port == 0 || self.realtime_port == 0 {
            return Err(HalError::Config(format!(
                "ports must be nonzero (port={}, realtime_port={})",
                self.port, self.realtime_port
            )));
        }

        if self.port == self.realtime_port {
            return Err(HalError::Config(format!(
                "port and realtime_port must differ (both {})",
                self.port
            )));
        }

        if self.frame_id_modulus < 2 {
            return Err(HalError::Config(format!(
                "frame_id_modulus must be at least 2, got {}",
                self.frame_id_modulus
            )));
        }

        Ok(())
    }

    /// Derive the session parameters handed to the `SessionFactory`.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            address: self.address.clone(),
            port: self.port,
            realtime_port: self.realtime_port,
            credentials: self.credentials.clone(),
            session_inactivity_timeout_ms: self.session_inactivity_timeout_ms,
            connection_inactivity_timeout_ms: self.connection_inactivity_timeout_ms,
        }
    }
}

/// Declared interfaces of one controllable axis.
///
/// Immutable after configuration; the topology validator checks it against
/// the device's structural contract before any storage is allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    /// Unique axis name.
    pub name: String,
    /// Declared command interface kinds.
    pub command_interfaces: Vec<InterfaceKind>,
    /// Declared state interface kinds.
    pub state_interfaces: Vec<InterfaceKind>,
}

/// Declared interface topology of the whole device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescription {
    /// Controllable axes, in exposure order.
    pub axes: Vec<AxisDescriptor>,
}

/// Load a gripper configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GripperConfig, HalError> {
    let content = fs::read_to_string(path).map_err(|e| {
        HalError::Config(format!("failed to read config file {:?}: {}", path, e))
    })?;

    let config: GripperConfig = toml::from_str(&content).map_err(|e| {
        HalError::Config(format!("failed to parse config file {:?}: {}", path, e))
    })?;

    config.validate()?;
    Ok(config)
}

/// Load a device description from a TOML file.
pub fn load_description(path: &Path) -> Result<DeviceDescription, HalError> {
    let content = fs::read_to_string(path).map_err(|e| {
        HalError::Config(format!("failed to read device description {:?}: {}", path, e))
    })?;

    toml::from_str(&content).map_err(|e| {
        HalError::Config(format!("failed to parse device description {:?}: {}", path, e))
    })
}
