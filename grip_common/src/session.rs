//! Device-session boundary.
//!
//! This module defines:
//! - `DeviceSession` trait - Live connection to the physical controller
//! - `SessionFactory` trait - Opens sessions from connection parameters
//! - `SessionConfig` / `Credentials` - Connection parameters
//! - `DeviceError` - Session-layer failures
//!
//! The core treats the session as an opaque capability: the vendor transport,
//! protocol framing and command encoding all live behind these traits.

use crate::consts::{DEFAULT_PASSWORD, DEFAULT_USERNAME};
use crate::types::{CommandFrame, Feedback};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session-layer failures.
///
/// Never retried internally; the hosting scheduler decides whether to retry
/// on the next cycle or escalate to `stop()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    /// Transport-level connection failed.
    #[error("connection to {address}:{port} failed: {reason}")]
    ConnectFailed {
        /// Device network address
        address: String,
        /// Port the connection targeted
        port: u16,
        /// Transport-reported reason
        reason: String,
    },

    /// The controller refused the session (bad credentials, busy, ...).
    #[error("session rejected: {0}")]
    SessionRejected(String),

    /// Feedback refresh failed.
    #[error("feedback refresh failed: {0}")]
    RefreshFailed(String),

    /// Feedback did not cover every declared axis.
    #[error("feedback covers {actual} axes, {expected} expected")]
    MalformedFeedback {
        /// Axes the device description declares
        expected: usize,
        /// Axes the feedback actually carried
        actual: usize,
    },

    /// The device rejected a cyclic command frame.
    #[error("command frame {frame_id} rejected: {reason}")]
    CommandRejected {
        /// Identifier of the rejected frame
        frame_id: u32,
        /// Device-reported reason
        reason: String,
    },

    /// The session is gone (closed or dropped by the peer).
    #[error("session closed")]
    SessionClosed,
}

/// Controller login credentials.
///
/// Defaults to the controller's factory login; a future collaborator may
/// supply real credentials through `GripperConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login user name.
    #[serde(default = "default_username")]
    pub username: String,
    /// Login password.
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_password() -> String {
    DEFAULT_PASSWORD.to_string()
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

/// Connection parameters handed to a [`SessionFactory`].
///
/// Derived from `GripperConfig`; the timeouts and ports are device-specific
/// values surfaced as configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Device network address.
    pub address: String,
    /// Configuration-channel port.
    pub port: u16,
    /// Cyclic real-time channel port.
    pub realtime_port: u16,
    /// Controller login credentials.
    pub credentials: Credentials,
    /// Session inactivity timeout in milliseconds.
    pub session_inactivity_timeout_ms: u32,
    /// Connection inactivity timeout in milliseconds.
    pub connection_inactivity_timeout_ms: u32,
}

/// Live connection to the physical device.
///
/// # Lifecycle
///
/// 1. Opened once by a [`SessionFactory`] at `start()`
/// 2. `refresh_feedback()` / `send_command()` called once per control cycle
/// 3. `close()` called once at `stop()`
///
/// # Timing
///
/// Both cyclic calls may block briefly on the underlying transport but carry
/// no internal timeout; deadline enforcement is the hosting scheduler's job.
pub trait DeviceSession: Send {
    /// Fetch the latest measured values for every axis.
    fn refresh_feedback(&mut self) -> Result<Feedback, DeviceError>;

    /// Send one cyclic command frame.
    ///
    /// The device rejects frames whose identifier falls outside its
    /// out-of-order window; such rejections surface as
    /// [`DeviceError::CommandRejected`].
    fn send_command(&mut self, frame: &CommandFrame) -> Result<(), DeviceError>;

    /// Close the session.
    ///
    /// Called from `stop()`, which is best-effort: errors are logged by the
    /// caller and never propagate past the lifecycle boundary.
    fn close(&mut self) -> Result<(), DeviceError>;
}

/// Opens device sessions.
///
/// The factory bundles the transport's connect + create-session handshake
/// into one call, so the lifecycle controller never sees a half-open link.
pub trait SessionFactory: Send {
    /// Connect and authenticate, returning a live session.
    fn open(&self, config: &SessionConfig) -> Result<Box<dyn DeviceSession>, DeviceError>;
}
