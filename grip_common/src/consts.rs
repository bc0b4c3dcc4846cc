//! Shared constants for the gripper hardware interface.
//!
//! Session timeouts, default ports and the frame-identifier modulus are
//! device-specific values; they are surfaced here as configurable defaults
//! rather than hard-coded at the call sites.

/// Canonical service name (used for logging).
pub const GRIPPER_SERVICE_NAME: &str = "gripper_hal";

/// Maximum number of axes a single device may declare.
pub const MAX_AXES: usize = 8;

/// Default TCP port of the device controller (configuration channel).
pub const DEFAULT_PORT: u16 = 10_000;

/// Default UDP port of the device controller (cyclic real-time channel).
pub const DEFAULT_REALTIME_PORT: u16 = 10_001;

/// Default session inactivity timeout in milliseconds.
pub const DEFAULT_SESSION_INACTIVITY_TIMEOUT_MS: u32 = 60_000;

/// Default connection inactivity timeout in milliseconds.
pub const DEFAULT_CONNECTION_INACTIVITY_TIMEOUT_MS: u32 = 2_000;

/// Default frame-identifier modulus.
///
/// Cyclic command frames carry a monotonically increasing identifier that
/// wraps at this modulus so the device can reject out-of-order frames.
pub const DEFAULT_FRAME_ID_MODULUS: u32 = 65_536;

/// Default controller login user name.
pub const DEFAULT_USERNAME: &str = "admin";

/// Default controller login password.
pub const DEFAULT_PASSWORD: &str = "admin";
