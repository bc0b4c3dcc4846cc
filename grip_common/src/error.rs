//! Error types for the gripper hardware interface.
//!
//! This module defines:
//! - `TopologyError` - Malformed device description (fatal at configure)
//! - `SwitchError` - Mode-switch policy violations (recoverable, no partial commit)
//! - `HalError` - Umbrella error returned by the lifecycle controller

use crate::session::DeviceError;
use crate::types::{ControlMode, InterfaceKind, LifecycleState};
use thiserror::Error;

/// Structural violations in a device description.
///
/// Validation is fail-fast per axis: the first violation encountered is
/// reported and nothing is allocated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    /// Wrong number of command interfaces declared on an axis.
    #[error("axis '{axis}' declares {count} command interfaces, exactly 1 expected")]
    CommandInterfaceCount {
        /// Offending axis name
        axis: String,
        /// Declared count
        count: usize,
    },

    /// Command interface of an unsupported kind.
    #[error("axis '{axis}' declares '{kind}' command interface, only 'position' is supported")]
    UnsupportedCommandKind {
        /// Offending axis name
        axis: String,
        /// Declared kind
        kind: InterfaceKind,
    },

    /// Wrong number of state interfaces declared on an axis.
    #[error("axis '{axis}' declares {count} state interfaces, exactly 2 expected")]
    StateInterfaceCount {
        /// Offending axis name
        axis: String,
        /// Declared count
        count: usize,
    },

    /// State interface of an unsupported kind.
    #[error("axis '{axis}' declares '{kind}' state interface, expected 'position' or 'velocity'")]
    UnsupportedStateKind {
        /// Offending axis name
        axis: String,
        /// Declared kind
        kind: InterfaceKind,
    },

    /// The same state interface kind declared twice on one axis.
    #[error("axis '{axis}' declares state interface '{kind}' more than once")]
    DuplicateStateKind {
        /// Offending axis name
        axis: String,
        /// Repeated kind
        kind: InterfaceKind,
    },

    /// Two axes share a name.
    #[error("duplicate axis name '{axis}'")]
    DuplicateAxis {
        /// Repeated axis name
        axis: String,
    },

    /// Axis count outside the supported range.
    #[error("device declares {count} axes, expected 1..={max}")]
    AxisCount {
        /// Declared count
        count: usize,
        /// Maximum supported
        max: usize,
    },
}

/// Mode-switch policy violations.
///
/// A rejected switch leaves the mode table and all command slots untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwitchError {
    /// A start key matched no known axis/interface pair.
    #[error("interface key '{key}' does not match any axis/interface pair")]
    UnresolvedInterface {
        /// Offending key
        key: String,
    },

    /// The start set does not cover every axis (all-or-nothing switching).
    #[error("switch covers {requested} of {expected} axes, all axes must switch together")]
    PartialSwitch {
        /// Resolved start requests
        requested: usize,
        /// Total axes on the device
        expected: usize,
    },

    /// The start set requests different modes for different axes.
    #[error("switch mixes control modes '{first}' and '{other}', a single uniform mode is required")]
    MixedMode {
        /// Mode of the first resolved request
        first: ControlMode,
        /// First differing mode
        other: ControlMode,
    },

    /// An axis is still claimed by another mode.
    #[error("axis '{axis}' is still claimed in '{mode}' mode")]
    AxisBusy {
        /// Busy axis name
        axis: String,
        /// Mode currently holding the axis
        mode: ControlMode,
    },
}

/// Umbrella error for all hardware-interface operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HalError {
    /// Malformed device description.
    #[error("device topology error: {0}")]
    Topology(#[from] TopologyError),

    /// Mode-switch proposal rejected.
    #[error("mode switch rejected: {0}")]
    Switch(#[from] SwitchError),

    /// Operation called outside its valid lifecycle state.
    #[error("'{operation}' called in '{state}' state")]
    InvalidState {
        /// Rejected operation
        operation: &'static str,
        /// Lifecycle state at the time of the call
        state: LifecycleState,
    },

    /// `start()` called while a session is already open.
    #[error("session already started")]
    AlreadyStarted,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Session-layer failure, surfaced to the caller without retry.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}
