//! Core types for the gripper hardware interface.
//!
//! This module defines:
//! - `InterfaceKind` - Joint interface kinds exposed to the hosting framework
//! - `ControlMode` - Exclusive per-axis command mode
//! - `LifecycleState` - Hardware component lifecycle
//! - `Feedback` / `CommandFrame` - Per-cycle session payloads

use crate::consts::MAX_AXES;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Joint interface kind as understood by the hosting framework.
///
/// The lowercase form is the wire name used in interface keys
/// (`<axis-name>/<interface-kind>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    /// Position interface
    Position,
    /// Velocity interface
    Velocity,
    /// Effort interface
    Effort,
}

impl InterfaceKind {
    /// Lowercase wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            InterfaceKind::Position => "position",
            InterfaceKind::Velocity => "velocity",
            InterfaceKind::Effort => "effort",
        }
    }

    /// Parse a wire name back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "position" => Some(InterfaceKind::Position),
            "velocity" => Some(InterfaceKind::Velocity),
            "effort" => Some(InterfaceKind::Effort),
            _ => None,
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exclusive control mode of one axis.
///
/// Exactly one mode is active per axis at any time. `Undefined` means no
/// controller currently owns the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// No controller owns the axis.
    #[default]
    Undefined,
    /// Position commands govern the axis.
    Position,
    /// Velocity commands govern the axis.
    Velocity,
    /// Effort commands govern the axis.
    Effort,
}

impl ControlMode {
    /// Interface kind carrying commands for this mode, if any.
    pub const fn command_kind(self) -> Option<InterfaceKind> {
        match self {
            ControlMode::Undefined => None,
            ControlMode::Position => Some(InterfaceKind::Position),
            ControlMode::Velocity => Some(InterfaceKind::Velocity),
            ControlMode::Effort => Some(InterfaceKind::Effort),
        }
    }
}

impl From<InterfaceKind> for ControlMode {
    fn from(kind: InterfaceKind) -> Self {
        match kind {
            InterfaceKind::Position => ControlMode::Position,
            InterfaceKind::Velocity => ControlMode::Velocity,
            InterfaceKind::Effort => ControlMode::Effort,
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlMode::Undefined => "undefined",
            ControlMode::Position => "position",
            ControlMode::Velocity => "velocity",
            ControlMode::Effort => "effort",
        };
        f.write_str(name)
    }
}

/// Lifecycle state of the hardware component.
///
/// `Errored` is terminal until a fresh `configure()` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Created, no device description accepted yet.
    #[default]
    Unconfigured,
    /// Description validated, storage allocated.
    Configured,
    /// Session open, cyclic I/O permitted.
    Started,
    /// Session closed.
    Stopped,
    /// Unrecoverable failure.
    Errored,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Unconfigured => "unconfigured",
            LifecycleState::Configured => "configured",
            LifecycleState::Started => "started",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// Measured values for one axis, as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFeedback {
    /// Measured position in device units.
    pub position: f64,
    /// Measured velocity in device units.
    pub velocity: f64,
}

/// One feedback refresh from the device, indexed by axis.
///
/// Fixed-capacity so the cyclic read path performs no heap allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feedback {
    /// Per-axis measured values.
    pub axes: heapless::Vec<AxisFeedback, MAX_AXES>,
}

/// Command for one axis, valid for the axis's active control mode only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTarget {
    /// Axis index within the device description.
    pub axis: usize,
    /// Mode the value belongs to (never `Undefined` inside a frame).
    pub mode: ControlMode,
    /// Commanded value in device units.
    pub value: f64,
}

/// One cyclic command frame sent to the device.
///
/// The frame identifier increases monotonically and wraps at the configured
/// modulus; the device uses it to reject out-of-order frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandFrame {
    /// Wrapping frame identifier.
    pub frame_id: u32,
    /// Per-axis targets; axes without an active mode are absent.
    pub targets: heapless::Vec<AxisTarget, MAX_AXES>,
}
