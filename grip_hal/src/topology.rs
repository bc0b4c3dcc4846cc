//! Device-description validation.
//!
//! Runs once at configure time, before any storage exists. The gripper's
//! structural contract: exactly one command interface per axis and it must be
//! position (the device accepts no velocity or effort commands), exactly two
//! state interfaces per axis drawn from {position, velocity} (effort state is
//! not measured by this device class).
//!
//! Validation is fail-fast per axis and allocates nothing: the registry is
//! built only from a successfully returned [`DeviceTopology`].

use grip_common::config::DeviceDescription;
use grip_common::consts::MAX_AXES;
use grip_common::error::TopologyError;
use grip_common::types::InterfaceKind;

/// Number of state interfaces each axis must declare.
const STATE_INTERFACES_PER_AXIS: usize = 2;

/// One validated axis: name plus the interface kinds it actually exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTopology {
    /// Unique axis name.
    pub name: String,
    /// The single command interface kind (always position on this device).
    pub command_kind: InterfaceKind,
    /// Declared state interface kinds, in declaration order.
    pub state_kinds: Vec<InterfaceKind>,
}

/// Validated interface topology of the whole device.
///
/// Immutable after configure; axis indices used throughout the core are
/// positions in [`DeviceTopology::axes`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTopology {
    /// Validated axes, in exposure order.
    pub axes: Vec<AxisTopology>,
}

impl DeviceTopology {
    /// Number of axes on the device.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Resolve an axis name to its index.
    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|axis| axis.name == name)
    }
}

/// Validate a declared device description against the gripper's contract.
///
/// Reports the first violation encountered; on success, returns the
/// validated topology the registry and arbiter are sized from.
pub fn validate(description: &DeviceDescription) -> Result<DeviceTopology, TopologyError> {
    if description.axes.is_empty() || description.axes.len() > MAX_AXES {
        return Err(TopologyError::AxisCount {
            count: description.axes.len(),
            max: MAX_AXES,
        });
    }

    let mut axes = Vec::with_capacity(description.axes.len());

    for descriptor in &description.axes {
        if axes
            .iter()
            .any(|axis: &AxisTopology| axis.name == descriptor.name)
        {
            return Err(TopologyError::DuplicateAxis {
                axis: descriptor.name.clone(),
            });
        }

        if descriptor.command_interfaces.len() != 1 {
            return Err(TopologyError::CommandInterfaceCount {
                axis: descriptor.name.clone(),
                count: descriptor.command_interfaces.len(),
            });
        }

        let command_kind = descriptor.command_interfaces[0];
        if command_kind != InterfaceKind::Position {
            return Err(TopologyError::UnsupportedCommandKind {
                axis: descriptor.name.clone(),
                kind: command_kind,
            });
        }

        if descriptor.state_interfaces.len() != STATE_INTERFACES_PER_AXIS {
            return Err(TopologyError::StateInterfaceCount {
                axis: descriptor.name.clone(),
                count: descriptor.state_interfaces.len(),
            });
        }

        let mut state_kinds = Vec::with_capacity(STATE_INTERFACES_PER_AXIS);
        for &kind in &descriptor.state_interfaces {
            if kind == InterfaceKind::Effort {
                return Err(TopologyError::UnsupportedStateKind {
                    axis: descriptor.name.clone(),
                    kind,
                });
            }
            if state_kinds.contains(&kind) {
                return Err(TopologyError::DuplicateStateKind {
                    axis: descriptor.name.clone(),
                    kind,
                });
            }
            state_kinds.push(kind);
        }

        axes.push(AxisTopology {
            name: descriptor.name.clone(),
            command_kind,
            state_kinds,
        });
    }

    Ok(DeviceTopology { axes })
}
