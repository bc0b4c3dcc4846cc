//! Interface registry: state/command slot storage.
//!
//! The registry owns the validated topology plus six per-axis value
//! sequences (measured position/velocity/effort, commanded
//! position/velocity/effort), all NaN until written. The hosting scheduler
//! and the cyclic adapter read and write the same storage through the
//! accessors here, so an externally-written command is visible on the next
//! `write()` with no hand-off copy. Borrow rules guarantee no slot reference
//! outlives the registry.

use crate::topology::DeviceTopology;
use grip_common::types::InterfaceKind;

/// Per-axis state and command slot storage.
///
/// Created from a validated [`DeviceTopology`] at configure time and
/// destroyed with the owning hardware component. All slot access is O(1)
/// by axis index; indices are positions in the topology's axis list.
#[derive(Debug, Clone)]
pub struct InterfaceRegistry {
    topology: DeviceTopology,
    positions: Vec<f64>,
    velocities: Vec<f64>,
    efforts: Vec<f64>,
    commanded_positions: Vec<f64>,
    commanded_velocities: Vec<f64>,
    commanded_efforts: Vec<f64>,
}

impl InterfaceRegistry {
    /// Allocate slot storage for a validated topology, all slots NaN.
    pub fn new(topology: DeviceTopology) -> Self {
        let count = topology.axis_count();
        Self {
            topology,
            positions: vec![f64::NAN; count],
            velocities: vec![f64::NAN; count],
            efforts: vec![f64::NAN; count],
            commanded_positions: vec![f64::NAN; count],
            commanded_velocities: vec![f64::NAN; count],
            commanded_efforts: vec![f64::NAN; count],
        }
    }

    /// The validated topology this registry was sized from.
    pub fn topology(&self) -> &DeviceTopology {
        &self.topology
    }

    /// Number of axes.
    pub fn axis_count(&self) -> usize {
        self.topology.axis_count()
    }

    /// Resolve an axis name to its index.
    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.topology.axis_index(name)
    }

    /// Read a measured state slot.
    pub fn state(&self, axis: usize, kind: InterfaceKind) -> f64 {
        self.state_storage(kind)[axis]
    }

    /// Write a measured state slot (cyclic adapter only).
    pub fn set_state(&mut self, axis: usize, kind: InterfaceKind, value: f64) {
        self.state_storage_mut(kind)[axis] = value;
    }

    /// Read a command slot.
    pub fn command(&self, axis: usize, kind: InterfaceKind) -> f64 {
        self.command_storage(kind)[axis]
    }

    /// Write a command slot.
    pub fn set_command(&mut self, axis: usize, kind: InterfaceKind, value: f64) {
        self.command_storage_mut(kind)[axis] = value;
    }

    /// Mutable reference to a command slot.
    ///
    /// The host-facing equivalent of the exported command interface: writes
    /// land directly in the storage the cyclic adapter sends from.
    pub fn command_slot_mut(&mut self, axis: usize, kind: InterfaceKind) -> &mut f64 {
        &mut self.command_storage_mut(kind)[axis]
    }

    /// Interface keys of every declared state slot, `<axis>/<kind>`.
    ///
    /// Only declared kinds appear; effort state storage exists but is never
    /// exported on this device class.
    pub fn state_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for axis in &self.topology.axes {
            for kind in &axis.state_kinds {
                keys.push(format!("{}/{}", axis.name, kind));
            }
        }
        keys
    }

    /// Interface keys of every declared command slot, `<axis>/<kind>`.
    pub fn command_keys(&self) -> Vec<String> {
        self.topology
            .axes
            .iter()
            .map(|axis| format!("{}/{}", axis.name, axis.command_kind))
            .collect()
    }

    /// Snapshot of every command slot, for before/after comparison in tests
    /// and diagnostics.
    pub fn command_snapshot(&self) -> Vec<f64> {
        let mut snapshot = Vec::with_capacity(self.axis_count() * 3);
        snapshot.extend_from_slice(&self.commanded_positions);
        snapshot.extend_from_slice(&self.commanded_velocities);
        snapshot.extend_from_slice(&self.commanded_efforts);
        snapshot
    }

    fn state_storage(&self, kind: InterfaceKind) -> &[f64] {
        match kind {
            InterfaceKind::Position => &self.positions,
            InterfaceKind::Velocity => &self.velocities,
            InterfaceKind::Effort => &self.efforts,
        }
    }

    fn state_storage_mut(&mut self, kind: InterfaceKind) -> &mut [f64] {
        match kind {
            InterfaceKind::Position => &mut self.positions,
            InterfaceKind::Velocity => &mut self.velocities,
            InterfaceKind::Effort => &mut self.efforts,
        }
    }

    fn command_storage(&self, kind: InterfaceKind) -> &[f64] {
        match kind {
            InterfaceKind::Position => &self.commanded_positions,
            InterfaceKind::Velocity => &self.commanded_velocities,
            InterfaceKind::Effort => &self.commanded_efforts,
        }
    }

    fn command_storage_mut(&mut self, kind: InterfaceKind) -> &mut [f64] {
        match kind {
            InterfaceKind::Position => &mut self.commanded_positions,
            InterfaceKind::Velocity => &mut self.commanded_velocities,
            InterfaceKind::Effort => &mut self.commanded_efforts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::validate;
    use grip_common::config::{AxisDescriptor, DeviceDescription};

    fn registry() -> InterfaceRegistry {
        let description = DeviceDescription {
            axes: vec![AxisDescriptor {
                name: "gripper_joint".to_string(),
                command_interfaces: vec![InterfaceKind::Position],
                state_interfaces: vec![InterfaceKind::Position, InterfaceKind::Velocity],
            }],
        };
        InterfaceRegistry::new(validate(&description).unwrap())
    }

    #[test]
    fn all_slots_initialize_to_nan() {
        let registry = registry();
        for kind in [
            InterfaceKind::Position,
            InterfaceKind::Velocity,
            InterfaceKind::Effort,
        ] {
            assert!(registry.state(0, kind).is_nan());
            assert!(registry.command(0, kind).is_nan());
        }
    }

    #[test]
    fn writes_are_visible_through_reads() {
        let mut registry = registry();
        registry.set_state(0, InterfaceKind::Position, 0.42);
        assert_eq!(registry.state(0, InterfaceKind::Position), 0.42);

        registry.set_command(0, InterfaceKind::Velocity, -1.5);
        assert_eq!(registry.command(0, InterfaceKind::Velocity), -1.5);
    }

    #[test]
    fn command_slot_mut_aliases_storage() {
        let mut registry = registry();
        *registry.command_slot_mut(0, InterfaceKind::Position) = 0.8;
        assert_eq!(registry.command(0, InterfaceKind::Position), 0.8);
    }

    #[test]
    fn exported_keys_follow_declared_topology() {
        let registry = registry();
        assert_eq!(
            registry.state_keys(),
            vec!["gripper_joint/position", "gripper_joint/velocity"]
        );
        assert_eq!(registry.command_keys(), vec!["gripper_joint/position"]);
    }

    #[test]
    fn command_snapshot_covers_all_slots() {
        let mut registry = registry();
        registry.set_command(0, InterfaceKind::Position, 1.0);
        let before = registry.command_snapshot();
        assert_eq!(before.len(), 3);
        assert_eq!(before[0], 1.0);
        assert!(before[1].is_nan() && before[2].is_nan());
    }
}
