//! Control-mode arbitration.
//!
//! The arbiter owns the per-axis mode table and is the only writer of it.
//! The hosting scheduler's controller switcher proposes start/stop interface
//! key sets between cycles; the arbiter validates the batch and commits it
//! atomically. Pure policy: no device I/O happens here.
//!
//! A rejected proposal leaves the mode table and every command slot exactly
//! as they were. Releases (including the commanded velocity/effort zeroing)
//! are staged and applied only once the whole batch has passed.

use crate::registry::InterfaceRegistry;
use grip_common::error::SwitchError;
use grip_common::types::{ControlMode, InterfaceKind};

/// Per-axis control-mode state machine.
///
/// All axes start `Undefined` (no controller owns them) and return to
/// `Undefined` on release and on `stop()`.
#[derive(Debug, Clone)]
pub struct ModeArbiter {
    modes: Vec<ControlMode>,
}

impl ModeArbiter {
    /// Create an arbiter with every axis released.
    pub fn new(axis_count: usize) -> Self {
        Self {
            modes: vec![ControlMode::Undefined; axis_count],
        }
    }

    /// Release every axis.
    pub fn reset(&mut self) {
        self.modes.fill(ControlMode::Undefined);
    }

    /// Current mode of one axis.
    pub fn mode(&self, axis: usize) -> ControlMode {
        self.modes[axis]
    }

    /// Current mode table, indexed by axis.
    pub fn modes(&self) -> &[ControlMode] {
        &self.modes
    }

    /// Validate and atomically apply a mode-switch request.
    ///
    /// Keys use the hosting framework's `<axis-name>/<interface-kind>`
    /// convention. The batch is checked in order:
    ///
    /// 1. every start key must resolve to a known axis/kind pair
    /// 2. the start set must cover every axis (all-or-nothing switching)
    /// 3. all requested modes must be identical (single uniform device mode)
    /// 4. stop keys release their axes; unmatched stop keys are a no-op
    /// 5. every axis must be released before the new mode applies
    ///
    /// On success the new mode table is committed and each released axis's
    /// commanded velocity and effort slots are zeroed. On any failure
    /// nothing changes.
    pub fn propose_switch(
        &mut self,
        registry: &mut InterfaceRegistry,
        start: &[String],
        stop: &[String],
    ) -> Result<(), SwitchError> {
        let topology = registry.topology();
        let axis_count = topology.axis_count();

        // 1. Resolve the start set.
        let mut requested: Vec<(usize, ControlMode)> = Vec::with_capacity(start.len());
        for key in start {
            let resolved = key.rsplit_once('/').and_then(|(name, kind)| {
                let axis = topology.axis_index(name)?;
                let kind = InterfaceKind::parse(kind)?;
                Some((axis, ControlMode::from(kind)))
            });
            match resolved {
                Some(pair) => requested.push(pair),
                None => {
                    return Err(SwitchError::UnresolvedInterface { key: key.clone() });
                }
            }
        }

        // 2. All axes must switch together.
        if requested.len() != axis_count {
            return Err(SwitchError::PartialSwitch {
                requested: requested.len(),
                expected: axis_count,
            });
        }

        // 3. A single uniform mode across the device.
        let target = requested[0].1;
        if let Some(&(_, other)) = requested.iter().find(|&&(_, mode)| mode != target) {
            return Err(SwitchError::MixedMode {
                first: target,
                other,
            });
        }

        // 4. Stage releases from the stop set on a scratch table. Stopping
        //    an axis nobody claims is a no-op, not an error.
        let mut next = self.modes.clone();
        let mut released: Vec<usize> = Vec::new();
        for key in stop {
            let name = key.rsplit_once('/').map_or(key.as_str(), |(name, _)| name);
            if let Some(axis) = topology.axis_index(name) {
                next[axis] = ControlMode::Undefined;
                if !released.contains(&axis) {
                    released.push(axis);
                }
            }
        }

        // 5. No axis may still be claimed by another controller.
        for (axis, mode) in next.iter().enumerate() {
            if *mode != ControlMode::Undefined {
                return Err(SwitchError::AxisBusy {
                    axis: topology.axes[axis].name.clone(),
                    mode: *mode,
                });
            }
        }
        next.fill(target);

        // 6. Commit: zero the released command slots, swap the table.
        for axis in released {
            registry.set_command(axis, InterfaceKind::Velocity, 0.0);
            registry.set_command(axis, InterfaceKind::Effort, 0.0);
        }
        self.modes = next;
        Ok(())
    }
}
