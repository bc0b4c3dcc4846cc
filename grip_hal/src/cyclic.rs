//! Cyclic I/O adapter.
//!
//! The per-cycle boundary between the interface registry and the device
//! session. `read()` copies the latest measured values into the declared
//! state slots; `write()` sends one command frame carrying, per axis, only
//! the command of the currently-active mode. Neither call retries: a
//! [`DeviceError`] surfaces to the lifecycle controller and the hosting
//! scheduler decides what happens next cycle.
//!
//! Command frames carry a monotonically increasing identifier wrapping at
//! the configured modulus, so the device can reject out-of-order frames.

use crate::registry::InterfaceRegistry;
use grip_common::session::{DeviceError, DeviceSession};
use grip_common::types::{AxisTarget, CommandFrame, ControlMode, InterfaceKind};

/// Per-cycle read/write adapter owning the wrapping frame counter.
#[derive(Debug, Clone)]
pub struct CyclicIo {
    frame_id: u32,
    frame_id_modulus: u32,
}

impl CyclicIo {
    /// Create an adapter with the given frame-identifier modulus.
    pub fn new(frame_id_modulus: u32) -> Self {
        Self {
            frame_id: 0,
            frame_id_modulus,
        }
    }

    /// Identifier of the most recently issued frame.
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    /// Copy the device's measured values into the declared state slots.
    ///
    /// Only the state kinds each axis declares are written; the registry's
    /// effort state storage stays NaN on this device class.
    pub fn read(
        &mut self,
        session: &mut dyn DeviceSession,
        registry: &mut InterfaceRegistry,
    ) -> Result<(), DeviceError> {
        let feedback = session.refresh_feedback()?;

        let expected = registry.axis_count();
        if feedback.axes.len() != expected {
            return Err(DeviceError::MalformedFeedback {
                expected,
                actual: feedback.axes.len(),
            });
        }

        for axis in 0..expected {
            let measured = feedback.axes[axis];
            let kind_count = registry.topology().axes[axis].state_kinds.len();
            for slot in 0..kind_count {
                let kind = registry.topology().axes[axis].state_kinds[slot];
                let value = match kind {
                    InterfaceKind::Position => measured.position,
                    InterfaceKind::Velocity => measured.velocity,
                    // Effort state is rejected by the topology validator.
                    InterfaceKind::Effort => continue,
                };
                registry.set_state(axis, kind, value);
            }
        }

        Ok(())
    }

    /// Send one command frame with the active-mode command of each axis.
    ///
    /// Axes whose mode is `Undefined` contribute nothing to the frame.
    /// The frame identifier advances whether or not the device accepts the
    /// frame; a rejected identifier is never reused.
    pub fn write(
        &mut self,
        session: &mut dyn DeviceSession,
        registry: &InterfaceRegistry,
        modes: &[ControlMode],
    ) -> Result<(), DeviceError> {
        self.frame_id = (self.frame_id + 1) % self.frame_id_modulus;

        let mut frame = CommandFrame {
            frame_id: self.frame_id,
            targets: heapless::Vec::new(),
        };

        for (axis, &mode) in modes.iter().enumerate() {
            if let Some(kind) = mode.command_kind() {
                let value = registry.command(axis, kind);
                // Capacity MAX_AXES matches the validator's axis bound.
                let _ = frame.targets.push(AxisTarget { axis, mode, value });
            }
        }

        session.send_command(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::validate;
    use grip_common::config::{AxisDescriptor, DeviceDescription};
    use grip_common::types::{AxisFeedback, Feedback};

    /// Session stub recording sent frames and serving canned feedback.
    struct StubSession {
        feedback: Result<Feedback, DeviceError>,
        sent: Vec<CommandFrame>,
        reject_send: bool,
    }

    impl StubSession {
        fn with_feedback(axes: &[(f64, f64)]) -> Self {
            let mut feedback = Feedback::default();
            for &(position, velocity) in axes {
                feedback
                    .axes
                    .push(AxisFeedback { position, velocity })
                    .unwrap();
            }
            Self {
                feedback: Ok(feedback),
                sent: Vec::new(),
                reject_send: false,
            }
        }
    }

    impl DeviceSession for StubSession {
        fn refresh_feedback(&mut self) -> Result<Feedback, DeviceError> {
            self.feedback.clone()
        }

        fn send_command(&mut self, frame: &CommandFrame) -> Result<(), DeviceError> {
            if self.reject_send {
                return Err(DeviceError::CommandRejected {
                    frame_id: frame.frame_id,
                    reason: "stub rejection".to_string(),
                });
            }
            self.sent.push(frame.clone());
            Ok(())
        }

        fn close(&mut self) -> Result<(), DeviceError> {
            Ok(())
        }
    }

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
    fn read_copies_declared_state_kinds_only() {
        let mut session = StubSession::with_feedback(&[(0.42, -0.1)]);
        let mut registry = registry();
        let mut cyclic = CyclicIo::new(65_536);

        cyclic.read(&mut session, &mut registry).unwrap();
        assert_eq!(registry.state(0, InterfaceKind::Position), 0.42);
        assert_eq!(registry.state(0, InterfaceKind::Velocity), -0.1);
        // Effort state is allocated but never exported nor written.
        assert!(registry.state(0, InterfaceKind::Effort).is_nan());
    }

    #[test]
    fn read_surfaces_refresh_failure() {
        let mut session = StubSession::with_feedback(&[]);
        session.feedback = Err(DeviceError::RefreshFailed("link down".to_string()));
        let mut registry = registry();
        let mut cyclic = CyclicIo::new(65_536);

        let err = cyclic.read(&mut session, &mut registry).unwrap_err();
        assert!(matches!(err, DeviceError::RefreshFailed(_)));
        assert!(registry.state(0, InterfaceKind::Position).is_nan());
    }

    #[test]
    fn read_rejects_short_feedback() {
        let mut session = StubSession::with_feedback(&[]);
        let mut registry = registry();
        let mut cyclic = CyclicIo::new(65_536);

        let err = cyclic.read(&mut session, &mut registry).unwrap_err();
        assert_eq!(
            err,
            DeviceError::MalformedFeedback {
                expected: 1,
                actual: 0,
            }
        );
    }

    #[test]
    fn write_sends_only_the_active_mode_command() {
        let mut session = StubSession::with_feedback(&[(0.0, 0.0)]);
        let mut registry = registry();
        let mut cyclic = CyclicIo::new(65_536);

        registry.set_command(0, InterfaceKind::Position, 0.8);
        registry.set_command(0, InterfaceKind::Velocity, 9.9);
        registry.set_command(0, InterfaceKind::Effort, 5.5);

        cyclic
            .write(&mut session, &registry, &[ControlMode::Position])
            .unwrap();

        let frame = &session.sent[0];
        assert_eq!(frame.frame_id, 1);
        assert_eq!(frame.targets.len(), 1);
        assert_eq!(
            frame.targets[0],
            AxisTarget {
                axis: 0,
                mode: ControlMode::Position,
                value: 0.8,
            }
        );
    }

    #[test]
    fn undefined_axes_send_nothing() {
        let mut session = StubSession::with_feedback(&[(0.0, 0.0)]);
        let registry = registry();
        let mut cyclic = CyclicIo::new(65_536);

        cyclic
            .write(&mut session, &registry, &[ControlMode::Undefined])
            .unwrap();
        assert!(session.sent[0].targets.is_empty());
    }

    #[test]
    fn frame_id_wraps_at_the_configured_modulus() {
        let mut session = StubSession::with_feedback(&[(0.0, 0.0)]);
        let registry = registry();
        let mut cyclic = CyclicIo::new(4);

        let mut seen = Vec::new();
        for _ in 0..6 {
            cyclic
                .write(&mut session, &registry, &[ControlMode::Undefined])
                .unwrap();
            seen.push(cyclic.frame_id());
        }
        assert_eq!(seen, vec![1, 2, 3, 0, 1, 2]);
    }

    #[test]
    fn rejected_frame_id_is_not_reused() {
        let mut session = StubSession::with_feedback(&[(0.0, 0.0)]);
        let registry = registry();
        let mut cyclic = CyclicIo::new(65_536);

        session.reject_send = true;
        let err = cyclic
            .write(&mut session, &registry, &[ControlMode::Undefined])
            .unwrap_err();
        assert!(matches!(err, DeviceError::CommandRejected { frame_id: 1, .. }));

        session.reject_send = false;
        cyclic
            .write(&mut session, &registry, &[ControlMode::Undefined])
            .unwrap();
        assert_eq!(session.sent[0].frame_id, 2);
    }
}
