//! GripperCore lifecycle controller.
//!
//! `GripperCore` is the main entry point for the hardware interface. It
//! sequences configure → start → (read/write)* → stop, owns the device
//! session for exactly one start/stop pair, and gates every operation on the
//! lifecycle state. Validation and arbitration failures never leave partial
//! state behind; session failures surface as [`HalError::Device`] for the
//! hosting scheduler to act on.

use crate::arbiter::ModeArbiter;
use crate::cyclic::CyclicIo;
use crate::registry::InterfaceRegistry;
use crate::topology::validate;
use grip_common::config::{DeviceDescription, GripperConfig};
use grip_common::error::HalError;
use grip_common::session::{DeviceSession, SessionFactory};
use grip_common::types::{ControlMode, InterfaceKind, LifecycleState};
use tracing::{debug, info, warn};

/// Lifecycle controller binding one gripper device to the hosting framework.
pub struct GripperCore {
    /// Connection configuration
    config: GripperConfig,
    /// Opens device sessions at start()
    factory: Box<dyn SessionFactory>,
    /// Current lifecycle state
    state: LifecycleState,
    /// Slot storage, present from the first successful configure()
    registry: Option<InterfaceRegistry>,
    /// Mode table, sized together with the registry
    arbiter: Option<ModeArbiter>,
    /// Per-cycle read/write adapter
    cyclic: CyclicIo,
    /// Live device session, present only while Started
    session: Option<Box<dyn DeviceSession>>,
}

impl core::fmt::Debug for GripperCore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GripperCore")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("registry", &self.registry)
            .field("arbiter", &self.arbiter)
            .field("cyclic", &self.cyclic)
            .field("session", &self.session.as_ref().map(|_| "DeviceSession"))
            .finish_non_exhaustive()
    }
}

impl GripperCore {
    /// Create a new GripperCore with the given configuration.
    ///
    /// # Errors
    /// Returns [`HalError::Config`] if configuration validation fails.
    pub fn new(config: GripperConfig, factory: Box<dyn SessionFactory>) -> Result<Self, HalError> {
        config.validate()?;

        let cyclic = CyclicIo::new(config.frame_id_modulus);
        info!(
            "GripperCore created for device {} (frame modulus {})",
            config.address, config.frame_id_modulus
        );

        Ok(Self {
            config,
            factory,
            state: LifecycleState::Unconfigured,
            registry: None,
            arbiter: None,
            cyclic,
            session: None,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The interface registry, once configured.
    pub fn registry(&self) -> Option<&InterfaceRegistry> {
        self.registry.as_ref()
    }

    /// Mutable registry access for the hosting scheduler's command writes.
    pub fn registry_mut(&mut self) -> Option<&mut InterfaceRegistry> {
        self.registry.as_mut()
    }

    /// Current per-axis mode table (empty before configure).
    pub fn modes(&self) -> &[ControlMode] {
        self.arbiter.as_ref().map_or(&[], |arbiter| arbiter.modes())
    }

    /// Validate a device description and allocate the interface storage.
    ///
    /// On success the registry and arbiter are (re)built and the component
    /// transitions to Configured. On a validation failure nothing is
    /// allocated and the component transitions to Errored; a fresh
    /// `configure()` may be attempted from there.
    pub fn configure(&mut self, description: &DeviceDescription) -> Result<(), HalError> {
        if self.state == LifecycleState::Started {
            return Err(HalError::InvalidState {
                operation: "configure",
                state: self.state,
            });
        }

        info!("Configuring hardware interface");
        match validate(description) {
            Ok(topology) => {
                let axis_count = topology.axis_count();
                self.registry = Some(InterfaceRegistry::new(topology));
                self.arbiter = Some(ModeArbiter::new(axis_count));
                self.state = LifecycleState::Configured;
                info!("Hardware interface configured with {} axes", axis_count);
                Ok(())
            }
            Err(err) => {
                self.registry = None;
                self.arbiter = None;
                self.state = LifecycleState::Errored;
                warn!("Device description rejected: {}", err);
                Err(err.into())
            }
        }
    }

    /// Propose a control-mode switch (hosting switcher, between cycles).
    ///
    /// Delegates to the [`ModeArbiter`]; rejected proposals leave the mode
    /// table and command slots untouched.
    pub fn propose_switch(&mut self, start: &[String], stop: &[String]) -> Result<(), HalError> {
        let (Some(arbiter), Some(registry)) = (self.arbiter.as_mut(), self.registry.as_mut())
        else {
            return Err(HalError::InvalidState {
                operation: "propose_switch",
                state: self.state,
            });
        };

        arbiter.propose_switch(registry, start, stop)?;
        debug!("Mode switch accepted: {:?}", arbiter.modes());
        Ok(())
    }

    /// Open the device session and seed the value slots.
    ///
    /// Position slots are seeded from a one-time feedback reading when the
    /// device answers; otherwise they stay NaN. Velocity and effort slots
    /// (state and command) seed to zero. The mode table is untouched: a
    /// switch accepted before `start()` stays in force.
    pub fn start(&mut self) -> Result<(), HalError> {
        if self.session.is_some() {
            return Err(HalError::AlreadyStarted);
        }
        if self.registry.is_none()
            || matches!(
                self.state,
                LifecycleState::Unconfigured | LifecycleState::Errored
            )
        {
            return Err(HalError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }

        info!(
            "Connecting to device at {}:{} ...",
            self.config.address, self.config.port
        );
        let mut session = match self.factory.open(&self.config.session_config()) {
            Ok(session) => session,
            Err(err) => {
                self.state = LifecycleState::Errored;
                warn!("Session setup failed: {}", err);
                return Err(err.into());
            }
        };
        info!("Session created");

        self.seed_slots(session.as_mut());

        self.session = Some(session);
        self.state = LifecycleState::Started;
        info!("Hardware interface started");
        Ok(())
    }

    /// Close the session and release every axis.
    ///
    /// Best-effort teardown: safe to call from any state, any number of
    /// times, even after a partially failed `start()`. Close errors are
    /// logged and swallowed.
    pub fn stop(&mut self) {
        info!("Stopping hardware interface");

        if let Some(mut session) = self.session.take() {
            if let Err(err) = session.close() {
                warn!("Session close failed: {}", err);
            }
        }

        if let Some(arbiter) = self.arbiter.as_mut() {
            arbiter.reset();
        }

        self.state = LifecycleState::Stopped;
        info!("Hardware interface stopped");
    }

    /// Cyclic read: copy measured values into the state slots.
    ///
    /// Permitted only while Started; the session is untouched otherwise.
    pub fn read(&mut self) -> Result<(), HalError> {
        if self.state != LifecycleState::Started {
            return Err(HalError::InvalidState {
                operation: "read",
                state: self.state,
            });
        }
        let (Some(session), Some(registry)) = (self.session.as_mut(), self.registry.as_mut())
        else {
            return Err(HalError::InvalidState {
                operation: "read",
                state: self.state,
            });
        };

        self.cyclic.read(session.as_mut(), registry)?;
        Ok(())
    }

    /// Cyclic write: send the active-mode command of each axis.
    ///
    /// Permitted only while Started; the session is untouched otherwise.
    pub fn write(&mut self) -> Result<(), HalError> {
        if self.state != LifecycleState::Started {
            return Err(HalError::InvalidState {
                operation: "write",
                state: self.state,
            });
        }
        let (Some(session), Some(registry), Some(arbiter)) = (
            self.session.as_mut(),
            self.registry.as_ref(),
            self.arbiter.as_ref(),
        ) else {
            return Err(HalError::InvalidState {
                operation: "write",
                state: self.state,
            });
        };

        self.cyclic
            .write(session.as_mut(), registry, arbiter.modes())?;
        Ok(())
    }

    /// Seed NaN slots with start-time defaults.
    fn seed_slots(&mut self, session: &mut dyn DeviceSession) {
        let Some(registry) = self.registry.as_mut() else {
            return;
        };
        let axis_count = registry.axis_count();

        match session.refresh_feedback() {
            Ok(feedback) if feedback.axes.len() == axis_count => {
                for axis in 0..axis_count {
                    let measured = feedback.axes[axis].position;
                    if registry.state(axis, InterfaceKind::Position).is_nan() {
                        registry.set_state(axis, InterfaceKind::Position, measured);
                    }
                    if registry.command(axis, InterfaceKind::Position).is_nan() {
                        registry.set_command(axis, InterfaceKind::Position, measured);
                    }
                }
                debug!("Position slots seeded from initial device reading");
            }
            Ok(feedback) => {
                warn!(
                    "Initial feedback covers {} axes, {} expected; position slots stay NaN",
                    feedback.axes.len(),
                    axis_count
                );
            }
            Err(err) => {
                warn!(
                    "Initial feedback unavailable ({}); position slots stay NaN",
                    err
                );
            }
        }

        for axis in 0..axis_count {
            for kind in [InterfaceKind::Velocity, InterfaceKind::Effort] {
                if registry.state(axis, kind).is_nan() {
                    registry.set_state(axis, kind, 0.0);
                }
                if registry.command(axis, kind).is_nan() {
                    registry.set_command(axis, kind, 0.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimFactory;
    use grip_common::config::AxisDescriptor;

    fn description() -> DeviceDescription {
        DeviceDescription {
            axes: vec![AxisDescriptor {
                name: "gripper_joint".to_string(),
                command_interfaces: vec![InterfaceKind::Position],
                state_interfaces: vec![InterfaceKind::Position, InterfaceKind::Velocity],
            }],
        }
    }

    fn core() -> GripperCore {
        GripperCore::new(
            GripperConfig::with_address("192.168.1.10"),
            Box::new(SimFactory::default()),
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = GripperCore::new(
            GripperConfig::with_address(""),
            Box::new(SimFactory::default()),
        )
        .unwrap_err();
        assert!(matches!(err, HalError::Config(_)));
    }

    #[test]
    fn configure_transitions_and_allocates() {
        let mut core = core();
        assert_eq!(core.state(), LifecycleState::Unconfigured);
        core.configure(&description()).unwrap();
        assert_eq!(core.state(), LifecycleState::Configured);
        assert_eq!(core.registry().unwrap().axis_count(), 1);
        assert_eq!(core.modes(), &[ControlMode::Undefined]);
    }

    #[test]
    fn failed_configure_errors_and_allocates_nothing() {
        let mut core = core();
        let mut bad = description();
        bad.axes[0].command_interfaces = vec![InterfaceKind::Velocity];

        let err = core.configure(&bad).unwrap_err();
        assert!(matches!(err, HalError::Topology(_)));
        assert_eq!(core.state(), LifecycleState::Errored);
        assert!(core.registry().is_none());

        // Errored is terminal only until a fresh configure succeeds.
        core.configure(&description()).unwrap();
        assert_eq!(core.state(), LifecycleState::Configured);
    }

    #[test]
    fn start_requires_configuration() {
        let mut core = core();
        let err = core.start().unwrap_err();
        assert!(matches!(
            err,
            HalError::InvalidState {
                operation: "start",
                ..
            }
        ));
    }

    #[test]
    fn double_start_is_rejected() {
        let mut core = core();
        core.configure(&description()).unwrap();
        core.start().unwrap();
        assert!(matches!(core.start(), Err(HalError::AlreadyStarted)));
    }

    #[test]
    fn stop_is_safe_from_any_state() {
        let mut core = core();
        core.stop();
        assert_eq!(core.state(), LifecycleState::Stopped);
        core.stop();
        assert_eq!(core.state(), LifecycleState::Stopped);
    }

    #[test]
    fn start_seeds_velocity_and_effort_to_zero() {
        let mut core = core();
        core.configure(&description()).unwrap();
        core.start().unwrap();

        let registry = core.registry().unwrap();
        assert_eq!(registry.state(0, InterfaceKind::Velocity), 0.0);
        assert_eq!(registry.command(0, InterfaceKind::Velocity), 0.0);
        assert_eq!(registry.command(0, InterfaceKind::Effort), 0.0);
        // Position seeded from the simulated device's initial reading.
        assert!(!registry.state(0, InterfaceKind::Position).is_nan());
        assert_eq!(
            registry.command(0, InterfaceKind::Position),
            registry.state(0, InterfaceKind::Position)
        );
    }

    #[test]
    fn configure_rejected_while_started() {
        let mut core = core();
        core.configure(&description()).unwrap();
        core.start().unwrap();
        assert!(matches!(
            core.configure(&description()),
            Err(HalError::InvalidState { .. })
        ));
    }

    #[test]
    fn connect_failure_surfaces_and_errors() {
        let mut core = GripperCore::new(
            GripperConfig::with_address("192.168.1.10"),
            Box::new(SimFactory::refusing_connections()),
        )
        .unwrap();
        core.configure(&description()).unwrap();

        let err = core.start().unwrap_err();
        assert!(matches!(err, HalError::Device(_)));
        assert_eq!(core.state(), LifecycleState::Errored);

        // stop() stays safe after the failed start.
        core.stop();
        assert_eq!(core.state(), LifecycleState::Stopped);
    }
}
