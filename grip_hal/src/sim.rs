//! Simulation session backend.
//!
//! In-process stand-in for the physical controller, used by the integration
//! tests, the bench and the runnable example. Position targets apply
//! instantly, duplicate frame identifiers are rejected the way the real
//! device's out-of-order window would, and faults (connection refusal,
//! feedback failures, command rejection) can be injected per device.
//!
//! The factory and every session it opens share one [`SimDevice`] behind a
//! mutex, so a test can hold a handle and inspect sent frames or flip fault
//! switches while the core owns the session.

use grip_common::session::{DeviceError, DeviceSession, SessionConfig, SessionFactory};
use grip_common::types::{AxisFeedback, CommandFrame, ControlMode, Feedback};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Default initial position of every simulated axis.
const DEFAULT_INITIAL_POSITION: f64 = 0.25;

/// One simulated axis.
#[derive(Debug, Clone, Copy)]
pub struct SimAxis {
    /// Current position in device units.
    pub position: f64,
    /// Current velocity in device units.
    pub velocity: f64,
}

/// Shared state of one simulated device.
#[derive(Debug, Default)]
pub struct SimDevice {
    /// Simulated axes.
    pub axes: Vec<SimAxis>,
    /// Every frame accepted so far, oldest first.
    pub sent_frames: Vec<CommandFrame>,
    /// Fail this many upcoming feedback refreshes.
    pub refresh_failures: u32,
    /// Reject every incoming command frame while set.
    pub reject_commands: bool,
    /// True once the session was closed.
    pub closed: bool,
    last_frame_id: Option<u32>,
}

impl SimDevice {
    fn with_axes(count: usize) -> Self {
        Self {
            axes: vec![
                SimAxis {
                    position: DEFAULT_INITIAL_POSITION,
                    velocity: 0.0,
                };
                count
            ],
            ..Self::default()
        }
    }
}

/// Session factory for the simulated device.
pub struct SimFactory {
    device: Arc<Mutex<SimDevice>>,
    refuse_connections: bool,
}

impl SimFactory {
    /// Simulated device with the given axis count.
    pub fn new(axis_count: usize) -> Self {
        Self {
            device: Arc::new(Mutex::new(SimDevice::with_axes(axis_count))),
            refuse_connections: false,
        }
    }

    /// Factory whose `open()` always fails, for connect-failure tests.
    pub fn refusing_connections() -> Self {
        Self {
            refuse_connections: true,
            ..Self::new(1)
        }
    }

    /// Handle to the shared device state.
    pub fn device(&self) -> Arc<Mutex<SimDevice>> {
        Arc::clone(&self.device)
    }
}

impl Default for SimFactory {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SessionFactory for SimFactory {
    fn open(&self, config: &SessionConfig) -> Result<Box<dyn DeviceSession>, DeviceError> {
        if self.refuse_connections {
            return Err(DeviceError::ConnectFailed {
                address: config.address.clone(),
                port: config.port,
                reason: "simulated connection refusal".to_string(),
            });
        }

        debug!(
            "Simulated session to {}:{} as '{}'",
            config.address, config.port, config.credentials.username
        );
        lock(&self.device).closed = false;
        Ok(Box::new(SimSession {
            device: Arc::clone(&self.device),
        }))
    }
}

/// Session over a shared [`SimDevice`].
struct SimSession {
    device: Arc<Mutex<SimDevice>>,
}

impl DeviceSession for SimSession {
    fn refresh_feedback(&mut self) -> Result<Feedback, DeviceError> {
        let mut device = lock(&self.device);
        if device.closed {
            return Err(DeviceError::SessionClosed);
        }
        if device.refresh_failures > 0 {
            device.refresh_failures -= 1;
            return Err(DeviceError::RefreshFailed("simulated fault".to_string()));
        }

        let mut feedback = Feedback::default();
        for axis in &device.axes {
            let _ = feedback.axes.push(AxisFeedback {
                position: axis.position,
                velocity: axis.velocity,
            });
        }
        Ok(feedback)
    }

    fn send_command(&mut self, frame: &CommandFrame) -> Result<(), DeviceError> {
        let mut device = lock(&self.device);
        if device.closed {
            return Err(DeviceError::SessionClosed);
        }
        if device.reject_commands {
            return Err(DeviceError::CommandRejected {
                frame_id: frame.frame_id,
                reason: "simulated rejection".to_string(),
            });
        }
        if device.last_frame_id == Some(frame.frame_id) {
            return Err(DeviceError::CommandRejected {
                frame_id: frame.frame_id,
                reason: "duplicate frame identifier".to_string(),
            });
        }
        device.last_frame_id = Some(frame.frame_id);

        for target in &frame.targets {
            if target.axis >= device.axes.len() {
                continue;
            }
            match target.mode {
                ControlMode::Position => device.axes[target.axis].position = target.value,
                ControlMode::Velocity => device.axes[target.axis].velocity = target.value,
                // Effort has no simulated dynamics; the frame is recorded.
                ControlMode::Effort | ControlMode::Undefined => {}
            }
        }

        device.sent_frames.push(frame.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        lock(&self.device).closed = true;
        Ok(())
    }
}

/// Poison-tolerant lock: a panicked test thread must not wedge the device.
fn lock(device: &Arc<Mutex<SimDevice>>) -> MutexGuard<'_, SimDevice> {
    device.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grip_common::session::Credentials;
    use grip_common::types::AxisTarget;

    fn session_config() -> SessionConfig {
        SessionConfig {
            address: "192.168.1.10".to_string(),
            port: 10_000,
            realtime_port: 10_001,
            credentials: Credentials::default(),
            session_inactivity_timeout_ms: 60_000,
            connection_inactivity_timeout_ms: 2_000,
        }
    }

    #[test]
    fn open_refresh_close_cycle() {
        let factory = SimFactory::new(1);
        let mut session = factory.open(&session_config()).unwrap();

        let feedback = session.refresh_feedback().unwrap();
        assert_eq!(feedback.axes.len(), 1);
        assert_eq!(feedback.axes[0].position, DEFAULT_INITIAL_POSITION);

        session.close().unwrap();
        assert!(matches!(
            session.refresh_feedback(),
            Err(DeviceError::SessionClosed)
        ));
    }

    #[test]
    fn refusing_factory_fails_open() {
        let factory = SimFactory::refusing_connections();
        assert!(matches!(
            factory.open(&session_config()),
            Err(DeviceError::ConnectFailed { .. })
        ));
    }

    #[test]
    fn position_targets_apply_instantly() {
        let factory = SimFactory::new(1);
        let device = factory.device();
        let mut session = factory.open(&session_config()).unwrap();

        let mut frame = CommandFrame {
            frame_id: 1,
            targets: heapless::Vec::new(),
        };
        frame
            .targets
            .push(AxisTarget {
                axis: 0,
                mode: ControlMode::Position,
                value: 0.9,
            })
            .unwrap();
        session.send_command(&frame).unwrap();

        assert_eq!(device.lock().unwrap().axes[0].position, 0.9);
        let feedback = session.refresh_feedback().unwrap();
        assert_eq!(feedback.axes[0].position, 0.9);
    }

    #[test]
    fn duplicate_frame_id_rejected() {
        let factory = SimFactory::new(1);
        let mut session = factory.open(&session_config()).unwrap();

        let frame = CommandFrame {
            frame_id: 7,
            targets: heapless::Vec::new(),
        };
        session.send_command(&frame).unwrap();
        assert!(matches!(
            session.send_command(&frame),
            Err(DeviceError::CommandRejected { frame_id: 7, .. })
        ));
    }

    #[test]
    fn injected_refresh_failures_run_out() {
        let factory = SimFactory::new(1);
        factory.device().lock().unwrap().refresh_failures = 1;
        let mut session = factory.open(&session_config()).unwrap();

        assert!(matches!(
            session.refresh_feedback(),
            Err(DeviceError::RefreshFailed(_))
        ));
        assert!(session.refresh_feedback().is_ok());
    }
}
