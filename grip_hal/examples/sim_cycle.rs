//! Gripper control loop against the simulated device.
//!
//! Demonstrates the sequence a hosting scheduler drives: configure the
//! interface topology, claim the axis in position mode, start the session,
//! then run cyclic read/write passes while stepping the position command.
//!
//! ```bash
//! cargo run --example sim_cycle
//! ```

use grip_common::config::{AxisDescriptor, DeviceDescription, GripperConfig};
use grip_common::types::InterfaceKind;
use grip_hal::core::GripperCore;
use grip_hal::sim::SimFactory;
use std::thread;
use std::time::Duration;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let description = DeviceDescription {
        axes: vec![AxisDescriptor {
            name: "gripper_joint".to_string(),
            command_interfaces: vec![InterfaceKind::Position],
            state_interfaces: vec![InterfaceKind::Position, InterfaceKind::Velocity],
        }],
    };

    let factory = SimFactory::new(description.axes.len());
    let mut core = GripperCore::new(
        GripperConfig::with_address("192.168.1.10"),
        Box::new(factory),
    )?;

    core.configure(&description)?;
    core.propose_switch(&["gripper_joint/position".to_string()], &[])?;
    core.start()?;

    // Step the gripper open in 10 cycles.
    for cycle in 0..10u32 {
        core.read()?;
        let position = core
            .registry()
            .unwrap()
            .state(0, InterfaceKind::Position);

        let target = 0.1 * f64::from(cycle + 1);
        core.registry_mut()
            .unwrap()
            .set_command(0, InterfaceKind::Position, target);
        core.write()?;

        info!("cycle {cycle}: measured={position:.3} commanded={target:.3}");
        thread::sleep(Duration::from_millis(1));
    }

    core.stop();
    Ok(())
}
