//! # Grip HAL Library
//!
//! Hardware-interface core binding a network-attached gripper to a generic
//! motion-control framework's joint-interface model.
//!
//! The hosting scheduler drives a fixed sequence: `configure()` validates the
//! declared interface topology and allocates the registry, mode switches are
//! proposed between cycles, and `read()`/`write()` move values between the
//! registry's slots and the device session once per control cycle.
//!
//! # Module Structure
//!
//! - [`topology`] - Device-description validation
//! - [`registry`] - NaN-initialized state/command slot storage
//! - [`arbiter`] - Control-mode arbitration state machine
//! - [`cyclic`] - Per-cycle read/write adapter with wrapping frame ids
//! - [`core`] - `GripperCore` lifecycle controller
//! - [`sim`] - Simulation session backend for tests and demos
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          grip_hal                               │
//! │  ┌──────────────┐   ┌──────────────┐   ┌─────────────────────┐  │
//! │  │ ModeArbiter  │──►│ GripperCore  │◄──│ InterfaceRegistry   │  │
//! │  │ (switch gate)│   │ (lifecycle)  │   │ (state/cmd slots)   │  │
//! │  └──────────────┘   └──────┬───────┘   └─────────────────────┘  │
//! │                           │                                     │
//! │                           ▼                                     │
//! │                  ┌────────────────┐                             │
//! │                  │ DeviceSession  │ (trait object)              │
//! │                  └────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod arbiter;
pub mod core;
pub mod cyclic;
pub mod registry;
pub mod sim;
pub mod topology;

// Re-export key types for convenience
pub use crate::arbiter::ModeArbiter;
pub use crate::core::GripperCore;
pub use crate::registry::InterfaceRegistry;
pub use crate::topology::{validate, DeviceTopology};
