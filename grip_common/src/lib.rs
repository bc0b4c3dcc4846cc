//! Grip Common Library
//!
//! Shared types, constants, configuration loading and the device-session
//! boundary for the grip-core workspace.
//!
//! # Module Structure
//!
//! - [`types`] - Interface kinds, control modes, lifecycle states, cyclic payloads
//! - [`error`] - Topology, mode-switch and umbrella error types
//! - [`session`] - `DeviceSession` / `SessionFactory` collaborator traits
//! - [`config`] - Gripper configuration and device description (TOML)
//! - [`consts`] - Shared constants and defaults

pub mod config;
pub mod consts;
pub mod error;
pub mod session;
pub mod types;
