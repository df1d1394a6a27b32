//! Robstop Common Library
//!
//! This crate provides the shared data model, constants and I/O contracts
//! for all robstop workspace crates.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration record, TOML loading and persistence
//! - [`consts`] - Fixed pins, cadences and default values
//! - [`input`] - `DigitalInput` trait for the E-stop line
//! - [`robot`] - `RobotControlClient` trait for robot state changes
//! - [`state`] - Button / target state enums and dispatch outcome
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use robstop_common::config::{ConfigStore, Configuration, TomlFileStore};
//! use robstop_common::state::{ButtonState, DesiredState};
//! ```

pub mod config;
pub mod consts;
pub mod input;
pub mod prelude;
pub mod robot;
pub mod state;
