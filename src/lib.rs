//! MFarm library crate: re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can drive the farm grid, the bag and the plugins without a window
//! or GPU.

pub mod shared;
pub mod config;
pub mod data;
pub mod inventory;
pub mod farming;
pub mod calendar;
pub mod player;
pub mod world;
pub mod economy;
pub mod progression;
