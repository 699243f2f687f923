//! Halt planning and arrival-announcement core for an onboard
//! passenger-information unit.
//!
//! This library holds all logic that can be tested on the host (no
//! embedded hardware required): the route catalog, the halt registry and
//! its storage layout, the navigation wizard, the arrival detector, the
//! announcement scheduler and the [`Controller`] that ties them together.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and binds the traits in [`devices`] and [`storage`] to real hardware.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod advert;
pub mod announce;
pub mod arrival;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod devices;
pub mod error;
pub mod halts;
pub mod jq6500;
pub mod navigation;
pub mod storage;
pub mod timer;
pub mod ui;

pub use catalog::{Line, Route, RouteKey, StationRef};
pub use controller::Controller;
pub use error::Error;
pub use halts::{HaltList, HaltRegistry};
pub use navigation::{Mode, SessionState};
pub use ui::{ButtonEvent, Press};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - controller wiring with in-memory peripherals
// ═══════════════════════════════════════════════════════════════════════════
