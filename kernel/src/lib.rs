// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Sensor Framework Kernel
//!
//! The kernel crate holds the code shared between the framework and the
//! sensor capsules that plug into it:
//!
//! - the Hardware Interface Layer (HIL) definitions for the collaborators a
//!   sensor driver is given (register bus, timer, clock, publish sink) and the
//!   callback surface the framework drives ([`hil::sensors::SensorDriver`]);
//! - the framework-wide [`ErrorCode`];
//! - the key/value [`collections`] used to describe sensor properties,
//!   thresholds and samples;
//! - the [`registry`] which owns every prepared sensor and resolves the opaque
//!   handles passed to framework entry points.

#![warn(unreachable_pub)]

pub mod collections;
pub mod hil;
pub mod registry;

mod errorcode;

pub use errorcode::ErrorCode;
