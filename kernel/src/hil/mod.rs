// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Public traits for interfaces between the framework, the sensor capsules
//! and the collaborators a board provides.

pub mod i2c;
pub mod sensors;
pub mod time;
