// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interfaces for environment sensors

use crate::collections::{CollectionList, PropertyKey, PropertyList};
use crate::ErrorCode;

/// One published ambient light reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSample {
    /// Wall-clock time of the reading, in microseconds since the Unix epoch.
    pub timestamp_us: u64,
    /// Light level in lux (lx).
    pub lux: f32,
}

/// Client for receiving light intensity readings.
pub trait AmbientLightClient: Send + Sync {
    /// Called when an ambient light reading has cleared the thresholds.
    ///
    /// This is called with the driver's bus lock held and must not call back
    /// into the driver.
    fn sample_ready(&self, sample: LightSample);
}

/// Value of the sensor `State` property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum SensorState {
    Initializing = 0,
    Idle = 1,
    Active = 2,
    Error = 3,
}

/// Value of the enumeration `ConnectionType` property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ConnectionType {
    Integrated = 0,
    Attached = 1,
    External = 2,
}

/// The callback surface the sensor framework drives.
///
/// Every read of a collection follows the same convention: with no
/// destination the required size is returned; with a destination the
/// collection is copied and its size returned. A destination that is too
/// small is left empty and `ErrorCode::SIZE` is returned.
pub trait SensorDriver: Send + Sync {
    /// Hardware resources have been assigned to the device.
    fn prepare_hardware(&self) -> Result<(), ErrorCode>;

    /// Hardware resources are being taken away. The device must be quiet
    /// when this returns.
    fn release_hardware(&self) -> Result<(), ErrorCode>;

    /// The device entered the working power state.
    fn power_on(&self) -> Result<(), ErrorCode>;

    /// The device is leaving the working power state.
    fn power_off(&self) -> Result<(), ErrorCode>;

    /// Begin sampling.
    fn start(&self) -> Result<(), ErrorCode>;

    /// Stop sampling. No sample is published after this returns.
    fn stop(&self) -> Result<(), ErrorCode>;

    /// Keys of the data fields every sample carries.
    fn supported_data_fields(&self, dest: Option<&mut PropertyList>) -> Result<usize, ErrorCode>;

    /// Sensor-level properties.
    fn properties(&self, dest: Option<&mut CollectionList>) -> Result<usize, ErrorCode>;

    /// Properties of one supported data field. Fails with
    /// `ErrorCode::NOSUPPORT` for a field the sensor does not report.
    fn data_field_properties(
        &self,
        field: &PropertyKey,
        dest: Option<&mut CollectionList>,
    ) -> Result<usize, ErrorCode>;

    /// Requested sampling interval in milliseconds.
    fn data_interval(&self) -> u32;

    fn set_data_interval(&self, interval_ms: u32) -> Result<(), ErrorCode>;

    /// Change thresholds currently in effect.
    fn data_thresholds(&self, dest: Option<&mut CollectionList>) -> Result<usize, ErrorCode>;

    fn set_data_thresholds(&self, thresholds: &CollectionList) -> Result<(), ErrorCode>;

    /// Device specific control requests.
    fn io_control(&self, _code: u32, _input: &[u8], _output: &mut [u8]) -> Result<usize, ErrorCode> {
        Err(ErrorCode::NOSUPPORT)
    }

    /// The sampling timer expired.
    fn timer_expired(&self);

    /// Interrupt service routine. Returns whether the interrupt belonged to
    /// this device, in which case the framework must schedule
    /// `interrupt_work`.
    fn interrupt(&self) -> bool {
        false
    }

    /// Deferred half of interrupt handling.
    fn interrupt_work(&self) {}
}
