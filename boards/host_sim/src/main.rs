// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Board file for running the ISL29018 capsule on a host.
//!
//! The sensor is simulated on an in-process I2C bus, the sampling timer runs
//! on a host thread, and published samples are logged. Set `RUST_LOG=debug`
//! to also see suppressed samples.

use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use capsules_extra::isl29018::acquisition::AcquisitionMode;
use capsules_extra::isl29018::config::Isl29018Config;
use capsules_extra::isl29018::Isl29018;
use kernel::collections::{keys, CollectionList, PropertyValue};
use kernel::hil::i2c::I2CDevice;
use kernel::registry::SensorRegistry;
use kernel::ErrorCode;
use log::info;

mod clock;
mod sim_sensor;
mod sink;
mod timer;

use clock::SystemClock;
use sim_sensor::{Scene, SimulatedIsl29018};
use sink::LogSink;
use timer::ThreadTimer;

const I2C_ADDRESS: u8 = 0x44;

const DATA_INTERVAL_MS: u32 = 200;
const THRESHOLD_PCT: f32 = 0.05;
const THRESHOLD_ABS_LUX: f32 = 2.0;

const ISL29018_CONFIG: Isl29018Config = Isl29018Config {
    acquisition: AcquisitionMode::Polling,
    ..Isl29018Config::DEFAULT
};

/// Light levels the scene steps through, and how long each is held.
const SCENE: [f32; 8] = [120.0, 121.0, 180.0, 180.5, 900.0, 3500.0, 5000.0, 15.0];
const SCENE_STEP: Duration = Duration::from_millis(600);

/// Interrupt line poll period in interrupt mode.
const INTERRUPT_POLL: Duration = Duration::from_millis(20);

fn main() -> Result<(), ErrorCode> {
    env_logger::init();

    let scene = Scene::default();
    let sensor = SimulatedIsl29018::new(I2C_ADDRESS, scene.clone());

    let timer = Arc::new(ThreadTimer::new());
    let clock = Arc::new(SystemClock::new());
    let sink = Arc::new(LogSink::default());

    let isl29018 = Arc::new(Isl29018::new(
        I2CDevice::new(sensor, I2C_ADDRESS),
        ISL29018_CONFIG,
        timer.clone(),
        clock,
    ));
    isl29018.set_client(sink.clone());

    let registry = Arc::new(SensorRegistry::new());
    let handle = registry.prepare_hardware(isl29018.clone())?;

    let weak_registry: Weak<SensorRegistry> = Arc::downgrade(&registry);
    timer.set_client(move || {
        if let Some(registry) = weak_registry.upgrade() {
            registry.timer_expired(handle);
        }
    });

    let mut enumeration = CollectionList::new();
    isl29018.enumeration_properties(Some(&mut enumeration))?;
    info!(
        "registered {:?} {:?} as sensor {}",
        enumeration.find(&keys::MANUFACTURER),
        enumeration.find(&keys::MODEL),
        handle.id()
    );

    registry.d0_entry(handle)?;
    registry.set_data_interval(handle, DATA_INTERVAL_MS)?;
    registry.set_data_thresholds(
        handle,
        &CollectionList::from_entries([
            (keys::LIGHT_LEVEL_LUX, PropertyValue::F32(THRESHOLD_PCT)),
            (
                keys::LIGHT_LEVEL_LUX_ABSOLUTE_DIFFERENCE,
                PropertyValue::F32(THRESHOLD_ABS_LUX),
            ),
        ]),
    )?;
    registry.start(handle)?;

    for lux in SCENE {
        scene.set_lux(lux);
        if ISL29018_CONFIG.acquisition.uses_timer() {
            thread::sleep(SCENE_STEP);
        } else {
            let mut waited = Duration::ZERO;
            while waited < SCENE_STEP {
                registry.interrupt(handle);
                thread::sleep(INTERRUPT_POLL);
                waited += INTERRUPT_POLL;
            }
        }
    }

    registry.stop(handle)?;
    registry.d0_exit(handle)?;
    registry.release_hardware(handle)?;

    info!("published {} samples", sink.count());
    Ok(())
}
