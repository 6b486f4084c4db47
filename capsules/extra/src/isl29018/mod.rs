// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Driver for the Intersil ISL29018 ambient light sensor.
//!
//! <https://www.renesas.com/us/en/document/dst/isl29018-datasheet>
//!
//! The driver samples the sensor's ALS channel, either on a timer or on the
//! device interrupt, filters samples through the change thresholds and
//! publishes the ones that pass to an [`AmbientLightClient`].
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let device = I2CDevice::new(i2c, 0x44);
//! let isl29018 = Arc::new(Isl29018::new(
//!     device,
//!     Isl29018Config::DEFAULT,
//!     timer.clone(),
//!     clock.clone(),
//! ));
//! isl29018.set_client(sink);
//! let handle = registry.prepare_hardware(isl29018.clone())?;
//! registry.d0_entry(handle)?;
//! registry.start(handle)?;
//! ```
//!
//! Locking
//! -------
//!
//! A single mutex (the bus lock) covers every register access together with
//! the sampling state, the cached thresholds and the last published sample.
//! Timer ticks and interrupt work run entirely under it, so samples are
//! published one at a time and in order. Waiting for an in-flight tick
//! (`Timer::disarm(true)`) is only ever done with the bus lock released.

pub mod acquisition;
pub mod config;
pub mod properties;
pub mod registers;
pub mod scheduler;
pub mod state;
pub mod threshold;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use kernel::collections::{CollectionList, PropertyKey, PropertyList};
use kernel::hil::i2c::RegisterBus;
use kernel::hil::sensors::{AmbientLightClient, LightSample, SensorDriver, SensorState};
use kernel::hil::time::{Clock, Timer};
use kernel::ErrorCode;
use log::{debug, error, info, warn};

use self::acquisition::AcquisitionMode;
use self::config::Isl29018Config;
use self::properties::{Catalog, PropertyStore};
use self::registers::{raw_to_lux, Command2Val, RegisterAdapter, COMMAND1, COMMAND2};
use self::scheduler::SamplingState;
use self::state::Lifecycle;
use self::threshold::ThresholdConfig;

/// Everything guarded by the bus lock.
struct Hardware<B: RegisterBus> {
    registers: RegisterAdapter<B>,
    lifecycle: Lifecycle,
    sampling: SamplingState,
    thresholds: ThresholdConfig,
    /// Last published light level.
    last_sample: f32,
    /// Last light level read from the device, published or not.
    cached_lux: f32,
}

/// ISL29018 driver over a register bus, driven through [`SensorDriver`].
pub struct Isl29018<B: RegisterBus> {
    hardware: Mutex<Hardware<B>>,
    timer: Arc<dyn Timer>,
    clock: Arc<dyn Clock>,
    client: RwLock<Option<Arc<dyn AmbientLightClient>>>,
    store: PropertyStore,
    acquisition: AcquisitionMode,
    command2: Command2Val,
    lux_per_count: f32,
}

impl<B: RegisterBus> Isl29018<B> {
    pub fn new(
        bus: B,
        config: Isl29018Config,
        timer: Arc<dyn Timer>,
        clock: Arc<dyn Clock>,
    ) -> Isl29018<B> {
        let mut command2 = Command2Val::new(0);
        command2.write(
            COMMAND2::RANGE.val(config.range as u8)
                + COMMAND2::RESOLUTION.val(config.resolution as u8),
        );

        Isl29018 {
            hardware: Mutex::new(Hardware {
                registers: RegisterAdapter::new(bus),
                lifecycle: Lifecycle::Uninitialized,
                sampling: SamplingState::new(config.minimum_interval_ms),
                thresholds: ThresholdConfig {
                    percent: config.initial_threshold_pct,
                    absolute_lux: config.initial_threshold_abs,
                },
                last_sample: 0.0,
                cached_lux: 1.0,
            }),
            timer,
            clock,
            client: RwLock::new(None),
            store: PropertyStore::new(&config),
            acquisition: config.acquisition,
            command2,
            lux_per_count: config.lux_per_count(),
        }
    }

    /// Set the client to be notified of published samples. This is likely
    /// called in a board's `main.rs`.
    pub fn set_client(&self, client: Arc<dyn AmbientLightClient>) {
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = Some(client);
    }

    fn lock(&self) -> MutexGuard<'_, Hardware<B>> {
        self.hardware.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock().lifecycle
    }

    pub fn is_started(&self) -> bool {
        self.lock().sampling.started
    }

    /// Thresholds in effect for the sampling path.
    pub fn thresholds(&self) -> ThresholdConfig {
        self.lock().thresholds
    }

    /// Light level of the most recent conversion, whether or not it was
    /// published.
    pub fn cached_lux(&self) -> f32 {
        self.lock().cached_lux
    }

    /// Device enumeration properties, for registering the sensor with the
    /// framework.
    pub fn enumeration_properties(&self, dest: Option<&mut CollectionList>) -> Result<usize, ErrorCode> {
        self.store.copy_out(Catalog::EnumerationProperties, dest)
    }

    /// The most recently published sample, as a data collection.
    pub fn data(&self, dest: Option<&mut CollectionList>) -> Result<usize, ErrorCode> {
        self.store.copy_out(Catalog::Data, dest)
    }

    /// One read-compare-publish cycle. Must be called with the bus lock held.
    ///
    /// Returns `ErrorCode::NOTACCEPTED` when the sample did not clear the
    /// thresholds. A failed read publishes nothing and leaves the cycle as it
    /// was, so the next call retries.
    fn acquire_sample(&self, hw: &mut Hardware<B>) -> Result<(), ErrorCode> {
        let raw = hw.registers.read_raw()?;
        let lux = raw_to_lux(raw, self.lux_per_count);
        hw.cached_lux = lux;

        let first = hw.sampling.first_sample;
        if first {
            let now = self.clock.now_ms();
            if let Err(err) = now {
                error!("ISL29018 cycle start time unavailable: {:?}", err);
            }
            hw.sampling.begin_cycle(now);
        }

        if !hw.thresholds.should_publish(hw.last_sample, lux, first) {
            debug!(
                "ISL29018 sample {} lx within thresholds of {} lx",
                lux, hw.last_sample
            );
            return Err(ErrorCode::NOTACCEPTED);
        }

        hw.last_sample = lux;
        let sample = LightSample {
            timestamp_us: self.clock.utc_us(),
            lux,
        };
        self.store.record_sample(&sample);
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|client| client.sample_ready(sample));
        hw.sampling.first_sample = false;
        Ok(())
    }

    fn log_sample_failure(result: Result<(), ErrorCode>) {
        if let Err(err) = result {
            if err.is_fault() {
                error!("ISL29018 sample failed: {:?}", err);
            }
        }
    }

    /// Stop the timer, waiting for any tick in progress. `hw` is the bus lock
    /// and is released while waiting.
    fn quiesce<'a>(&'a self, hw: MutexGuard<'a, Hardware<B>>) -> MutexGuard<'a, Hardware<B>> {
        if !self.acquisition.uses_timer() {
            return hw;
        }
        drop(hw);
        self.timer.disarm(true);
        self.lock()
    }
}

impl<B: RegisterBus> SensorDriver for Isl29018<B> {
    fn prepare_hardware(&self) -> Result<(), ErrorCode> {
        let mut hw = self.lock();
        if hw.lifecycle != Lifecycle::Uninitialized {
            return Err(ErrorCode::STATE);
        }
        hw.lifecycle = Lifecycle::HardwareReady;
        debug!("ISL29018 hardware prepared");
        Ok(())
    }

    fn release_hardware(&self) -> Result<(), ErrorCode> {
        if self.is_started() {
            self.stop()?;
        }
        self.lock().lifecycle = Lifecycle::Uninitialized;
        debug!("ISL29018 hardware released");
        Ok(())
    }

    fn power_on(&self) -> Result<(), ErrorCode> {
        let mut hw = self.lock();
        if !hw.lifecycle.can_power_on() {
            return Err(ErrorCode::STATE);
        }
        hw.registers.initialize(self.command2)?;
        hw.lifecycle = Lifecycle::Idle;
        self.store.set_state(SensorState::Idle);
        info!("ISL29018 powered on");
        Ok(())
    }

    fn power_off(&self) -> Result<(), ErrorCode> {
        if self.is_started() {
            self.stop()?;
        }
        let mut hw = self.lock();
        if hw.lifecycle == Lifecycle::Uninitialized {
            return Err(ErrorCode::STATE);
        }
        hw.registers.power_down()?;
        hw.lifecycle = Lifecycle::PoweredOff;
        info!("ISL29018 powered off");
        Ok(())
    }

    fn start(&self) -> Result<(), ErrorCode> {
        let mut hw = self.lock();
        if !hw.lifecycle.is_powered() {
            return Err(ErrorCode::OFF);
        }
        hw.registers.start_continuous()?;
        self.acquisition.enable(&mut hw.registers)?;

        hw.sampling.restart();
        hw.sampling.started = true;
        hw.lifecycle = Lifecycle::Active;
        if self.acquisition.uses_timer() {
            self.timer.arm(hw.sampling.minimum_interval_ms);
        }
        self.store.set_state(SensorState::Active);
        info!("ISL29018 started, interval {} ms", hw.sampling.interval_ms);
        Ok(())
    }

    fn stop(&self) -> Result<(), ErrorCode> {
        let mut hw = self.lock();
        hw.sampling.started = false;
        hw = self.quiesce(hw);
        // Another caller may have restarted sampling while the lock was
        // released.
        hw.sampling.started = false;
        if self.acquisition.uses_timer() {
            self.timer.disarm(false);
        }

        // Sampling has ended at this point, so the device goes Idle even if
        // it could not be put into standby. The write error is still
        // returned.
        let disabled = if hw.lifecycle == Lifecycle::Active {
            self.acquisition.disable(&mut hw.registers)
        } else {
            Ok(())
        };
        let powered_down = hw.registers.power_down();
        if hw.lifecycle == Lifecycle::Active {
            hw.lifecycle = Lifecycle::Idle;
        }
        if hw.lifecycle == Lifecycle::Idle {
            self.store.set_state(SensorState::Idle);
        }
        drop(hw);

        if let Err(err) = self.timer.restore_resolution() {
            warn!("ISL29018 failed to restore timer resolution: {:?}", err);
        }
        let result = disabled.and(powered_down);
        match result {
            Ok(()) => info!("ISL29018 stopped"),
            Err(err) => error!("ISL29018 stopped, standby write failed: {:?}", err),
        }
        result
    }

    fn supported_data_fields(&self, dest: Option<&mut PropertyList>) -> Result<usize, ErrorCode> {
        self.store.copy_supported_fields(dest)
    }

    fn properties(&self, dest: Option<&mut CollectionList>) -> Result<usize, ErrorCode> {
        self.store.copy_out(Catalog::Properties, dest)
    }

    fn data_field_properties(
        &self,
        field: &PropertyKey,
        dest: Option<&mut CollectionList>,
    ) -> Result<usize, ErrorCode> {
        if !self.store.is_supported(field) {
            return Err(ErrorCode::NOSUPPORT);
        }
        self.store.copy_out(Catalog::DataFieldProperties, dest)
    }

    fn data_interval(&self) -> u32 {
        self.lock().sampling.interval_ms
    }

    fn set_data_interval(&self, interval_ms: u32) -> Result<(), ErrorCode> {
        if interval_ms == 0 {
            return Err(ErrorCode::INVAL);
        }
        let mut hw = self.lock();
        hw.sampling.interval_ms = interval_ms;
        debug!("ISL29018 data interval {} ms", interval_ms);
        if !hw.sampling.started {
            return Ok(());
        }

        hw.sampling.started = false;
        hw = self.quiesce(hw);
        if hw.lifecycle != Lifecycle::Active {
            // Stopped while the lock was released.
            return Ok(());
        }
        hw.sampling.restart();
        hw.sampling.started = true;
        if self.acquisition.uses_timer() {
            self.timer.arm(hw.sampling.minimum_interval_ms);
        }
        Ok(())
    }

    fn data_thresholds(&self, dest: Option<&mut CollectionList>) -> Result<usize, ErrorCode> {
        self.store.copy_out(Catalog::Thresholds, dest)
    }

    fn set_data_thresholds(&self, thresholds: &CollectionList) -> Result<(), ErrorCode> {
        let mut hw = self.lock();
        hw.thresholds = self.store.apply_thresholds(thresholds)?;
        debug!("ISL29018 thresholds {:?}", hw.thresholds);
        Ok(())
    }

    fn timer_expired(&self) {
        let mut hw = self.lock();
        if !hw.sampling.started {
            return;
        }
        let was_first = hw.sampling.first_sample;
        Self::log_sample_failure(self.acquire_sample(&mut hw));
        let began_cycle = was_first && !hw.sampling.first_sample;

        if hw.sampling.started && hw.lifecycle.is_powered() && self.acquisition.uses_timer() {
            let now = self.clock.now_ms();
            let delay = hw.sampling.next_delay(began_cycle, now);
            self.timer.arm(delay);
        }
    }

    fn interrupt(&self) -> bool {
        let mut hw = self.lock();
        if !hw.lifecycle.is_powered() {
            return false;
        }
        match hw.registers.read_command1() {
            Ok(command1) => command1.is_set(COMMAND1::ISR_FLAG),
            Err(_) => false,
        }
    }

    fn interrupt_work(&self) {
        let mut hw = self.lock();
        if !hw.sampling.started {
            return;
        }
        Self::log_sample_failure(self.acquire_sample(&mut hw));
    }
}
