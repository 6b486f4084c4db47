// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! A simulated ISL29018 on an I2C bus.
//!
//! The simulation keeps the device's register file and converts the light
//! level of a shared [`Scene`] on every register read while the device is in
//! ALS continuous mode. Conversions outside the interrupt window set the
//! COMMAND1 interrupt flag, which is cleared when COMMAND1 is read.

use std::sync::{Arc, Mutex, PoisonError};

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

const COMMAND1: usize = 0x00;
const COMMAND2: usize = 0x01;
const DATA_LSB: usize = 0x02;
const DATA_MSB: usize = 0x03;
const INT_LOW_LSB: usize = 0x04;
const INT_HIGH_LSB: usize = 0x06;
const REGISTER_COUNT: usize = 0x09;

const OPMODE_SHIFT: u8 = 5;
const OPMODE_ALS_CONTINUOUS: u8 = 5;
const ISR_FLAG: u8 = 1 << 2;

/// Light level seen by the simulated sensor.
#[derive(Clone, Default)]
pub struct Scene {
    lux: Arc<Mutex<f32>>,
}

impl Scene {
    pub fn set_lux(&self, lux: f32) {
        *self.lux.lock().unwrap_or_else(PoisonError::into_inner) = lux;
    }

    pub fn lux(&self) -> f32 {
        *self.lux.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct SimulatedIsl29018 {
    address: u8,
    scene: Scene,
    registers: Arc<Mutex<[u8; REGISTER_COUNT]>>,
    pointer: usize,
}

impl SimulatedIsl29018 {
    pub fn new(address: u8, scene: Scene) -> SimulatedIsl29018 {
        SimulatedIsl29018 {
            address,
            scene,
            registers: Arc::new(Mutex::new([0; REGISTER_COUNT])),
            pointer: 0,
        }
    }

    /// Convert the scene into the data registers.
    fn convert(&self, registers: &mut [u8; REGISTER_COUNT]) {
        if registers[COMMAND1] >> OPMODE_SHIFT != OPMODE_ALS_CONTINUOUS {
            return;
        }
        let range = 1000.0 * 4f32.powi(i32::from(registers[COMMAND2] & 0x03));
        let bits = 16 - 4 * u32::from((registers[COMMAND2] >> 2) & 0x03);
        let max = ((1u32 << bits) - 1) as f32;
        let counts = (self.scene.lux() / range * (1u32 << bits) as f32).clamp(0.0, max);
        let raw = counts as u16;

        let [lsb, msb] = raw.to_le_bytes();
        registers[DATA_LSB] = lsb;
        registers[DATA_MSB] = msb;

        let low = u16::from_le_bytes([registers[INT_LOW_LSB], registers[INT_LOW_LSB + 1]]);
        let high = u16::from_le_bytes([registers[INT_HIGH_LSB], registers[INT_HIGH_LSB + 1]]);
        if raw < low || raw > high {
            registers[COMMAND1] |= ISR_FLAG;
        }
    }

    fn read_registers(&mut self, buffer: &mut [u8]) -> Result<(), ErrorKind> {
        let mut registers = self.registers.lock().unwrap_or_else(PoisonError::into_inner);
        self.convert(&mut registers);
        for byte in buffer.iter_mut() {
            *byte = *registers.get(self.pointer).ok_or(ErrorKind::Overrun)?;
            if self.pointer == COMMAND1 {
                registers[COMMAND1] &= !ISR_FLAG;
            }
            self.pointer += 1;
        }
        Ok(())
    }

    fn write_registers(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        let (pointer, values) = match bytes.split_first() {
            Some((pointer, values)) => (*pointer as usize, values),
            None => return Ok(()),
        };
        let mut registers = self.registers.lock().unwrap_or_else(PoisonError::into_inner);
        if pointer >= REGISTER_COUNT {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }
        self.pointer = pointer;
        for value in values {
            let slot = registers
                .get_mut(self.pointer)
                .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data))?;
            *slot = *value;
            self.pointer += 1;
        }
        Ok(())
    }
}

impl ErrorType for SimulatedIsl29018 {
    type Error = ErrorKind;
}

impl I2c for SimulatedIsl29018 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.write_registers(bytes)?,
                Operation::Read(buffer) => self.read_registers(buffer)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use capsules_extra::isl29018::acquisition::AcquisitionMode;
    use capsules_extra::isl29018::config::Isl29018Config;
    use capsules_extra::isl29018::Isl29018;
    use kernel::hil::i2c::I2CDevice;
    use kernel::registry::SensorRegistry;

    use crate::clock::SystemClock;
    use crate::sink::LogSink;
    use crate::timer::ThreadTimer;

    const ADDRESS: u8 = 0x44;

    #[test]
    fn converts_scene_in_continuous_mode() {
        let scene = Scene::default();
        let mut sensor = SimulatedIsl29018::new(ADDRESS, scene.clone());
        let mut data = [0; 2];

        scene.set_lux(250.0);
        sensor.write_read(ADDRESS, &[0x02], &mut data).unwrap();
        assert_eq!(data, [0, 0]);

        // Range 4000 lux, 16 bit, ALS continuous
        sensor.write(ADDRESS, &[0x01, 0x01]).unwrap();
        sensor.write(ADDRESS, &[0x00, 0xA0]).unwrap();
        sensor.write_read(ADDRESS, &[0x02], &mut data).unwrap();
        assert_eq!(u16::from_le_bytes(data), 4096);

        scene.set_lux(1.0e6);
        sensor.write_read(ADDRESS, &[0x02], &mut data).unwrap();
        assert_eq!(u16::from_le_bytes(data), u16::MAX);
    }

    #[test]
    fn empty_window_flags_every_conversion() {
        let scene = Scene::default();
        let mut sensor = SimulatedIsl29018::new(ADDRESS, scene.clone());
        let mut data = [0; 2];
        let mut command1 = [0];

        sensor.write(ADDRESS, &[0x01, 0x01]).unwrap();
        sensor.write(ADDRESS, &[0x04, 0x00]).unwrap();
        sensor.write(ADDRESS, &[0x05, 0x00]).unwrap();
        sensor.write(ADDRESS, &[0x06, 0xFF]).unwrap();
        sensor.write(ADDRESS, &[0x07, 0xFF]).unwrap();
        sensor.write(ADDRESS, &[0x00, 0xA0]).unwrap();

        sensor.write_read(ADDRESS, &[0x02], &mut data).unwrap();
        sensor.write_read(ADDRESS, &[0x00], &mut command1).unwrap();
        assert_eq!(command1[0] & ISR_FLAG, 0);

        sensor.write(ADDRESS, &[0x04, 0xFF]).unwrap();
        sensor.write(ADDRESS, &[0x05, 0xFF]).unwrap();
        sensor.write(ADDRESS, &[0x06, 0x00]).unwrap();
        sensor.write(ADDRESS, &[0x07, 0x00]).unwrap();
        sensor.write_read(ADDRESS, &[0x02], &mut data).unwrap();
        sensor.write_read(ADDRESS, &[0x00], &mut command1).unwrap();
        assert_eq!(command1[0] & ISR_FLAG, ISR_FLAG);

        // Cleared by the read.
        sensor.write_read(ADDRESS, &[0x00], &mut command1).unwrap();
        assert_eq!(command1[0] & ISR_FLAG, 0);
    }

    #[test]
    fn command1_read_sees_fresh_conversion() {
        let scene = Scene::default();
        let mut sensor = SimulatedIsl29018::new(ADDRESS, scene.clone());
        let mut command1 = [0];

        scene.set_lux(100.0);
        sensor.write(ADDRESS, &[0x01, 0x01]).unwrap();
        sensor.write(ADDRESS, &[0x04, 0xFF]).unwrap();
        sensor.write(ADDRESS, &[0x05, 0xFF]).unwrap();
        sensor.write(ADDRESS, &[0x00, 0xA0]).unwrap();

        sensor.write_read(ADDRESS, &[0x00], &mut command1).unwrap();
        assert_eq!(command1[0] & ISR_FLAG, ISR_FLAG);
    }

    #[test]
    fn interrupt_mode_driver_publishes() {
        let scene = Scene::default();
        let sensor = SimulatedIsl29018::new(ADDRESS, scene.clone());
        let sink = Arc::new(LogSink::default());
        let driver = Arc::new(Isl29018::new(
            I2CDevice::new(sensor, ADDRESS),
            Isl29018Config {
                acquisition: AcquisitionMode::Interrupt,
                ..Isl29018Config::DEFAULT
            },
            Arc::new(ThreadTimer::new()),
            Arc::new(SystemClock::new()),
        ));
        driver.set_client(sink.clone());

        let registry = SensorRegistry::new();
        let handle = registry.prepare_hardware(driver.clone()).unwrap();
        registry.d0_entry(handle).unwrap();
        registry.start(handle).unwrap();

        // Each step more than doubles the light level, clearing the default
        // 100% threshold.
        for lux in [100.0, 500.0, 2000.0] {
            scene.set_lux(lux);
            assert!(registry.interrupt(handle));
        }
        assert_eq!(sink.count(), 3);

        // Within the threshold: claimed, but not published.
        scene.set_lux(2500.0);
        assert!(registry.interrupt(handle));
        assert_eq!(sink.count(), 3);

        registry.stop(handle).unwrap();
        registry.d0_exit(handle).unwrap();
        assert!(!registry.interrupt(handle));
    }

    #[test]
    fn wrong_address_is_not_acknowledged() {
        let mut sensor = SimulatedIsl29018::new(ADDRESS, Scene::default());
        assert_eq!(
            sensor.write(0x45, &[0x00, 0x00]),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );
    }
}
