// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! ISL29018 register map and register-level access.
//!
//! <https://www.renesas.com/us/en/document/dst/isl29018-datasheet>

use kernel::hil::i2c::RegisterBus;
use kernel::ErrorCode;
use log::error;
use tock_registers::{register_bitfields, LocalRegisterCopy};

register_bitfields![u8,
    pub COMMAND1 [
        /// Operating mode
        OPMODE OFFSET(5) NUMBITS(3) [
            PowerDown = 0,
            AlsOnce = 1,
            IrOnce = 2,
            ProximityOnce = 3,
            AlsContinuous = 5,
            IrContinuous = 6,
            ProximityContinuous = 7
        ],
        /// Interrupt flag, set when a conversion crossed the interrupt window
        ISR_FLAG OFFSET(2) NUMBITS(1) [],
        /// Interrupt persistence
        PERSIST OFFSET(0) NUMBITS(2) []
    ],
    pub COMMAND2 [
        /// Proximity sensing scheme
        SCHEME OFFSET(7) NUMBITS(1) [],
        /// Modulation frequency
        FREQ OFFSET(6) NUMBITS(1) [],
        /// IR LED drive current
        CURRENT OFFSET(4) NUMBITS(2) [],
        /// ADC resolution
        RESOLUTION OFFSET(2) NUMBITS(2) [
            Adc16Bit = 0,
            Adc12Bit = 1,
            Adc8Bit = 2,
            Adc4Bit = 3
        ],
        /// Full scale range
        RANGE OFFSET(0) NUMBITS(2) [
            Lux1000 = 0,
            Lux4000 = 1,
            Lux16000 = 2,
            Lux64000 = 3
        ]
    ]
];

pub type Command1Val = LocalRegisterCopy<u8, COMMAND1::Register>;
pub type Command2Val = LocalRegisterCopy<u8, COMMAND2::Register>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Registers {
    Command1 = 0x00,
    Command2 = 0x01,
    DataLsb = 0x02,
    DataMsb = 0x03,
    InterruptLowLsb = 0x04,
    InterruptLowMsb = 0x05,
    InterruptHighLsb = 0x06,
    InterruptHighMsb = 0x07,
    Test = 0x08,
}

/// Convert a raw conversion result to lux.
pub fn raw_to_lux(raw: u16, lux_per_count: f32) -> f32 {
    f32::from(raw) * lux_per_count
}

/// Register-level protocol on top of a register bus.
///
/// Every bus failure is logged here and reported as `ErrorCode::IO`. There is
/// no retry.
pub struct RegisterAdapter<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> RegisterAdapter<B> {
    pub fn new(bus: B) -> RegisterAdapter<B> {
        RegisterAdapter { bus }
    }

    pub fn release(self) -> B {
        self.bus
    }

    pub fn write_register(&mut self, register: Registers, value: u8) -> Result<(), ErrorCode> {
        self.bus.write(register as u8, value).map_err(|err| {
            error!("ISL29018 write of {:#04x} to {:?} failed: {}", value, register, err);
            ErrorCode::from(err)
        })
    }

    fn read_registers(&mut self, register: Registers, buffer: &mut [u8]) -> Result<(), ErrorCode> {
        self.bus.read(register as u8, buffer).map_err(|err| {
            error!("ISL29018 read from {:?} failed: {}", register, err);
            ErrorCode::from(err)
        })
    }

    /// Read the latest conversion result. The data registers are read as one
    /// little-endian pair.
    pub fn read_raw(&mut self) -> Result<u16, ErrorCode> {
        let mut data = [0; 2];
        self.read_registers(Registers::DataLsb, &mut data)?;
        Ok(u16::from_le_bytes(data))
    }

    pub fn read_command1(&mut self) -> Result<Command1Val, ErrorCode> {
        let mut value = [0];
        self.read_registers(Registers::Command1, &mut value)?;
        Ok(Command1Val::new(value[0]))
    }

    fn set_operating_mode(
        &mut self,
        mode: tock_registers::fields::FieldValue<u8, COMMAND1::Register>,
    ) -> Result<(), ErrorCode> {
        let mut command1 = Command1Val::new(0);
        command1.write(mode);
        self.write_register(Registers::Command1, command1.get())
    }

    pub fn start_continuous(&mut self) -> Result<(), ErrorCode> {
        self.set_operating_mode(COMMAND1::OPMODE::AlsContinuous)
    }

    pub fn power_down(&mut self) -> Result<(), ErrorCode> {
        self.set_operating_mode(COMMAND1::OPMODE::PowerDown)
    }

    /// Bring the device to its default configuration: clear the test
    /// register, power down, then program range and resolution.
    pub fn initialize(&mut self, command2: Command2Val) -> Result<(), ErrorCode> {
        self.write_register(Registers::Test, 0x00)?;
        self.write_register(Registers::Command1, 0x00)?;
        self.write_register(Registers::Command2, command2.get())
    }

    /// Program the interrupt window. A conversion outside `[low, high]`
    /// raises the interrupt flag.
    pub fn write_interrupt_window(&mut self, low: u16, high: u16) -> Result<(), ErrorCode> {
        let [low_lsb, low_msb] = low.to_le_bytes();
        let [high_lsb, high_msb] = high.to_le_bytes();
        self.write_register(Registers::InterruptLowLsb, low_lsb)?;
        self.write_register(Registers::InterruptLowMsb, low_msb)?;
        self.write_register(Registers::InterruptHighLsb, high_lsb)?;
        self.write_register(Registers::InterruptHighMsb, high_msb)
    }
}
