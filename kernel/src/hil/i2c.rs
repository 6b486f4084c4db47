// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for register-oriented I2C peripherals.
//!
//! Sensor capsules talk to their device through a [`RegisterBus`]: a write
//! of one byte to a register, or a read of consecutive bytes starting at a
//! register. Transfers are blocking and rely on the transport's own timeout;
//! nothing at this layer retries.
//!
//! [`I2CDevice`] turns any blocking `embedded_hal::i2c::I2c` bus plus a
//! 7-bit device address into a `RegisterBus`.

use core::fmt::{Display, Formatter, Result as FmtResult};

use embedded_hal::i2c::{ErrorKind, I2c, NoAcknowledgeSource};

/// The type of error encountered during an I2C transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The device did not acknowledge its address. Most likely the address
    /// is incorrect or the device is not properly connected.
    AddressNak,

    /// The data was not acknowledged by the device.
    DataNak,

    /// Arbitration lost, meaning the state of the data line does not correspond
    /// to the data driven onto it.
    ArbitrationLost,

    /// The controller could not keep up with the transfer.
    Overrun,

    /// The transport gave up waiting for the transfer to complete.
    Timeout,

    /// Any other bus failure.
    Bus,
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        let display_str = match *self {
            Error::AddressNak => "I2C Address Not Acknowledged",
            Error::DataNak => "I2C Data Not Acknowledged",
            Error::ArbitrationLost => "I2C Bus Arbitration Lost",
            Error::Overrun => "I2C Overrun",
            Error::Timeout => "I2C Transfer Timed Out",
            Error::Bus => "I2C Bus Error",
        };
        write!(fmt, "{}", display_str)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        match kind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => Error::AddressNak,
            ErrorKind::NoAcknowledge(_) => Error::DataNak,
            ErrorKind::ArbitrationLoss => Error::ArbitrationLost,
            ErrorKind::Overrun => Error::Overrun,
            _ => Error::Bus,
        }
    }
}

/// Register access to a single device on a bus.
pub trait RegisterBus: Send {
    /// Read `buffer.len()` consecutive bytes starting at `register`.
    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Error>;

    /// Write one byte to `register`.
    fn write(&mut self, register: u8, value: u8) -> Result<(), Error>;
}

/// A device at a fixed address on an `embedded_hal` I2C bus.
pub struct I2CDevice<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2CDevice<I> {
    pub fn new(i2c: I, address: u8) -> I2CDevice<I> {
        I2CDevice { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the underlying bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c + Send> RegisterBus for I2CDevice<I> {
    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Error> {
        self.i2c
            .write_read(self.address, &[register], buffer)
            .map_err(|err| embedded_hal::i2c::Error::kind(&err).into())
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), Error> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|err| embedded_hal::i2c::Error::kind(&err).into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDRESS: u8 = 0x44;

    #[test]
    fn read_addresses_register_then_reads() {
        let expectations = [I2cTransaction::write_read(
            ADDRESS,
            vec![0x02],
            vec![0x34, 0x12],
        )];
        let mut device = I2CDevice::new(I2cMock::new(&expectations), ADDRESS);

        let mut buffer = [0; 2];
        device.read(0x02, &mut buffer).unwrap();
        assert_eq!(buffer, [0x34, 0x12]);

        device.release().done();
    }

    #[test]
    fn write_sends_register_and_value() {
        let expectations = [I2cTransaction::write(ADDRESS, vec![0x01, 0x01])];
        let mut device = I2CDevice::new(I2cMock::new(&expectations), ADDRESS);

        device.write(0x01, 0x01).unwrap();

        device.release().done();
    }

    #[test]
    fn transport_errors_are_classified() {
        let expectations = [I2cTransaction::write(ADDRESS, vec![0x00, 0xA0])
            .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))];
        let mut device = I2CDevice::new(I2cMock::new(&expectations), ADDRESS);

        assert_eq!(device.write(0x00, 0xA0), Err(Error::AddressNak));

        device.release().done();
    }

    #[test]
    fn unknown_error_kinds_are_bus_errors() {
        assert_eq!(Error::from(ErrorKind::Other), Error::Bus);
        assert_eq!(Error::from(ErrorKind::ArbitrationLoss), Error::ArbitrationLost);
        assert_eq!(
            Error::from(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)),
            Error::DataNak
        );
    }
}
