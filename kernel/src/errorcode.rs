// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Standard error enum for invoking operations

use crate::hil::i2c;

/// Standard errors returned by the sensor framework and its drivers.
///
/// Every framework entry point reports failure with one of these codes. The
/// numeric values are stable and are what the framework hands to its own
/// callers. Codes shared with the Tock system call interface keep their
/// values there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// The component is powered down
    OFF = 3,
    /// An invalid parameter was passed
    INVAL = 5,
    /// Parameter passed was too large
    SIZE = 6,
    /// Operation or command is unsupported
    NOSUPPORT = 9,
    /// Device does not exist
    NODEVICE = 10,
    /// Bus transfer failed: timeout, NACK or unresponsive device
    IO = 13,
    /// Operation is not valid in the current lifecycle state
    STATE = 14,
    /// Key is not present in the collection
    NOKEY = 15,
    /// A new sample did not clear the thresholds; nothing to report
    NOTACCEPTED = 16,
}

impl ErrorCode {
    /// Whether this code reports an actual failure.
    ///
    /// `NOTACCEPTED` only says that a sample was suppressed, and must not be
    /// treated as a fault by schedulers.
    pub fn is_fault(self) -> bool {
        self != ErrorCode::NOTACCEPTED
    }
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

impl From<i2c::Error> for ErrorCode {
    fn from(_err: i2c::Error) -> ErrorCode {
        ErrorCode::IO
    }
}

#[cfg(test)]
mod test {
    use super::ErrorCode;
    use crate::hil::i2c;

    #[test]
    fn bus_errors_collapse_to_io() {
        assert_eq!(ErrorCode::from(i2c::Error::AddressNak), ErrorCode::IO);
        assert_eq!(ErrorCode::from(i2c::Error::DataNak), ErrorCode::IO);
        assert_eq!(ErrorCode::from(i2c::Error::Overrun), ErrorCode::IO);
    }

    #[test]
    fn suppressed_samples_are_not_faults() {
        assert!(!ErrorCode::NOTACCEPTED.is_fault());
        assert!(ErrorCode::IO.is_fault());
    }

    #[test]
    fn shared_codes_keep_syscall_values() {
        assert_eq!(usize::from(ErrorCode::OFF), 3);
        assert_eq!(usize::from(ErrorCode::INVAL), 5);
        assert_eq!(usize::from(ErrorCode::SIZE), 6);
        assert_eq!(usize::from(ErrorCode::NOSUPPORT), 9);
        assert_eq!(usize::from(ErrorCode::NODEVICE), 10);
    }
}
