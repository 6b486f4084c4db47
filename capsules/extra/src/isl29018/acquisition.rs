// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! How samples are triggered.

use kernel::hil::i2c::RegisterBus;
use kernel::ErrorCode;

use super::registers::RegisterAdapter;

/// Samples are either taken on a timer, or whenever the device raises its
/// interrupt line.
///
/// In interrupt mode the interrupt window is set so that it is empty
/// (low above high), which makes every conversion raise the interrupt. The
/// threshold filter still applies to what gets published.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquisitionMode {
    Polling,
    Interrupt,
}

impl AcquisitionMode {
    pub fn uses_timer(self) -> bool {
        self == AcquisitionMode::Polling
    }

    pub fn enable<B: RegisterBus>(self, registers: &mut RegisterAdapter<B>) -> Result<(), ErrorCode> {
        match self {
            AcquisitionMode::Polling => Ok(()),
            AcquisitionMode::Interrupt => registers.write_interrupt_window(0xFFFF, 0x0000),
        }
    }

    pub fn disable<B: RegisterBus>(self, registers: &mut RegisterAdapter<B>) -> Result<(), ErrorCode> {
        match self {
            AcquisitionMode::Polling => Ok(()),
            AcquisitionMode::Interrupt => registers.write_interrupt_window(0x0000, 0xFFFF),
        }
    }
}
