// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Ownership of prepared sensor devices.
//!
//! The framework never hands out references to a driver. When hardware is
//! prepared the driver is moved into the registry and the caller gets a
//! [`SensorHandle`] back. Every later framework entry point names the device
//! by that handle, and the registry resolves it to the driver.
//!
//! A handle is an index into the registry's slot array plus the unique
//! identifier the device was given when it was prepared. Once a device is
//! released its slot can be reused, and handles to the released device stop
//! resolving (`ErrorCode::NODEVICE`) because the identifier no longer matches.
//!
//! The registry lock is only held while a handle is resolved; driver entry
//! points run without it, so a timer callback for one device never waits on
//! a framework call for another.

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::collections::{CollectionList, PropertyKey, PropertyList};
use crate::hil::sensors::SensorDriver;
use crate::ErrorCode;

/// Opaque reference to a prepared sensor device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SensorHandle {
    index: usize,
    identifier: usize,
}

impl SensorHandle {
    /// A number unique to this device for the lifetime of the registry.
    pub fn id(&self) -> usize {
        self.identifier
    }
}

struct Slot {
    identifier: usize,
    driver: Arc<dyn SensorDriver>,
}

struct Slots {
    slots: Vec<Option<Slot>>,
    next_identifier: usize,
}

pub struct SensorRegistry {
    inner: RwLock<Slots>,
}

impl Default for SensorRegistry {
    fn default() -> Self {
        SensorRegistry::new()
    }
}

impl SensorRegistry {
    pub fn new() -> SensorRegistry {
        SensorRegistry {
            inner: RwLock::new(Slots {
                slots: Vec::new(),
                next_identifier: 0,
            }),
        }
    }

    /// Number of prepared devices.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prepare a device's hardware and take ownership of its driver.
    ///
    /// If the driver fails to prepare, it is dropped and nothing is
    /// registered.
    pub fn prepare_hardware(
        &self,
        driver: Arc<dyn SensorDriver>,
    ) -> Result<SensorHandle, ErrorCode> {
        driver.prepare_hardware()?;

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let identifier = inner.next_identifier;
        inner.next_identifier += 1;

        let slot = Some(Slot { identifier, driver });
        let index = match inner.slots.iter().position(|slot| slot.is_none()) {
            Some(index) => {
                inner.slots[index] = slot;
                index
            }
            None => {
                inner.slots.push(slot);
                inner.slots.len() - 1
            }
        };
        debug!("sensor {} prepared in slot {}", identifier, index);

        Ok(SensorHandle { index, identifier })
    }

    /// Release a device's hardware and drop the registry's ownership of it.
    ///
    /// The handle stops resolving even if the driver reports a failure.
    pub fn release_hardware(&self, handle: SensorHandle) -> Result<(), ErrorCode> {
        let slot = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            match inner.slots.get_mut(handle.index) {
                Some(slot) if Self::matches(slot, handle) => slot.take(),
                _ => None,
            }
        };
        let slot = slot.ok_or(ErrorCode::NODEVICE)?;
        debug!("sensor {} released", handle.identifier);
        slot.driver.release_hardware()
    }

    fn matches(slot: &Option<Slot>, handle: SensorHandle) -> bool {
        slot.as_ref()
            .is_some_and(|slot| slot.identifier == handle.identifier)
    }

    /// Resolve a handle to its driver.
    pub fn get(&self, handle: SensorHandle) -> Result<Arc<dyn SensorDriver>, ErrorCode> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match inner.slots.get(handle.index) {
            Some(Some(slot)) if slot.identifier == handle.identifier => Ok(slot.driver.clone()),
            _ => Err(ErrorCode::NODEVICE),
        }
    }

    pub fn d0_entry(&self, handle: SensorHandle) -> Result<(), ErrorCode> {
        self.get(handle)?.power_on()
    }

    pub fn d0_exit(&self, handle: SensorHandle) -> Result<(), ErrorCode> {
        self.get(handle)?.power_off()
    }

    pub fn start(&self, handle: SensorHandle) -> Result<(), ErrorCode> {
        self.get(handle)?.start()
    }

    pub fn stop(&self, handle: SensorHandle) -> Result<(), ErrorCode> {
        self.get(handle)?.stop()
    }

    pub fn supported_data_fields(
        &self,
        handle: SensorHandle,
        dest: Option<&mut PropertyList>,
    ) -> Result<usize, ErrorCode> {
        self.get(handle)?.supported_data_fields(dest)
    }

    pub fn properties(
        &self,
        handle: SensorHandle,
        dest: Option<&mut CollectionList>,
    ) -> Result<usize, ErrorCode> {
        self.get(handle)?.properties(dest)
    }

    pub fn data_field_properties(
        &self,
        handle: SensorHandle,
        field: &PropertyKey,
        dest: Option<&mut CollectionList>,
    ) -> Result<usize, ErrorCode> {
        self.get(handle)?.data_field_properties(field, dest)
    }

    pub fn data_interval(&self, handle: SensorHandle) -> Result<u32, ErrorCode> {
        Ok(self.get(handle)?.data_interval())
    }

    pub fn set_data_interval(&self, handle: SensorHandle, interval_ms: u32) -> Result<(), ErrorCode> {
        self.get(handle)?.set_data_interval(interval_ms)
    }

    pub fn data_thresholds(
        &self,
        handle: SensorHandle,
        dest: Option<&mut CollectionList>,
    ) -> Result<usize, ErrorCode> {
        self.get(handle)?.data_thresholds(dest)
    }

    pub fn set_data_thresholds(
        &self,
        handle: SensorHandle,
        thresholds: &CollectionList,
    ) -> Result<(), ErrorCode> {
        self.get(handle)?.set_data_thresholds(thresholds)
    }

    pub fn io_control(
        &self,
        handle: SensorHandle,
        code: u32,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, ErrorCode> {
        self.get(handle)?.io_control(code, input, output)
    }

    /// Deliver a timer expiry. Expiries for released devices are dropped.
    pub fn timer_expired(&self, handle: SensorHandle) {
        if let Ok(driver) = self.get(handle) {
            driver.timer_expired();
        }
    }

    /// Run the device's interrupt service routine and, if it claimed the
    /// interrupt, its deferred work.
    pub fn interrupt(&self, handle: SensorHandle) -> bool {
        match self.get(handle) {
            Ok(driver) => {
                let claimed = driver.interrupt();
                if claimed {
                    driver.interrupt_work();
                }
                claimed
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingDriver {
        prepared: AtomicUsize,
        released: AtomicUsize,
        ticks: AtomicUsize,
        fail_prepare: bool,
    }

    impl SensorDriver for CountingDriver {
        fn prepare_hardware(&self) -> Result<(), ErrorCode> {
            if self.fail_prepare {
                return Err(ErrorCode::IO);
            }
            self.prepared.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
        fn release_hardware(&self) -> Result<(), ErrorCode> {
            self.released.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
        fn power_on(&self) -> Result<(), ErrorCode> {
            Ok(())
        }
        fn power_off(&self) -> Result<(), ErrorCode> {
            Ok(())
        }
        fn start(&self) -> Result<(), ErrorCode> {
            Err(ErrorCode::STATE)
        }
        fn stop(&self) -> Result<(), ErrorCode> {
            Ok(())
        }
        fn supported_data_fields(&self, _: Option<&mut PropertyList>) -> Result<usize, ErrorCode> {
            Ok(8)
        }
        fn properties(&self, _: Option<&mut CollectionList>) -> Result<usize, ErrorCode> {
            Ok(8)
        }
        fn data_field_properties(
            &self,
            _: &PropertyKey,
            _: Option<&mut CollectionList>,
        ) -> Result<usize, ErrorCode> {
            Err(ErrorCode::NOSUPPORT)
        }
        fn data_interval(&self) -> u32 {
            100
        }
        fn set_data_interval(&self, _: u32) -> Result<(), ErrorCode> {
            Ok(())
        }
        fn data_thresholds(&self, _: Option<&mut CollectionList>) -> Result<usize, ErrorCode> {
            Ok(8)
        }
        fn set_data_thresholds(&self, _: &CollectionList) -> Result<(), ErrorCode> {
            Ok(())
        }
        fn timer_expired(&self) {
            self.ticks.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn handles_dispatch_to_their_driver() {
        let registry = SensorRegistry::new();
        let driver = Arc::new(CountingDriver::default());
        let handle = registry.prepare_hardware(driver.clone()).unwrap();

        assert_eq!(driver.prepared.load(Ordering::Relaxed), 1);
        assert_eq!(registry.start(handle), Err(ErrorCode::STATE));
        assert_eq!(registry.data_interval(handle), Ok(100));
        assert_eq!(registry.io_control(handle, 0, &[], &mut []), Err(ErrorCode::NOSUPPORT));
        registry.timer_expired(handle);
        assert_eq!(driver.ticks.load(Ordering::Relaxed), 1);
        assert!(!registry.interrupt(handle));
    }

    #[test]
    fn released_handles_go_stale() {
        let registry = SensorRegistry::new();
        let first = Arc::new(CountingDriver::default());
        let handle = registry.prepare_hardware(first.clone()).unwrap();
        registry.release_hardware(handle).unwrap();
        assert_eq!(first.released.load(Ordering::Relaxed), 1);

        // The slot is reused but the old handle must not reach the new device.
        let second = Arc::new(CountingDriver::default());
        let new_handle = registry.prepare_hardware(second.clone()).unwrap();
        assert_ne!(handle, new_handle);

        assert_eq!(registry.d0_entry(handle), Err(ErrorCode::NODEVICE));
        assert_eq!(registry.release_hardware(handle), Err(ErrorCode::NODEVICE));
        registry.timer_expired(handle);
        assert_eq!(second.ticks.load(Ordering::Relaxed), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_prepare_registers_nothing() {
        let registry = SensorRegistry::new();
        let driver = Arc::new(CountingDriver {
            fail_prepare: true,
            ..Default::default()
        });
        assert_eq!(registry.prepare_hardware(driver).err(), Some(ErrorCode::IO));
        assert!(registry.is_empty());
    }
}
