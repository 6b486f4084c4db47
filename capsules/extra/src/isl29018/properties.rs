// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Property catalogs reported to the sensor framework.
//!
//! The shape of every catalog (which keys it holds) is fixed when the store
//! is built; afterwards only values change. Each catalog has its own
//! read-write lock. When the driver needs both, the bus lock is always taken
//! before a catalog lock.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use kernel::collections::keys;
use kernel::collections::{CollectionList, PropertyKey, PropertyList, PropertyValue};
use kernel::hil::sensors::{ConnectionType, LightSample, SensorState};
use kernel::ErrorCode;
use uuid::Uuid;

use super::config::Isl29018Config;
use super::threshold::ThresholdConfig;

pub const MANUFACTURER: &str = "Intersil";
pub const MODEL: &str = "ISL29018";
pub const PERSISTENT_UNIQUE_ID: Uuid = Uuid::from_u128(0x2D2A4524_51E3_4E68_9B0F_5CAEDFB12C02);

/// Light response curve: pairs of (lux level, required percent change).
pub const RESPONSE_CURVE: [u32; 10] = [0, 10, 10, 40, 40, 100, 68, 400, 90, 1000];

/// Percent threshold on the lux field. This shares its key with the lux data
/// field itself.
pub const THRESHOLD_PERCENT: PropertyKey = keys::LIGHT_LEVEL_LUX;
pub const THRESHOLD_ABSOLUTE: PropertyKey = keys::LIGHT_LEVEL_LUX_ABSOLUTE_DIFFERENCE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Catalog {
    Properties,
    EnumerationProperties,
    DataFieldProperties,
    Thresholds,
    Data,
}

pub struct PropertyStore {
    properties: RwLock<CollectionList>,
    enumeration: RwLock<CollectionList>,
    data_field_properties: RwLock<CollectionList>,
    thresholds: RwLock<CollectionList>,
    data: RwLock<CollectionList>,
    supported_fields: PropertyList,
}

impl PropertyStore {
    pub fn new(config: &Isl29018Config) -> PropertyStore {
        let data = CollectionList::from_entries([
            (keys::TIMESTAMP, PropertyValue::FileTime(0)),
            (keys::LIGHT_LEVEL_LUX, PropertyValue::F32(0.0)),
        ]);

        let properties = CollectionList::from_entries([
            (
                keys::STATE,
                PropertyValue::U32(SensorState::Initializing as u32),
            ),
            (
                keys::MIN_DATA_INTERVAL,
                PropertyValue::U32(config.minimum_interval_ms),
            ),
            (
                keys::MAX_DATA_FIELD_SIZE,
                PropertyValue::U32(data.marshalled_size() as u32),
            ),
            (
                keys::TYPE,
                PropertyValue::Guid(keys::GUID_SENSOR_TYPE_AMBIENT_LIGHT),
            ),
            (
                keys::LIGHT_RESPONSE_CURVE,
                PropertyValue::U32Vector(RESPONSE_CURVE.to_vec()),
            ),
        ]);

        let enumeration = CollectionList::from_entries([
            (
                keys::ENUM_TYPE,
                PropertyValue::Guid(keys::GUID_SENSOR_TYPE_AMBIENT_LIGHT),
            ),
            (keys::MANUFACTURER, PropertyValue::Str(MANUFACTURER.into())),
            (keys::MODEL, PropertyValue::Str(MODEL.into())),
            (
                keys::CONNECTION_TYPE,
                PropertyValue::U32(ConnectionType::Integrated as u32),
            ),
            (
                keys::PERSISTENT_UNIQUE_ID,
                PropertyValue::Guid(PERSISTENT_UNIQUE_ID),
            ),
            (
                keys::CATEGORY,
                PropertyValue::Guid(keys::GUID_SENSOR_CATEGORY_LIGHT),
            ),
            (keys::IS_PRIMARY, PropertyValue::Bool(true)),
        ]);

        let data_field_properties = CollectionList::from_entries([
            (keys::RESOLUTION, PropertyValue::F32(config.lux_per_count())),
            (keys::RANGE_MINIMUM, PropertyValue::F32(0.0)),
            (
                keys::RANGE_MAXIMUM,
                PropertyValue::F32(config.range.full_scale_lux()),
            ),
        ]);

        let thresholds = CollectionList::from_entries([
            (
                THRESHOLD_PERCENT,
                PropertyValue::F32(config.initial_threshold_pct),
            ),
            (
                THRESHOLD_ABSOLUTE,
                PropertyValue::F32(config.initial_threshold_abs),
            ),
        ]);

        PropertyStore {
            properties: RwLock::new(properties),
            enumeration: RwLock::new(enumeration),
            data_field_properties: RwLock::new(data_field_properties),
            thresholds: RwLock::new(thresholds),
            data: RwLock::new(data),
            supported_fields: PropertyList::from_keys([keys::TIMESTAMP, keys::LIGHT_LEVEL_LUX]),
        }
    }

    fn lock(&self, catalog: Catalog) -> &RwLock<CollectionList> {
        match catalog {
            Catalog::Properties => &self.properties,
            Catalog::EnumerationProperties => &self.enumeration,
            Catalog::DataFieldProperties => &self.data_field_properties,
            Catalog::Thresholds => &self.thresholds,
            Catalog::Data => &self.data,
        }
    }

    fn read(&self, catalog: Catalog) -> RwLockReadGuard<'_, CollectionList> {
        self.lock(catalog)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, catalog: Catalog) -> RwLockWriteGuard<'_, CollectionList> {
        self.lock(catalog)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Marshalled size of a catalog.
    pub fn size(&self, catalog: Catalog) -> usize {
        self.read(catalog).marshalled_size()
    }

    /// Report a catalog's size, and copy it into `dest` if one is given.
    pub fn copy_out(
        &self,
        catalog: Catalog,
        dest: Option<&mut CollectionList>,
    ) -> Result<usize, ErrorCode> {
        let source = self.read(catalog);
        match dest {
            Some(dest) => dest.copy_from(&source),
            None => Ok(source.marshalled_size()),
        }
    }

    pub fn copy_supported_fields(&self, dest: Option<&mut PropertyList>) -> Result<usize, ErrorCode> {
        match dest {
            Some(dest) => dest.copy_from(&self.supported_fields),
            None => Ok(self.supported_fields.marshalled_size()),
        }
    }

    pub fn is_supported(&self, field: &PropertyKey) -> bool {
        self.supported_fields.contains(field)
    }

    pub fn find_and_get(&self, catalog: Catalog, key: &PropertyKey) -> Result<PropertyValue, ErrorCode> {
        self.read(catalog).get(key).cloned()
    }

    pub fn find_and_set(
        &self,
        catalog: Catalog,
        key: PropertyKey,
        value: PropertyValue,
        must_exist: bool,
    ) -> Result<(), ErrorCode> {
        self.write(catalog).set(key, value, must_exist)
    }

    pub fn set_state(&self, state: SensorState) {
        self.write(Catalog::Properties)
            .insert_or_replace(keys::STATE, PropertyValue::U32(state as u32));
    }

    pub fn state(&self) -> Option<u32> {
        self.read(Catalog::Properties)
            .find(&keys::STATE)
            .and_then(PropertyValue::as_u32)
    }

    /// Store the most recently published sample in the data catalog.
    pub fn record_sample(&self, sample: &LightSample) {
        let mut data = self.write(Catalog::Data);
        data.insert_or_replace(keys::TIMESTAMP, PropertyValue::FileTime(sample.timestamp_us));
        data.insert_or_replace(keys::LIGHT_LEVEL_LUX, PropertyValue::F32(sample.lux));
    }

    /// Thresholds as currently stored.
    pub fn thresholds(&self) -> Result<ThresholdConfig, ErrorCode> {
        Self::thresholds_from(&self.read(Catalog::Thresholds))
    }

    fn thresholds_from(catalog: &CollectionList) -> Result<ThresholdConfig, ErrorCode> {
        Ok(ThresholdConfig {
            percent: catalog.get_f32(&THRESHOLD_PERCENT)?,
            absolute_lux: catalog.get_f32(&THRESHOLD_ABSOLUTE)?,
        })
    }

    /// Apply a batch of threshold changes and return the thresholds now in
    /// effect.
    ///
    /// The batch is checked in full before anything is written: a key other
    /// than the two lux thresholds fails with `ErrorCode::NOSUPPORT`, a value
    /// that is not a finite non-negative float with `ErrorCode::INVAL`. A
    /// rejected batch changes nothing.
    pub fn apply_thresholds(&self, batch: &CollectionList) -> Result<ThresholdConfig, ErrorCode> {
        for (key, value) in batch.iter() {
            if *key != THRESHOLD_PERCENT && *key != THRESHOLD_ABSOLUTE {
                return Err(ErrorCode::NOSUPPORT);
            }
            match value.as_f32() {
                Some(v) if ThresholdConfig::is_valid(v) => {}
                _ => return Err(ErrorCode::INVAL),
            }
        }

        let mut thresholds = self.write(Catalog::Thresholds);
        for (key, value) in batch.iter() {
            thresholds.set(*key, value.clone(), true)?;
        }
        Self::thresholds_from(&thresholds)
    }
}
