// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Well-known property keys and GUIDs.

use uuid::Uuid;

use super::PropertyKey;

const SENSOR_PROPERTY: Uuid = Uuid::from_u128(0x7F8383EC_D3EC_495C_A8CF_B8BBE85C2920);
const SENSOR_ENUMERATION: Uuid = Uuid::from_u128(0xD4247382_969D_4F24_BB14_FB9671870BBF);
const DATA_TYPE_COMMON: Uuid = Uuid::from_u128(0xDB5E0CF2_CF1F_4C18_B46C_D86011D62150);
const DATA_TYPE_LIGHT: Uuid = Uuid::from_u128(0xE4C77CE2_DCB7_46E9_8439_4FEC548833A6);

/// Sensor type: ambient light.
pub const GUID_SENSOR_TYPE_AMBIENT_LIGHT: Uuid =
    Uuid::from_u128(0x97F115C8_599A_4153_8894_D2D12899918A);
/// Sensor category: light.
pub const GUID_SENSOR_CATEGORY_LIGHT: Uuid =
    Uuid::from_u128(0x17A665C0_9063_4216_B202_5C7A255E18CE);

// Sensor properties
pub const TYPE: PropertyKey = PropertyKey::new(SENSOR_PROPERTY, 2);
pub const STATE: PropertyKey = PropertyKey::new(SENSOR_PROPERTY, 3);
pub const MIN_DATA_INTERVAL: PropertyKey = PropertyKey::new(SENSOR_PROPERTY, 12);
pub const LIGHT_RESPONSE_CURVE: PropertyKey = PropertyKey::new(SENSOR_PROPERTY, 16);
pub const RESOLUTION: PropertyKey = PropertyKey::new(SENSOR_PROPERTY, 18);
pub const RANGE_MINIMUM: PropertyKey = PropertyKey::new(SENSOR_PROPERTY, 20);
pub const RANGE_MAXIMUM: PropertyKey = PropertyKey::new(SENSOR_PROPERTY, 21);
pub const MAX_DATA_FIELD_SIZE: PropertyKey = PropertyKey::new(SENSOR_PROPERTY, 22);

// Enumeration properties
pub const ENUM_TYPE: PropertyKey = PropertyKey::new(SENSOR_ENUMERATION, 2);
pub const MANUFACTURER: PropertyKey = PropertyKey::new(SENSOR_ENUMERATION, 3);
pub const MODEL: PropertyKey = PropertyKey::new(SENSOR_ENUMERATION, 4);
pub const CONNECTION_TYPE: PropertyKey = PropertyKey::new(SENSOR_ENUMERATION, 5);
pub const PERSISTENT_UNIQUE_ID: PropertyKey = PropertyKey::new(SENSOR_ENUMERATION, 6);
pub const CATEGORY: PropertyKey = PropertyKey::new(SENSOR_ENUMERATION, 7);
pub const IS_PRIMARY: PropertyKey = PropertyKey::new(SENSOR_ENUMERATION, 8);

// Data fields
pub const TIMESTAMP: PropertyKey = PropertyKey::new(DATA_TYPE_COMMON, 2);
pub const LIGHT_LEVEL_LUX: PropertyKey = PropertyKey::new(DATA_TYPE_LIGHT, 2);
/// Absolute change threshold on the lux data field.
pub const LIGHT_LEVEL_LUX_ABSOLUTE_DIFFERENCE: PropertyKey = PropertyKey::new(DATA_TYPE_LIGHT, 3);
