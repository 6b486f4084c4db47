// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Key/value collections exchanged between the sensor framework and drivers.
//!
//! A [`CollectionList`] is an ordered list of property key/value pairs, used
//! for sensor properties, data-field properties, thresholds and samples. A
//! [`PropertyList`] carries keys only and is used to advertise supported data
//! fields.
//!
//! Both know the size they occupy when marshalled for the framework, so that
//! a caller can size a destination before copying into it. Destinations have
//! a fixed byte capacity; copying a collection that does not fit fails with
//! `ErrorCode::SIZE` and leaves the destination empty.

pub mod keys;

use uuid::Uuid;

use crate::ErrorCode;

/// Bytes taken by the collection header: count and allocated size.
const HEADER_SIZE: usize = 8;
/// Bytes taken by a marshalled key: format id and property id.
const KEY_SIZE: usize = 20;
/// Bytes taken by the fixed part of a marshalled value.
const VALUE_SIZE: usize = 24;

/// Identifies a property: a format GUID and an id within that format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    pub fmtid: Uuid,
    pub pid: u32,
}

impl PropertyKey {
    pub const fn new(fmtid: Uuid, pid: u32) -> PropertyKey {
        PropertyKey { fmtid, pid }
    }
}

/// A typed property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    U32(u32),
    F32(f32),
    Bool(bool),
    Guid(Uuid),
    Str(String),
    U32Vector(Vec<u32>),
    /// Microseconds since the Unix epoch.
    FileTime(u64),
}

impl PropertyValue {
    /// Bytes stored out of line for this value.
    fn payload_size(&self) -> usize {
        match self {
            // UTF-16 with terminator
            PropertyValue::Str(s) => (s.encode_utf16().count() + 1) * 2,
            PropertyValue::U32Vector(v) => v.len() * core::mem::size_of::<u32>(),
            _ => 0,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            PropertyValue::F32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            PropertyValue::U32(v) => Some(v),
            _ => None,
        }
    }
}

/// An ordered list of unique property keys and their values.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionList {
    capacity: usize,
    entries: Vec<(PropertyKey, PropertyValue)>,
}

impl Default for CollectionList {
    fn default() -> Self {
        CollectionList::new()
    }
}

impl CollectionList {
    /// An empty collection with unbounded capacity.
    pub fn new() -> CollectionList {
        CollectionList {
            capacity: usize::MAX,
            entries: Vec::new(),
        }
    }

    /// An empty destination that can receive at most `bytes` marshalled bytes.
    pub fn with_capacity_bytes(bytes: usize) -> CollectionList {
        CollectionList {
            capacity: bytes,
            entries: Vec::new(),
        }
    }

    /// Build a collection from pairs. A repeated key keeps the last value.
    pub fn from_entries<I>(entries: I) -> CollectionList
    where
        I: IntoIterator<Item = (PropertyKey, PropertyValue)>,
    {
        let mut list = CollectionList::new();
        for (key, value) in entries {
            list.insert_or_replace(key, value);
        }
        list
    }

    /// Size of this collection once marshalled.
    pub fn marshalled_size(&self) -> usize {
        HEADER_SIZE
            + self
                .entries
                .iter()
                .map(|(_, value)| KEY_SIZE + VALUE_SIZE + value.payload_size())
                .sum::<usize>()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(PropertyKey, PropertyValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.find(key).is_some()
    }

    pub fn find(&self, key: &PropertyKey) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Look up `key`, failing with `ErrorCode::NOKEY` if absent.
    pub fn get(&self, key: &PropertyKey) -> Result<&PropertyValue, ErrorCode> {
        self.find(key).ok_or(ErrorCode::NOKEY)
    }

    /// Look up a float valued property. A value of another type is `INVAL`.
    pub fn get_f32(&self, key: &PropertyKey) -> Result<f32, ErrorCode> {
        self.get(key)?.as_f32().ok_or(ErrorCode::INVAL)
    }

    /// Replace the value of `key`.
    ///
    /// If the key is absent it is appended, unless `must_exist` is set, in
    /// which case `ErrorCode::NOKEY` is returned and nothing changes.
    pub fn set(
        &mut self,
        key: PropertyKey,
        value: PropertyValue,
        must_exist: bool,
    ) -> Result<(), ErrorCode> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => {
                *slot = value;
                Ok(())
            }
            None if must_exist => Err(ErrorCode::NOKEY),
            None => {
                self.entries.push((key, value));
                Ok(())
            }
        }
    }

    /// Replace the value of `key`, appending it if absent.
    pub fn insert_or_replace(&mut self, key: PropertyKey, value: PropertyValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Copy `source` into this destination and return the marshalled size.
    pub fn copy_from(&mut self, source: &CollectionList) -> Result<usize, ErrorCode> {
        let size = source.marshalled_size();
        if size > self.capacity {
            self.entries.clear();
            return Err(ErrorCode::SIZE);
        }
        self.entries.clone_from(&source.entries);
        Ok(size)
    }
}

/// An ordered list of unique property keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyList {
    capacity: usize,
    keys: Vec<PropertyKey>,
}

impl Default for PropertyList {
    fn default() -> Self {
        PropertyList::new()
    }
}

impl PropertyList {
    pub fn new() -> PropertyList {
        PropertyList {
            capacity: usize::MAX,
            keys: Vec::new(),
        }
    }

    pub fn with_capacity_bytes(bytes: usize) -> PropertyList {
        PropertyList {
            capacity: bytes,
            keys: Vec::new(),
        }
    }

    pub fn from_keys<I: IntoIterator<Item = PropertyKey>>(keys: I) -> PropertyList {
        let mut list = PropertyList::new();
        for key in keys {
            if !list.contains(&key) {
                list.keys.push(key);
            }
        }
        list
    }

    pub fn marshalled_size(&self) -> usize {
        HEADER_SIZE + self.keys.len() * KEY_SIZE
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyKey> {
        self.keys.iter()
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.keys.contains(key)
    }

    pub fn copy_from(&mut self, source: &PropertyList) -> Result<usize, ErrorCode> {
        let size = source.marshalled_size();
        if size > self.capacity {
            self.keys.clear();
            return Err(ErrorCode::SIZE);
        }
        self.keys.clone_from(&source.keys);
        Ok(size)
    }
}
