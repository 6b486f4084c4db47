// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

use std::sync::atomic::{AtomicUsize, Ordering};

use kernel::hil::sensors::{AmbientLightClient, LightSample};
use log::info;

/// Publish sink that logs every sample it is handed.
#[derive(Default)]
pub struct LogSink {
    count: AtomicUsize,
}

impl LogSink {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl AmbientLightClient for LogSink {
    fn sample_ready(&self, sample: LightSample) {
        self.count.fetch_add(1, Ordering::Relaxed);
        info!("{:.2} lx @ {} us", sample.lux, sample.timestamp_us);
    }
}
