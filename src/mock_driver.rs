//! An in-process, no-hardware `DriverOps` that records what it was asked
//! to do instead of touching anything real. Shipped as a regular module
//! (the way a driver crate ships its own mock alongside the real one) so
//! both the demo binary and integration tests can drive the hub without a
//! real sensor.

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::binding::DriverOps;
use crate::rate::DriveRate;

#[derive(Default)]
pub struct MockDriver {
    power_on_calls: AtomicU32,
    power_off_calls: AtomicU32,
    fw_upload_calls: AtomicU32,
    flush_calls: AtomicU32,
    trigger_calls: AtomicU32,
    set_rate_calls: Mutex<Vec<(DriveRate, u32)>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_on_calls(&self) -> u32 {
        self.power_on_calls.load(Ordering::Relaxed)
    }

    pub fn power_off_calls(&self) -> u32 {
        self.power_off_calls.load(Ordering::Relaxed)
    }

    pub fn fw_upload_calls(&self) -> u32 {
        self.fw_upload_calls.load(Ordering::Relaxed)
    }

    pub fn flush_calls(&self) -> u32 {
        self.flush_calls.load(Ordering::Relaxed)
    }

    pub fn trigger_calls(&self) -> u32 {
        self.trigger_calls.load(Ordering::Relaxed)
    }

    pub fn last_set_rate(&self) -> Option<(DriveRate, u32)> {
        self.set_rate_calls.lock().last().copied()
    }

    pub fn set_rate_calls(&self) -> Vec<(DriveRate, u32)> {
        self.set_rate_calls.lock().clone()
    }
}

impl DriverOps for MockDriver {
    fn power(&self, on: bool) -> bool {
        if on {
            self.power_on_calls.fetch_add(1, Ordering::Relaxed);
        } else {
            self.power_off_calls.fetch_add(1, Ordering::Relaxed);
        }
        true
    }

    fn firmware_upload(&self) -> bool {
        self.fw_upload_calls.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn set_rate(&self, rate: DriveRate, latency: u32) -> bool {
        self.set_rate_calls.lock().push((rate, latency));
        true
    }

    fn flush(&self) -> bool {
        self.flush_calls.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn trigger_on_demand(&self) -> bool {
        self.trigger_calls.fetch_add(1, Ordering::Relaxed);
        true
    }
}
