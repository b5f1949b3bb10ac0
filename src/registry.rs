//! The sensor registry (§4.1): register/unregister a sensor, look it up by
//! handle or scan by type. Keyed-by-identifier the way a device table keyed
//! by handle looks things up — linear scan over a small fixed-capacity
//! table rather than a hash map, since sensor counts are small and bounded.

use crate::binding::DriverBinding;
use crate::handle::HandleSpace;
use crate::rate::HwState;
use crate::slab::FixedSlab;

/// Immutable per-sensor descriptor, supplied at registration.
#[derive(Debug, Clone)]
pub struct SensorInfo {
    /// Caller-defined type tag (e.g. accelerometer vs. gyroscope).
    pub sensor_type: u32,
    /// Hardware rates this sensor supports, ascending.
    pub supported_rates: Vec<u32>,
}

pub struct SensorSlot {
    pub(crate) handle: u32,
    pub info: SensorInfo,
    pub(crate) state: HwState,
    pub(crate) binding: DriverBinding,
}

impl SensorSlot {
    pub fn handle(&self) -> u32 {
        self.handle
    }

    pub fn state(&self) -> HwState {
        self.state
    }
}

pub struct Registry {
    slots: FixedSlab<SensorSlot>,
    handles: HandleSpace,
}

impl Registry {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: FixedSlab::new(capacity),
            handles: HandleSpace::new(),
        }
    }

    /// Allocates a handle and a slot. `None` if the sensor table is full.
    pub fn register(&mut self, info: SensorInfo, binding: DriverBinding) -> Option<u32> {
        let live: Vec<u32> = self.slots.iter().map(|(_, s)| s.handle).collect();
        let handle = self.handles.allocate(|h| live.contains(&h));
        let slot = SensorSlot { handle, info, state: HwState::Off, binding };
        self.slots.try_insert(slot)?;
        Some(handle)
    }

    /// Removes a sensor's slot. Requests referencing this handle are left
    /// in the request table as orphans (§3: no sweep on unregister).
    pub fn unregister(&mut self, handle: u32) -> bool {
        if handle == 0 {
            return false;
        }
        match self.index_of(handle) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn slot(&self, handle: u32) -> Option<&SensorSlot> {
        self.index_of(handle).and_then(|i| self.slots.get(i))
    }

    pub fn slot_mut(&mut self, handle: u32) -> Option<&mut SensorSlot> {
        let index = self.index_of(handle)?;
        self.slots.get_mut(index)
    }

    pub fn find_by_type(&self, sensor_type: u32, nth: usize) -> Option<(u32, &SensorInfo)> {
        self.slots
            .iter()
            .filter(|(_, s)| s.info.sensor_type == sensor_type)
            .nth(nth)
            .map(|(_, s)| (s.handle, &s.info))
    }

    fn index_of(&self, handle: u32) -> Option<usize> {
        self.slots.iter().find(|(_, s)| s.handle == handle).map(|(i, _)| i)
    }
}
