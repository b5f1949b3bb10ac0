//! The request table (§4.3): one fixed-capacity pool of per-(client,
//! sensor) rate/latency requests, scanned by sensor when recomputing an
//! aggregate target.

use crate::rate::RequestRate;
use crate::slab::FixedSlab;

#[derive(Debug, Clone, Copy)]
struct RequestEntry {
    sensor: u32,
    client: u32,
    rate: RequestRate,
    latency: u32,
}

pub struct RequestTable {
    entries: FixedSlab<RequestEntry>,
}

impl RequestTable {
    pub fn new(capacity: usize) -> Self {
        Self { entries: FixedSlab::new(capacity) }
    }

    /// Adds a new request. `false` if (sensor, client) already has one
    /// (callers amend instead) or the table is full.
    pub fn add(&mut self, sensor: u32, client: u32, rate: RequestRate, latency: u32) -> bool {
        if self.index_of(sensor, client).is_some() {
            return false;
        }
        self.entries.try_insert(RequestEntry { sensor, client, rate, latency }).is_some()
    }

    pub fn get(&self, sensor: u32, client: u32) -> Option<(RequestRate, u32)> {
        let i = self.index_of(sensor, client)?;
        self.entries.get(i).map(|e| (e.rate, e.latency))
    }

    pub fn amend(&mut self, sensor: u32, client: u32, rate: RequestRate, latency: u32) -> bool {
        match self.index_of(sensor, client).and_then(|i| self.entries.get_mut(i)) {
            Some(e) => {
                e.rate = rate;
                e.latency = latency;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, sensor: u32, client: u32) -> bool {
        match self.index_of(sensor, client) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// All live requests for one sensor, in table order.
    pub fn scan(&self, sensor: u32) -> impl Iterator<Item = (RequestRate, u32)> + '_ {
        self.entries.iter().filter(move |(_, e)| e.sensor == sensor).map(|(_, e)| (e.rate, e.latency))
    }

    fn index_of(&self, sensor: u32, client: u32) -> Option<usize> {
        self.entries.iter().find(|(_, e)| e.sensor == sensor && e.client == client).map(|(i, _)| i)
    }
}
