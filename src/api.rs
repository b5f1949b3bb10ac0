//! The public surface (§4.6): register a sensor, request/change/release a
//! rate, trigger one-shot activity, and feed back driver completions. All
//! mutation is serialized through one `parking_lot::Mutex<CoreState>`,
//! matching the spec's single-cooperative-scheduler-context assumption on
//! a preemptive host (§5).

use parking_lot::Mutex;

use crate::binding::DriverBinding;
use crate::config::HubConfig;
use crate::error::CoreError;
use crate::events::{self, InternalEvent, InternalEventKind};
use crate::rate::{DriveRate, HwState, RequestRate, INVALID_LATENCY};
use crate::registry::{Registry, SensorInfo};
use crate::request_table::RequestTable;
use crate::scheduler::{DeferredScheduler, FifoScheduler};
use crate::aggregator;
use log::{debug, info};

/// State guarded by the hub's table lock. Opaque outside this crate: a
/// custom [`DeferredScheduler`] implementation only ever forwards boxed
/// callbacks, never inspects these fields directly.
pub struct CoreState {
    pub(crate) registry: Registry,
    pub(crate) request_table: RequestTable,
}

/// The sensor hub. `Sched` is the deferred-callback collaborator; it
/// defaults to [`FifoScheduler`] but can be replaced to hand completions to
/// a host scheduler instead of queuing them in-process.
pub struct SensorHub<Sched: DeferredScheduler<CoreState> = FifoScheduler<CoreState>> {
    state: Mutex<CoreState>,
    scheduler: Sched,
}

impl SensorHub<FifoScheduler<CoreState>> {
    pub fn new(config: HubConfig) -> Self {
        let scheduler = FifoScheduler::new(config.max_events);
        Self::with_scheduler(config, scheduler)
    }
}

impl<Sched: DeferredScheduler<CoreState>> SensorHub<Sched> {
    pub fn with_scheduler(config: HubConfig, scheduler: Sched) -> Self {
        Self {
            state: Mutex::new(CoreState {
                registry: Registry::new(config.max_sensors),
                request_table: RequestTable::new(config.max_requests),
            }),
            scheduler,
        }
    }

    pub fn register(&self, info: SensorInfo, binding: DriverBinding) -> Result<u32, CoreError> {
        let mut state = self.state.lock();
        let handle = state.registry.register(info, binding).ok_or(CoreError::Capacity("sensor table"))?;
        info!("sensor {handle} registered");
        Ok(handle)
    }

    pub fn unregister(&self, handle: u32) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        if state.registry.unregister(handle) {
            info!("sensor {handle} unregistered");
            Ok(())
        } else {
            Err(CoreError::NotFound("sensor"))
        }
    }

    pub fn find_by_type(&self, sensor_type: u32, nth: usize) -> Option<(u32, SensorInfo)> {
        let state = self.state.lock();
        state.registry.find_by_type(sensor_type, nth).map(|(h, info)| (h, info.clone()))
    }

    pub fn request(&self, client: u32, handle: u32, rate: RequestRate, latency: u32) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        let supported = state
            .registry
            .slot(handle)
            .ok_or(CoreError::NotFound("sensor"))?
            .info
            .supported_rates
            .clone();
        let target =
            aggregator::calc_hw_rate(state.request_table.scan(handle).map(|(r, _)| r), &supported, Some(rate), None);
        if target.is_impossible() {
            debug!("request rejected: no supported rate satisfies sensor {handle}");
            return Err(CoreError::Infeasible);
        }
        if !state.request_table.add(handle, client, rate, latency) {
            return Err(CoreError::Capacity("request table"));
        }
        events::reconfig_from_aggregate(&mut state, handle);
        Ok(())
    }

    pub fn request_rate_change(
        &self,
        client: u32,
        handle: u32,
        new_rate: RequestRate,
        new_latency: u32,
    ) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        let supported = state
            .registry
            .slot(handle)
            .ok_or(CoreError::NotFound("sensor"))?
            .info
            .supported_rates
            .clone();
        let (old_rate, _) = state.request_table.get(handle, client).ok_or(CoreError::NotFound("request"))?;
        let target = aggregator::calc_hw_rate(
            state.request_table.scan(handle).map(|(r, _)| r),
            &supported,
            Some(new_rate),
            Some(old_rate),
        );
        if target.is_impossible() {
            return Err(CoreError::Infeasible);
        }
        if !state.request_table.amend(handle, client, new_rate, new_latency) {
            return Err(CoreError::NotFound("request"));
        }
        events::reconfig_from_aggregate(&mut state, handle);
        Ok(())
    }

    pub fn release(&self, client: u32, handle: u32) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        state.registry.slot(handle).ok_or(CoreError::NotFound("sensor"))?;
        if !state.request_table.remove(handle, client) {
            return Err(CoreError::NotFound("request"));
        }
        events::reconfig_from_aggregate(&mut state, handle);
        Ok(())
    }

    /// Returns the driver/applet's accept (`true`) or reject (`false`) of
    /// the trigger, once the client's request and the sensor are found.
    pub fn trigger_on_demand(&self, client: u32, handle: u32) -> Result<bool, CoreError> {
        let state = self.state.lock();
        state.request_table.get(handle, client).ok_or(CoreError::NotFound("request"))?;
        let slot = state.registry.slot(handle).ok_or(CoreError::NotFound("sensor"))?;
        let accepted = slot.binding.trigger_on_demand();
        if !accepted {
            debug!("driver rejected trigger-on-demand for sensor {handle}");
        }
        Ok(accepted)
    }

    /// Returns the driver/applet's accept (`true`) or reject (`false`) of
    /// the flush, once the sensor is found.
    pub fn flush(&self, handle: u32) -> Result<bool, CoreError> {
        let state = self.state.lock();
        let slot = state.registry.slot(handle).ok_or(CoreError::NotFound("sensor"))?;
        let accepted = slot.binding.flush();
        if !accepted {
            debug!("driver rejected flush for sensor {handle}");
        }
        Ok(accepted)
    }

    pub fn get_cur_rate(&self, handle: u32) -> HwState {
        let state = self.state.lock();
        state.registry.slot(handle).map(|s| s.state()).unwrap_or(HwState::Off)
    }

    pub fn get_cur_latency(&self, handle: u32) -> u32 {
        let state = self.state.lock();
        state.registry.slot(handle).map(|s| s.state().latency()).unwrap_or(INVALID_LATENCY)
    }

    pub fn signal_internal_event(&self, handle: u32, kind: InternalEventKind) -> Result<(), CoreError> {
        let event = InternalEvent { handle, kind };
        if self.scheduler.defer(Box::new(move |state: &mut CoreState| events::dispatch(state, event))) {
            Ok(())
        } else {
            Err(CoreError::Capacity("internal event queue"))
        }
    }

    pub fn signal_power_state_changed(&self, handle: u32, now_on: bool) -> Result<(), CoreError> {
        self.signal_internal_event(handle, InternalEventKind::PowerStateChanged { now_on })
    }

    pub fn signal_firmware_state_changed(
        &self,
        handle: u32,
        final_rate: u32,
        final_latency: u32,
    ) -> Result<(), CoreError> {
        self.signal_internal_event(handle, InternalEventKind::FirmwareStateChanged { final_rate, final_latency })
    }

    pub fn signal_rate_changed(&self, handle: u32, new_rate: DriveRate, new_latency: u32) -> Result<(), CoreError> {
        self.signal_internal_event(handle, InternalEventKind::RateChanged { new_rate, new_latency })
    }

    /// Drains every deferred completion callback under the table lock.
    /// Mirrors a host scheduler servicing its event queue.
    pub fn drain(&self) {
        let mut state = self.state.lock();
        self.scheduler.drain(&mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::DriverOps;
    use std::sync::Arc;

    struct NullDriver;
    impl DriverOps for NullDriver {
        fn power(&self, _on: bool) -> bool { true }
        fn firmware_upload(&self) -> bool { true }
        fn set_rate(&self, _rate: DriveRate, _latency: u32) -> bool { true }
        fn flush(&self) -> bool { true }
        fn trigger_on_demand(&self) -> bool { true }
    }

    struct RefusingDriver;
    impl DriverOps for RefusingDriver {
        fn power(&self, _on: bool) -> bool { true }
        fn firmware_upload(&self) -> bool { true }
        fn set_rate(&self, _rate: DriveRate, _latency: u32) -> bool { true }
        fn flush(&self) -> bool { false }
        fn trigger_on_demand(&self) -> bool { false }
    }

    fn hub_with(binding: DriverBinding) -> (SensorHub, u32) {
        let hub = SensorHub::new(HubConfig::default());
        let info = SensorInfo { sensor_type: 1, supported_rates: vec![5, 10, 25] };
        let handle = hub.register(info, binding).unwrap();
        (hub, handle)
    }

    #[test]
    fn register_and_find_by_type() {
        let (hub, handle) = hub_with(DriverBinding::Direct(Arc::new(NullDriver)));
        assert_eq!(hub.find_by_type(1, 0).map(|(h, _)| h), Some(handle));
        assert_eq!(hub.find_by_type(1, 1), None);
    }

    #[test]
    fn unregister_unknown_handle_is_not_found() {
        let hub = SensorHub::new(HubConfig::default());
        assert_eq!(hub.unregister(99), Err(CoreError::NotFound("sensor")));
    }

    #[test]
    fn flush_and_trigger_propagate_driver_acceptance() {
        let (hub, handle) = hub_with(DriverBinding::Direct(Arc::new(NullDriver)));
        hub.request(1, handle, RequestRate::Concrete(10), INVALID_LATENCY).unwrap();
        assert_eq!(hub.flush(handle), Ok(true));
        assert_eq!(hub.trigger_on_demand(1, handle), Ok(true));
    }

    #[test]
    fn flush_and_trigger_propagate_driver_refusal() {
        let (hub, handle) = hub_with(DriverBinding::Direct(Arc::new(RefusingDriver)));
        hub.request(1, handle, RequestRate::Concrete(10), INVALID_LATENCY).unwrap();
        assert_eq!(hub.flush(handle), Ok(false));
        assert_eq!(hub.trigger_on_demand(1, handle), Ok(false));
    }

    #[test]
    fn flush_unknown_sensor_is_not_found() {
        let hub = SensorHub::new(HubConfig::default());
        assert_eq!(hub.flush(99), Err(CoreError::NotFound("sensor")));
    }

    #[test]
    fn trigger_on_demand_without_a_request_is_not_found() {
        let (hub, handle) = hub_with(DriverBinding::Direct(Arc::new(NullDriver)));
        assert_eq!(hub.trigger_on_demand(1, handle), Err(CoreError::NotFound("request")));
    }

    #[test]
    fn release_on_an_orphaned_handle_is_not_found_and_leaves_the_request() {
        let (hub, handle) = hub_with(DriverBinding::Direct(Arc::new(NullDriver)));
        hub.request(1, handle, RequestRate::Concrete(10), INVALID_LATENCY).unwrap();
        hub.unregister(handle).unwrap();

        assert_eq!(hub.release(1, handle), Err(CoreError::NotFound("sensor")));
    }
}
