//! Internal driver-completion events (§4.5/§4.6) and their dispatch onto
//! `CoreState`. `SensorHub::signal_*` wraps these into a boxed callback and
//! hands it to the deferred scheduler; `SensorHub::drain` is what actually
//! runs [`dispatch`].

use log::debug;

use crate::api::CoreState;
use crate::rate::DriveRate;
use crate::{aggregator, state_machine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEventKind {
    PowerStateChanged { now_on: bool },
    FirmwareStateChanged { final_rate: u32, final_latency: u32 },
    RateChanged { new_rate: DriveRate, new_latency: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct InternalEvent {
    pub handle: u32,
    pub kind: InternalEventKind,
}

pub(crate) fn dispatch(state: &mut CoreState, event: InternalEvent) {
    let handle = event.handle;
    match event.kind {
        InternalEventKind::PowerStateChanged { now_on } => match state.registry.slot_mut(handle) {
            Some(slot) => state_machine::on_power_state_changed(slot, now_on),
            None => debug!("power-state-changed for unknown handle {handle}"),
        },
        InternalEventKind::FirmwareStateChanged { final_rate, final_latency } => {
            let outcome = match state.registry.slot_mut(handle) {
                Some(slot) => Some(state_machine::on_firmware_state_changed(slot, final_rate, final_latency)),
                None => {
                    debug!("firmware-state-changed for unknown handle {handle}");
                    None
                }
            };
            if matches!(outcome, Some(state_machine::FwOutcome::NeedsReconfig)) {
                reconfig_from_aggregate(state, handle);
            }
        }
        InternalEventKind::RateChanged { new_rate, new_latency } => match state.registry.slot_mut(handle) {
            Some(slot) => state_machine::on_rate_changed(slot, new_rate, new_latency),
            None => debug!("rate-changed for unknown handle {handle}"),
        },
    }
}

/// Recomputes the aggregate target for `handle` from the request table and
/// feeds it to `reconfig`. Shared by the public request/release mutators
/// and by firmware-completion handling.
pub(crate) fn reconfig_from_aggregate(state: &mut CoreState, handle: u32) {
    let Some(supported) = state.registry.slot(handle).map(|s| s.info.supported_rates.clone()) else {
        return;
    };
    let target = aggregator::calc_hw_rate(state.request_table.scan(handle).map(|(r, _)| r), &supported, None, None);
    let target_latency = aggregator::calc_hw_latency(state.request_table.scan(handle).map(|(_, l)| l));
    if let Some(slot) = state.registry.slot_mut(handle) {
        state_machine::reconfig(slot, target, target_latency);
    }
}
