//! The power/firmware state machine (§4.5): drives a sensor from OFF
//! through POWERING-ON/FW-UPLOADING to a running configuration (or back
//! down), one step per call, reacting to the driver's asynchronous
//! completion events.

use log::{debug, warn};

use crate::rate::{DriveRate, HwRate, HwState};
use crate::registry::SensorSlot;

fn current_matches(state: HwState, target: HwRate, target_latency: u32) -> bool {
    match (state, target) {
        (HwState::Off, HwRate::Off) => true,
        (HwState::OnDemand { latency }, HwRate::OnDemand) => latency == target_latency,
        (HwState::OnChange { latency }, HwRate::OnChange) => latency == target_latency,
        (HwState::Running { rate, latency }, HwRate::Concrete(r)) => rate == r && latency == target_latency,
        _ => false,
    }
}

fn is_running_target(target: HwRate) -> bool {
    !matches!(target, HwRate::Off)
}

fn to_drive_rate(target: HwRate) -> Option<DriveRate> {
    match target {
        HwRate::Concrete(v) => Some(DriveRate::Concrete(v)),
        HwRate::OnDemand => Some(DriveRate::OnDemand),
        HwRate::OnChange => Some(DriveRate::OnChange),
        HwRate::Off | HwRate::Impossible => None,
    }
}

/// Advances `slot` toward `(target, target_latency)` by one step. The
/// caller is responsible for having already rejected `HwRate::Impossible`
/// targets before calling this (§4.4/§4.6).
pub fn reconfig(slot: &mut SensorSlot, target: HwRate, target_latency: u32) {
    if current_matches(slot.state, target, target_latency) {
        return;
    }
    match slot.state {
        HwState::Off => {
            if slot.binding.power(true) {
                slot.state = HwState::PoweringOn;
            }
        }
        HwState::PoweringOff => {
            // still live in hardware; resume powering on rather than
            // waiting for an OFF completion that will never arrive now.
            slot.state = HwState::PoweringOn;
        }
        HwState::PoweringOn | HwState::FwUploading => {
            // a completion is already pending; it will re-trigger reconfig.
        }
        _ if is_running_target(target) => {
            if let Some(rate) = to_drive_rate(target) {
                let _ = slot.binding.set_rate(rate, target_latency);
            }
        }
        _ => {
            if slot.binding.power(false) {
                slot.state = HwState::PoweringOff;
            }
        }
    }
}

/// Outcome of a firmware-upload completion, telling the caller whether it
/// must recompute the aggregate target and call [`reconfig`] again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FwOutcome {
    /// Firmware is up; caller must recompute the target and call `reconfig`.
    NeedsReconfig,
    /// Upload failed, or a release arrived mid-upload; power-off already
    /// requested.
    PowerOffCommanded,
    /// Event ignored (wrong state for this completion to make sense).
    Ignored,
}

pub fn on_power_state_changed(slot: &mut SensorSlot, now_on: bool) {
    match (slot.state, now_on) {
        (HwState::PoweringOn, true) => {
            slot.state = HwState::FwUploading;
            let _ = slot.binding.firmware_upload();
        }
        (HwState::PoweringOff, false) => {
            slot.state = HwState::Off;
        }
        (HwState::PoweringOn, false) => {
            // spurious power-down report mid power-up; retry.
            let _ = slot.binding.power(true);
        }
        (HwState::PoweringOff, true) => {
            // spurious power-up report mid power-down; retry.
            let _ = slot.binding.power(false);
        }
        (other, now_on) => {
            debug!("power-state-changed(on={now_on}) ignored in state {other:?}");
        }
    }
}

pub fn on_firmware_state_changed(slot: &mut SensorSlot, final_rate: u32, final_latency: u32) -> FwOutcome {
    if final_rate == 0 {
        slot.state = HwState::PoweringOff;
        let _ = slot.binding.power(false);
        return FwOutcome::PowerOffCommanded;
    }
    match slot.state {
        HwState::FwUploading => {
            slot.state = HwState::Running { rate: final_rate, latency: final_latency };
            FwOutcome::NeedsReconfig
        }
        HwState::PoweringOff => {
            let _ = slot.binding.power(false);
            FwOutcome::PowerOffCommanded
        }
        other => {
            debug!("firmware-state-changed ignored in state {other:?}");
            FwOutcome::Ignored
        }
    }
}

/// Only applies while the sensor is in a concrete running state (§9: the
/// original lets a late RATE_CHG stomp a state that has since moved on to
/// POWERING-OFF or back to OFF; this resolves that race by dropping the
/// event instead of replicating the bug).
pub fn on_rate_changed(slot: &mut SensorSlot, new_rate: DriveRate, new_latency: u32) {
    if slot.state.is_concrete_running() {
        slot.state = HwState::install(new_rate, new_latency);
    } else {
        warn!("rate-changed ignored: sensor not in a running state ({:?})", slot.state);
    }
}
