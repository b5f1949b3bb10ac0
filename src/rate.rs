//! Tagged-enum redesign of the original sentinel-overloaded rate fields
//! (§9 redesign note). `HwState` replaces a single numeric `currentRate`
//! that overloaded zero/negative values to mean OFF/ON-DEMAND/ON-CHANGE;
//! `RequestRate` and `DriveRate` do the same for, respectively, what a
//! client asks for and what gets programmed into a driver.

/// Sentinel latency meaning "not running" / "no opinion".
pub const INVALID_LATENCY: u32 = u32::MAX;

/// What a client asks for (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestRate {
    Concrete(u32),
    OnDemand,
    OnChange,
}

/// What gets programmed into a driver, or reported back by one (§4.2/§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveRate {
    Concrete(u32),
    OnDemand,
    OnChange,
}

/// The aggregator's verdict for a sensor (§4.4): a target hardware
/// configuration, or `Impossible` if no supported rate covers demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwRate {
    Off,
    OnDemand,
    OnChange,
    Concrete(u32),
    Impossible,
}

impl HwRate {
    pub fn is_impossible(self) -> bool {
        matches!(self, HwRate::Impossible)
    }
}

/// A sensor's place in the power/firmware state machine (§4.5), including
/// its currently-installed rate and latency where that's meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwState {
    Off,
    PoweringOn,
    PoweringOff,
    FwUploading,
    Running { rate: u32, latency: u32 },
    OnDemand { latency: u32 },
    OnChange { latency: u32 },
}

impl HwState {
    pub fn latency(self) -> u32 {
        match self {
            HwState::Running { latency, .. }
            | HwState::OnDemand { latency }
            | HwState::OnChange { latency } => latency,
            _ => INVALID_LATENCY,
        }
    }

    /// True for the three steady "running" variants RATE_CHG may update.
    pub fn is_concrete_running(self) -> bool {
        matches!(self, HwState::Running { .. } | HwState::OnDemand { .. } | HwState::OnChange { .. })
    }

    pub(crate) fn install(rate: DriveRate, latency: u32) -> HwState {
        match rate {
            DriveRate::Concrete(v) => HwState::Running { rate: v, latency },
            DriveRate::OnDemand => HwState::OnDemand { latency },
            DriveRate::OnChange => HwState::OnChange { latency },
        }
    }
}
