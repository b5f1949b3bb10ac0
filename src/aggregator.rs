//! The aggregator (§4.4): pure functions collapsing every live request for
//! a sensor into one hardware rate and one hardware latency. No side
//! effects, no locking — callers decide what to do with the result.

use crate::rate::{HwRate, RequestRate};

fn fold_one(r: RequestRate, have_users: &mut bool, have_on_change: &mut bool, highest: &mut u32) {
    *have_users = true;
    match r {
        RequestRate::OnDemand => {}
        RequestRate::OnChange => *have_on_change = true,
        RequestRate::Concrete(v) => *highest = (*highest).max(v),
    }
}

/// Collapses `live` (optionally plus a hypothetical `extra` request, minus
/// one `removed` request) into a target hardware rate, given the sensor's
/// ascending list of supported rates.
///
/// `extra`/`removed` let a caller test a request/release before committing
/// it to the request table: the candidate set is `live - removed + extra`.
pub fn calc_hw_rate(
    live: impl IntoIterator<Item = RequestRate>,
    supported_rates: &[u32],
    extra: Option<RequestRate>,
    removed: Option<RequestRate>,
) -> HwRate {
    let mut have_users = false;
    let mut have_on_change = false;
    let mut highest: u32 = 0;
    let mut removed_pending = removed;

    for r in live {
        if let Some(target) = removed_pending {
            if r == target {
                removed_pending = None;
                continue;
            }
        }
        fold_one(r, &mut have_users, &mut have_on_change, &mut highest);
    }
    if let Some(e) = extra {
        fold_one(e, &mut have_users, &mut have_on_change, &mut highest);
    }

    if highest == 0 {
        if !have_users {
            HwRate::Off
        } else if have_on_change {
            HwRate::OnChange
        } else {
            HwRate::OnDemand
        }
    } else {
        match supported_rates.iter().copied().find(|&v| v >= highest) {
            Some(v) => HwRate::Concrete(v),
            None => HwRate::Impossible,
        }
    }
}

/// The hardware latency is the tightest (smallest) batching latency any
/// live client asked for; `INVALID_LATENCY` if nobody cares.
pub fn calc_hw_latency(live: impl IntoIterator<Item = u32>) -> u32 {
    live.into_iter().min().unwrap_or(crate::rate::INVALID_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::INVALID_LATENCY;

    const RATES: &[u32] = &[5, 10, 25, 50, 100];

    #[test]
    fn no_requests_is_off() {
        assert_eq!(calc_hw_rate([], RATES, None, None), HwRate::Off);
    }

    #[test]
    fn picks_smallest_rate_covering_the_highest_request() {
        let live = [RequestRate::Concrete(12), RequestRate::Concrete(25)];
        assert_eq!(calc_hw_rate(live, RATES, None, None), HwRate::Concrete(25));
    }

    #[test]
    fn impossible_when_no_rate_covers_demand() {
        let live = [RequestRate::Concrete(999)];
        assert_eq!(calc_hw_rate(live, RATES, None, None), HwRate::Impossible);
    }

    #[test]
    fn on_demand_only_yields_on_demand() {
        let live = [RequestRate::OnDemand];
        assert_eq!(calc_hw_rate(live, RATES, None, None), HwRate::OnDemand);
    }

    #[test]
    fn on_change_dominates_on_demand_when_both_present() {
        let live = [RequestRate::OnDemand, RequestRate::OnChange];
        assert_eq!(calc_hw_rate(live, RATES, None, None), HwRate::OnChange);
    }

    #[test]
    fn concrete_dominates_pseudo_rates() {
        let live = [RequestRate::OnDemand, RequestRate::Concrete(10)];
        assert_eq!(calc_hw_rate(live, RATES, None, None), HwRate::Concrete(10));
    }

    #[test]
    fn extra_models_a_hypothetical_request() {
        let live = [RequestRate::Concrete(10)];
        let target = calc_hw_rate(live, RATES, Some(RequestRate::Concrete(40)), None);
        assert_eq!(target, HwRate::Concrete(50));
    }

    #[test]
    fn removed_excludes_one_matching_entry() {
        let live = [RequestRate::Concrete(10), RequestRate::Concrete(40)];
        let target = calc_hw_rate(live, RATES, None, Some(RequestRate::Concrete(40)));
        assert_eq!(target, HwRate::Concrete(10));
    }

    #[test]
    fn removed_only_drops_one_matching_duplicate() {
        let live = [RequestRate::Concrete(40), RequestRate::Concrete(40)];
        let target = calc_hw_rate(live, RATES, None, Some(RequestRate::Concrete(40)));
        assert_eq!(target, HwRate::Concrete(50));
    }

    #[test]
    fn latency_is_the_tightest_request() {
        assert_eq!(calc_hw_latency([20, 5, 50]), 5);
    }

    #[test]
    fn latency_is_invalid_with_no_requests() {
        assert_eq!(calc_hw_latency([]), INVALID_LATENCY);
    }
}
