//! The error boundary (spec §7): exactly the three failure kinds the core
//! can report, each carrying enough context to log usefully.

use thiserror::Error;

/// Failure surfaced at the public API.
///
/// A `false` return in the original design is one of these three reasons;
/// expressing them as variants lets callers branch on *why* without
/// re-deriving it from side effects.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// A fixed-capacity pool (sensor table, request table, event queue) is
    /// full. The caller may retry later.
    #[error("{0} exhausted")]
    Capacity(&'static str),
    /// No such handle, or no such (client, sensor) request.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The aggregator returned `IMPOSSIBLE`: no supported rate satisfies
    /// the combined demand. The request table was not modified.
    #[error("no supported rate satisfies the combined demand")]
    Infeasible,
}
