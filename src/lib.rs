//! sensor_hub: request-aggregating, state-machine-driven multiplexer
//! sitting between sensor clients and sensor drivers in an embedded sensor
//! hub.
//!
//! Clients request a sampling rate and maximum batching latency per
//! sensor; the hub collapses all live requests for a sensor into one
//! hardware configuration ([`aggregator`]) and drives the sensor through
//! its power/firmware-upload state machine ([`state_machine`]) to reach
//! it, consuming the driver's asynchronous completion events along the
//! way ([`events`]).
//!
//! [`SensorHub`] is the entry point.

pub mod aggregator;
pub mod api;
pub mod binding;
pub mod bitset;
pub mod config;
pub mod error;
pub mod events;
pub mod handle;
pub mod mock_driver;
pub mod rate;
pub mod registry;
pub mod request_table;
pub mod scheduler;
pub mod slab;
pub mod state_machine;

pub use api::{CoreState, SensorHub};
pub use binding::{AppletEvent, DriverBinding, DriverOps, PrivateEventSink};
pub use config::HubConfig;
pub use error::CoreError;
pub use events::{InternalEvent, InternalEventKind};
pub use rate::{DriveRate, HwRate, HwState, RequestRate, INVALID_LATENCY};
pub use registry::SensorInfo;
pub use scheduler::{DeferredScheduler, FifoScheduler};
