//! Driver bindings (§4.2): a sensor is wired either straight to a driver's
//! vtable, or to an applet task reached only through private event
//! delivery. Grounded in the driver-trait split of an embedded driver crate
//! (validated construction, trait-object dispatch standing in for real
//! hardware access) adapted to this core's two dispatch shapes.

use std::sync::Arc;

use crate::rate::DriveRate;

/// Direct driver vtable (§4.2, first binding kind).
pub trait DriverOps: Send + Sync {
    fn power(&self, on: bool) -> bool;
    fn firmware_upload(&self) -> bool;
    fn set_rate(&self, rate: DriveRate, latency: u32) -> bool;
    fn flush(&self) -> bool;
    fn trigger_on_demand(&self) -> bool;
}

/// One private-event payload an applet task can be asked to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppletEvent {
    Power(bool),
    FwUpload,
    SetRate { rate: DriveRate, latency: u32 },
    Flush,
    Trigger,
}

/// Private event delivery to an applet task (§4.2, second binding kind).
pub trait PrivateEventSink: Send + Sync {
    fn enqueue_private(&self, task_id: u32, event: AppletEvent) -> bool;
}

/// How a registered sensor reaches its driver.
pub enum DriverBinding {
    Direct(Arc<dyn DriverOps>),
    Applet { task_id: u32, sink: Arc<dyn PrivateEventSink> },
}

impl DriverBinding {
    pub fn power(&self, on: bool) -> bool {
        match self {
            DriverBinding::Direct(ops) => ops.power(on),
            DriverBinding::Applet { task_id, sink } => sink.enqueue_private(*task_id, AppletEvent::Power(on)),
        }
    }

    pub fn firmware_upload(&self) -> bool {
        match self {
            DriverBinding::Direct(ops) => ops.firmware_upload(),
            DriverBinding::Applet { task_id, sink } => sink.enqueue_private(*task_id, AppletEvent::FwUpload),
        }
    }

    pub fn set_rate(&self, rate: DriveRate, latency: u32) -> bool {
        match self {
            DriverBinding::Direct(ops) => ops.set_rate(rate, latency),
            DriverBinding::Applet { task_id, sink } => {
                sink.enqueue_private(*task_id, AppletEvent::SetRate { rate, latency })
            }
        }
    }

    pub fn flush(&self) -> bool {
        match self {
            DriverBinding::Direct(ops) => ops.flush(),
            DriverBinding::Applet { task_id, sink } => sink.enqueue_private(*task_id, AppletEvent::Flush),
        }
    }

    pub fn trigger_on_demand(&self) -> bool {
        match self {
            DriverBinding::Direct(ops) => ops.trigger_on_demand(),
            DriverBinding::Applet { task_id, sink } => sink.enqueue_private(*task_id, AppletEvent::Trigger),
        }
    }
}
