//! The deferred-callback collaborator (§4.7/§6): a driver completion
//! dispatches onto this queue instead of mutating core state from whatever
//! context it runs in, and the core drains it from its own cooperative
//! context. Built on the same bounded `ArrayQueue` the teacher used for its
//! lock-free log pipeline.

use crossbeam_queue::ArrayQueue;

/// Schedules callbacks to run later against `&mut S`, on the core's own
/// context. `FifoScheduler` is the default; swap in another implementation
/// to hand completions to a host scheduler instead.
pub trait DeferredScheduler<S>: Send + Sync {
    fn defer(&self, callback: Box<dyn FnOnce(&mut S) + Send>) -> bool;
    fn drain(&self, state: &mut S);
}

/// Bounded FIFO queue of deferred callbacks.
pub struct FifoScheduler<S> {
    queue: ArrayQueue<Box<dyn FnOnce(&mut S) + Send>>,
}

impl<S> FifoScheduler<S> {
    pub fn new(capacity: usize) -> Self {
        Self { queue: ArrayQueue::new(capacity.max(1)) }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<S> DeferredScheduler<S> for FifoScheduler<S> {
    fn defer(&self, callback: Box<dyn FnOnce(&mut S) + Send>) -> bool {
        self.queue.push(callback).is_ok()
    }

    fn drain(&self, state: &mut S) {
        while let Some(callback) = self.queue.pop() {
            callback(state);
        }
    }
}
