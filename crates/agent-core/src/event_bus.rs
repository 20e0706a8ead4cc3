//! Event bus between the agent runtime and whoever renders its progress.
//!
//! Single-threaded: the bus is shared via `Rc` and uses `RefCell` for
//! interior mutability. Events are forwarded to every subscribed sink as
//! they are emitted. Only a bus built with [`EventBus::buffered`] also keeps
//! them, and its queue grows until drained.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use agent_types::event::AgentEvent;
use crate::ports::EventSink;

/// Shared event bus — clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    buffered: bool,
    pending: VecDeque<AgentEvent>,
    sinks: Vec<Rc<dyn EventSink>>,
}

impl EventBus {
    /// A bus that only forwards to its sinks.
    pub fn new() -> Self {
        Self::with_buffering(false)
    }

    /// A bus that also keeps every event until `drain` is called.
    pub fn buffered() -> Self {
        Self::with_buffering(true)
    }

    fn with_buffering(buffered: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                buffered,
                pending: VecDeque::new(),
                sinks: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, sink: Rc<dyn EventSink>) {
        self.inner.borrow_mut().sinks.push(sink);
    }

    /// Publish an event. Called by the agent runtime.
    pub fn emit(&self, event: AgentEvent) {
        // Sinks run outside the borrow so they may hold a clone of the bus
        let sinks = self.inner.borrow().sinks.clone();
        for sink in &sinks {
            sink.emit(&event);
        }

        let mut inner = self.inner.borrow_mut();
        if inner.buffered {
            inner.pending.push_back(event);
        }
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<AgentEvent> {
        self.inner.borrow_mut().pending.drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
