//! In-process publish/subscribe channel between the services and the shell.
//!
//! Publishing only queues; nothing runs until [`SignalBus::flush`] is called,
//! so a service can publish while it is itself mutably borrowed.

use crate::device::DeviceCapabilities;
use crate::eggs::EggId;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    DeviceCapabilitiesChanged(DeviceCapabilities),
    EasterEggTriggered { id: EggId },
    ConsoleCommand(String),
    ZoneEntered(String),
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::DeviceCapabilitiesChanged(_) => "device-capabilities-changed",
            Signal::EasterEggTriggered { .. } => "easter-egg-triggered",
            Signal::ConsoleCommand(_) => "console-command",
            Signal::ZoneEntered(_) => "zone-entered",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Signal)>;

#[derive(Default)]
pub struct SignalBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    queue: VecDeque<Signal>,
    next_id: u64,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Signal) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, signal: Signal) {
        log::debug!("[bus] queued {}", signal.name());
        self.queue.push_back(signal);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver queued signals in publish order; each one reaches every
    /// listener in registration order. Returns the number delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(signal) = self.queue.pop_front() {
            for (_, listener) in self.listeners.iter_mut() {
                listener(&signal);
            }
            delivered += 1;
        }
        delivered
    }
}
