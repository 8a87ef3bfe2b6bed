use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::model::SearchResult;

/// A claim on one UI slot's pending search. Tickets are compared against
/// the registry at delivery time; an in-flight call that lost its slot
/// still runs to completion (and populates the cache) but its result is
/// withheld from the stale consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTicket {
    slot: String,
    seq: u64,
}

impl SlotTicket {
    pub fn slot(&self) -> &str {
        &self.slot
    }
}

/// Tracks the newest request per slot. Beginning a request supersedes any
/// earlier ticket for the same slot; there is no hard cancellation of the
/// underlying calls.
pub struct SlotRegistry {
    current: Mutex<HashMap<String, u64>>,
    counter: AtomicU64,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(HashMap::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// Registers a new request for `slot` and returns its ticket,
    /// superseding any previous ticket for the same slot.
    pub fn begin(&self, slot: &str) -> SlotTicket {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        if let Ok(mut current) = self.current.lock() {
            current.insert(slot.to_string(), seq);
        }
        SlotTicket {
            slot: slot.to_string(),
            seq,
        }
    }

    /// Whether a ticket still owns its slot.
    pub fn is_current(&self, ticket: &SlotTicket) -> bool {
        match self.current.lock() {
            Ok(current) => current.get(&ticket.slot) == Some(&ticket.seq),
            Err(_) => false,
        }
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a slot-scoped search: the result, or a marker that a newer
/// request took the slot while this one was in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotDelivery {
    Delivered(SearchResult),
    Superseded,
}
