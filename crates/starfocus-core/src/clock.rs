//! Virtual-time task queue with cancellable handles.
//!
//! All deferred work (timer ticks, ambient firings, cursor catch-up) is an
//! entry in a [`TaskQueue`]. The queue owns no clock: the host feeds it
//! milliseconds through [`TaskQueue::pop_due`], so tests step through time
//! deterministically and a terminal host maps wall-clock time onto it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Identifies one scheduled entry. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
pub struct TaskQueue<T> {
    now_ms: u64,
    next_id: u64,
    /// Ordered by (due time, insertion id) so equal deadlines fire FIFO.
    pending: BTreeMap<(u64, u64), T>,
    due_by_id: HashMap<u64, u64>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            pending: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule_after(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.pending.insert((due, id), task);
        self.due_by_id.insert(id, due);
        TaskHandle(id)
    }

    /// Remove a pending entry. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.due_by_id.remove(&handle.0) {
            Some(due) => self.pending.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.due_by_id.contains_key(&handle.0)
    }

    /// Deadline of the earliest pending entry.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest entry due at or before `until_ms`.
    ///
    /// Virtual time jumps to the popped entry's deadline, so work scheduled
    /// while handling it is relative to when it was due. Once nothing else is
    /// due, time settles at `until_ms` and `None` is returned. Time never
    /// moves backwards.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TaskHandle, T)> {
        let key = match self.pending.keys().next() {
            Some(&(due, id)) if due <= until_ms => (due, id),
            _ => {
                self.now_ms = self.now_ms.max(until_ms);
                return None;
            }
        };
        let task = self.pending.remove(&key)?;
        self.due_by_id.remove(&key.1);
        self.now_ms = self.now_ms.max(key.0);
        Some((TaskHandle(key.1), task))
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
