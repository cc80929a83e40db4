//! Cooperative deferred-task queue driven by simulated time.
//!
//! Tasks are plain values (usually an enum of follow-up actions) ordered by
//! fire time, with ties broken by scheduling order. The owner polls
//! [`Scheduler::pop_due`] once per tick; cancellation removes by token.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Handle returned by [`Scheduler::schedule`], used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<(u64, TaskToken)>>,
    tasks: HashMap<TaskToken, T>,
    next_token: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            tasks: HashMap::new(),
            next_token: 0,
        }
    }

    /// Queue `task` to fire at `now_ms + delay_ms`.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, task: T) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.queue
            .push(Reverse((now_ms.saturating_add(delay_ms), token)));
        self.tasks.insert(token, task);
        token
    }

    /// Cancel a pending task. Returns the task if it had not fired yet.
    pub fn cancel(&mut self, token: TaskToken) -> Option<T> {
        // Heap entry is left behind and skipped when popped.
        self.tasks.remove(&token)
    }

    /// Pop the earliest task whose fire time is `<= now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TaskToken, T)> {
        while let Some(Reverse((fire_at, token))) = self.queue.peek().copied() {
            if fire_at > now_ms {
                return None;
            }
            self.queue.pop();
            if let Some(task) = self.tasks.remove(&token) {
                return Some((token, task));
            }
        }
        None
    }

    /// Keep only the pending tasks for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| keep(task));
        before - self.tasks.len()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
