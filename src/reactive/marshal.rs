//! Hand-off from reactive code to the interactive context.
//!
//! Effects run inside the value-propagation pass and must not mutate rendered
//! state. They send tasks through a [`UiSender`]; the interactive context owns
//! the matching [`UiQueue`] and drains it once per frame.
//!
//! Deferred tasks are one-shot timers. They are never cancelled or coalesced,
//! and timers with the same due time fire in the order they were issued.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

enum Dispatch<T> {
    Now(T),
    After(Duration, T),
}

// ---------------------------------------------------------------------------
// UiSender
// ---------------------------------------------------------------------------

/// Sending half handed to effects and reactions.
pub struct UiSender<T> {
    tx: UnboundedSender<Dispatch<T>>,
}

impl<T> Clone for UiSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> fmt::Debug for UiSender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiSender")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<T> UiSender<T> {
    /// Run `task` on the next drain.
    pub fn send(&self, task: T) {
        if self.tx.send(Dispatch::Now(task)).is_err() {
            tracing::trace!("interactive context closed; task dropped");
        }
    }

    /// Run `task` once `delay` has elapsed, measured from the drain that
    /// picks it up.
    pub fn send_after(&self, delay: Duration, task: T) {
        if self.tx.send(Dispatch::After(delay, task)).is_err() {
            tracing::trace!("interactive context closed; deferred task dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

struct Timer<T> {
    due: Instant,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Timer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Timer<T> {}

impl<T> PartialOrd for Timer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Timer<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

// ---------------------------------------------------------------------------
// UiQueue
// ---------------------------------------------------------------------------

/// Receiving half, owned by the interactive context.
pub struct UiQueue<T> {
    tx: UnboundedSender<Dispatch<T>>,
    rx: UnboundedReceiver<Dispatch<T>>,
    timers: BinaryHeap<Reverse<Timer<T>>>,
    next_seq: u64,
}

impl<T> UiQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            timers: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// A sender that feeds this queue.
    pub fn sender(&self) -> UiSender<T> {
        UiSender {
            tx: self.tx.clone(),
        }
    }

    /// Collect every task that is ready at `now`.
    ///
    /// Immediate tasks come first in send order, followed by due timers in
    /// `(due, issue order)` order. Newly received deferred tasks are armed
    /// relative to `now`.
    pub fn drain(&mut self, now: Instant) -> Vec<T> {
        let mut ready = Vec::new();

        while let Ok(dispatch) = self.rx.try_recv() {
            match dispatch {
                Dispatch::Now(task) => ready.push(task),
                Dispatch::After(delay, task) => {
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    self.timers.push(Reverse(Timer {
                        due: now + delay,
                        seq,
                        task,
                    }));
                }
            }
        }

        while self.timers.peek().is_some_and(|Reverse(t)| t.due <= now) {
            if let Some(Reverse(timer)) = self.timers.pop() {
                ready.push(timer.task);
            }
        }

        ready
    }

    /// Due time of the earliest armed timer.
    pub fn next_due(&self) -> Option<Instant> {
        self.timers.peek().map(|Reverse(t)| t.due)
    }

    /// Number of armed timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Wait until the earliest armed timer is due. Pends forever when no
    /// timer is armed.
    pub async fn wait_due(&self) {
        match self.next_due() {
            Some(due) => tokio::time::sleep_until(due).await,
            None => std::future::pending::<()>().await,
        }
    }
}

impl<T> Default for UiQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for UiQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiQueue")
            .field("pending_timers", &self.timers.len())
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn immediate_tasks_drain_in_order() {
        let mut queue = UiQueue::new();
        let tx = queue.sender();
        tx.send(1);
        tx.send(2);
        tx.clone().send(3);
        assert_eq!(queue.drain(Instant::now()), vec![1, 2, 3]);
        assert!(queue.drain(Instant::now()).is_empty());
    }

    #[test]
    fn deferred_task_waits_for_delay() {
        let mut queue = UiQueue::new();
        let t0 = Instant::now();
        queue.sender().send_after(Duration::from_millis(50), "scroll");

        assert!(queue.drain(t0).is_empty());
        assert_eq!(queue.pending_timers(), 1);
        assert_eq!(queue.next_due(), Some(t0 + Duration::from_millis(50)));

        assert!(queue.drain(t0 + Duration::from_millis(49)).is_empty());
        assert_eq!(queue.drain(t0 + Duration::from_millis(50)), vec!["scroll"]);
        assert_eq!(queue.pending_timers(), 0);
    }

    #[test]
    fn timers_fire_by_due_then_issue_order() {
        let mut queue = UiQueue::new();
        let tx = queue.sender();
        let t0 = Instant::now();
        tx.send_after(Duration::from_millis(50), "first");
        tx.send_after(Duration::from_millis(50), "second");
        assert!(queue.drain(t0).is_empty());

        tx.send_after(Duration::from_millis(10), "third");
        assert!(queue.drain(t0 + Duration::from_millis(20)).is_empty());

        let fired = queue.drain(t0 + Duration::from_millis(60));
        assert_eq!(fired, vec!["third", "first", "second"]);
    }

    #[test]
    fn immediate_before_due_timers() {
        let mut queue = UiQueue::new();
        let tx = queue.sender();
        let t0 = Instant::now();
        tx.send_after(Duration::ZERO, "timer");
        tx.send("now");
        assert_eq!(queue.drain(t0), vec!["now", "timer"]);
    }

    #[test]
    fn wait_due_resolves_after_delay() {
        let mut queue = UiQueue::new();
        queue.sender().send_after(Duration::from_millis(5), 7);
        assert!(queue.drain(Instant::now()).is_empty());

        tokio_test::block_on(queue.wait_due());
        assert_eq!(queue.drain(Instant::now()), vec![7]);
    }
}
