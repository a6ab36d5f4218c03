//! Bounded work queue between pipeline stages.
//!
//! A thin role-typed wrapper over a bounded `crossbeam-channel`: producers hold
//! [`WorkSender`]s, consumers hold [`WorkReceiver`]s. `send` blocks while the
//! queue is full (backpressure), `recv` blocks while it is empty and open.
//! The queue closes once every sender has been closed or dropped; receivers
//! then drain what is left and observe `None`.

use crossbeam_channel::{Receiver, Sender};

/// Returns a connected sender/receiver pair holding at most `capacity` items.
/// A capacity of 0 is raised to 1 so that hand-off always buffers one item.
pub fn bounded<T>(capacity: usize) -> (WorkSender<T>, WorkReceiver<T>) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (WorkSender { inner: tx }, WorkReceiver { inner: rx })
}

/// Returned by [`WorkSender::send`] when no receiver is left; carries the item back.
#[derive(Debug, PartialEq, Eq)]
pub struct QueueClosed<T>(pub T);

/// Producer handle. Clone one per producer.
#[derive(Debug)]
pub struct WorkSender<T> {
    inner: Sender<T>,
}

impl<T> Clone for WorkSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> WorkSender<T> {
    /// Enqueue `item`, blocking while the queue is full.
    pub fn send(&self, item: T) -> Result<(), QueueClosed<T>> {
        self.inner.send(item).map_err(|e| QueueClosed(e.into_inner()))
    }

    /// Release this producer. When the last producer is released the queue is
    /// closed and consumers exit after draining it.
    pub fn close(self) {
        drop(self);
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity().unwrap_or(0)
    }
}

/// Consumer handle. Clone one per consumer; each item is delivered to exactly one.
#[derive(Debug)]
pub struct WorkReceiver<T> {
    inner: Receiver<T>,
}

impl<T> Clone for WorkReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> WorkReceiver<T> {
    /// Next item, blocking while the queue is empty and still open.
    /// `None` means closed and drained.
    pub fn recv(&self) -> Option<T> {
        self.inner.recv().ok()
    }

    /// Blocking iterator that ends once the queue is closed and drained.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || self.recv())
    }
}
