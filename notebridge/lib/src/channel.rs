//! Ordered single-consumer event channel fed from source callbacks.
//!
//! Pushing never blocks: the producing side runs inside device callbacks.
//! An unbounded channel never loses an event while the consumer is alive.
//! A bounded channel drops the newest event on overflow and counts it.
//! A bound is never zero.

use crossbeam::channel::{Receiver, Sender, TrySendError};
use std::{
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    #[default]
    Unbounded,
    Bounded(NonZeroUsize),
}

impl Capacity {
    /// A bounded capacity, or `None` for a zero bound.
    pub fn bounded(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(Self::Bounded)
    }
}

impl From<Option<NonZeroUsize>> for Capacity {
    fn from(capacity: Option<NonZeroUsize>) -> Self {
        capacity.map_or(Self::Unbounded, Self::Bounded)
    }
}

#[derive(Debug, Default)]
pub struct ChannelStats {
    pushed: AtomicU64,
    dropped: AtomicU64,
}

impl ChannelStats {
    /// Events accepted into the channel.
    pub fn pushed(&self) -> u64 {
        self.pushed.load(Ordering::Relaxed)
    }

    /// Events lost because a bounded channel was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

pub struct Producer<T> {
    sender: Sender<T>,
    stats: Arc<ChannelStats>,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            stats: self.stats.clone(),
        }
    }
}

impl<T> Producer<T> {
    /// Enqueue without blocking. Returns whether the event was accepted.
    pub fn push(&self, event: T) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => {
                self.stats.pushed.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(_)) => {
                let dropped = self.stats.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                log::warn!("event channel full, dropping event ({dropped} dropped so far)");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn stats(&self) -> Arc<ChannelStats> {
        self.stats.clone()
    }
}

pub fn open<T>(capacity: Capacity) -> (Producer<T>, Receiver<T>) {
    let (sender, receiver) = match capacity {
        Capacity::Unbounded => crossbeam::channel::unbounded(),
        Capacity::Bounded(size) => crossbeam::channel::bounded(size.get()),
    };

    let producer = Producer {
        sender,
        stats: Arc::default(),
    };

    (producer, receiver)
}
