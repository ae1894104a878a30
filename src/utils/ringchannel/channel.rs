use ringbuffer::{AllocRingBuffer, RingBuffer};
use thiserror::Error;

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::utils::capacity::Capacity;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    #[error("The channel was closed (no sender)")]
    Closed,

    #[error("No data available in channel")]
    Empty,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // Ring contents are plain clones, a panic while holding the lock cannot
    // leave them half-written.
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug)]
pub struct Channel<T> {
    inner: Mutex<ChannelInner<T>>,
}

#[derive(Debug)]
struct ChannelInner<T> {
    receivers: Vec<(usize, Arc<ReceiverShared<T>>)>,
    counter: usize,
    is_closed: bool,
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(ChannelInner {
                receivers: vec![],
                counter: 0usize,
                is_closed: false,
            }),
        }
    }
}

impl<T: Clone> Channel<T> {
    fn write(&self, data: T) {
        let inner = lock(&self.inner);

        for (_, receiver) in inner.receivers.iter() {
            receiver.write(data.clone());
        }
    }
}

impl<T> Channel<T> {
    pub fn add_receiver(capacity: Capacity, this: &Arc<Channel<T>>) -> Receiver<T> {
        let mut inner = lock(&this.inner);

        let index = inner.counter;
        inner.counter += 1;

        let shared = Arc::new(ReceiverShared::<T>::new(capacity, inner.is_closed));
        inner.receivers.push((index, shared.clone()));

        Receiver {
            shared,
            channel_index: index,
            capacity,
            channel: this.clone(),
        }
    }

    fn remove_receiver(&self, index: usize) {
        lock(&self.inner).receivers.retain(|(i, _)| *i != index);
    }

    fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.is_closed = true;

        for (_, recv) in inner.receivers.iter() {
            lock(&recv.inner).closed = true;
            recv.cv.notify_all();
        }
    }

    pub fn num_receivers(&self) -> usize {
        lock(&self.inner).receivers.len()
    }
}

#[derive(Debug)]
struct ReceiverShared<T> {
    inner: Mutex<ReceiverInner<T>>,
    cv: Condvar,
}

#[derive(Debug)]
struct ReceiverInner<T> {
    buf: AllocRingBuffer<T>,
    closed: bool,
}

impl<T> ReceiverShared<T> {
    fn new(capacity: Capacity, closed: bool) -> Self {
        Self {
            inner: Mutex::new(ReceiverInner {
                buf: AllocRingBuffer::new(capacity.get()),
                closed,
            }),
            cv: Condvar::default(),
        }
    }

    fn write(&self, data: T) {
        lock(&self.inner).buf.push(data);
        self.cv.notify_one();
    }
}

#[derive(Debug)]
pub struct Receiver<T> {
    shared: Arc<ReceiverShared<T>>,
    channel_index: usize,
    capacity: Capacity,
    channel: Arc<Channel<T>>,
}

impl<T> Receiver<T> {
    /// Blocks until an item is available or the sender is dropped.
    pub fn recv(&self) -> Result<T, ChannelError> {
        let inner = lock(&self.shared.inner);

        let mut inner = self
            .shared
            .cv
            .wait_while(inner, |inner| inner.buf.is_empty() && !inner.closed)
            .unwrap_or_else(|e| e.into_inner());

        inner.buf.dequeue().ok_or(ChannelError::Closed)
    }

    pub fn try_recv(&self) -> Result<T, ChannelError> {
        let mut inner = lock(&self.shared.inner);

        match inner.buf.dequeue() {
            Some(v) => Ok(v),
            None if inner.closed => Err(ChannelError::Closed),
            None => Err(ChannelError::Empty),
        }
    }

    /// Takes everything currently buffered without blocking.
    pub fn drain(&self) -> Vec<T> {
        let mut inner = lock(&self.shared.inner);
        let mut out = Vec::with_capacity(inner.buf.len());

        while let Some(v) = inner.buf.dequeue() {
            out.push(v);
        }
        out
    }

    pub fn len(&self) -> usize {
        lock(&self.shared.inner).buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clone_with_capacity(&self, capacity: Capacity) -> Self {
        Channel::<T>::add_receiver(capacity, &self.channel)
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        self.clone_with_capacity(self.capacity)
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.channel.remove_receiver(self.channel_index);
    }
}

#[derive(Debug)]
pub struct Sender<T> {
    channel: Arc<Channel<T>>,
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        self.channel.close();
    }
}

impl<T: Clone> Sender<T> {
    pub fn send(&self, val: T) {
        self.channel.write(val);
    }
}

impl<T> Sender<T> {
    pub fn subscribe(&self, capacity: Capacity) -> Receiver<T> {
        Channel::<T>::add_receiver(capacity, &self.channel)
    }

    pub fn num_receivers(&self) -> usize {
        self.channel.num_receivers()
    }
}

/// Creates a sender with no receivers attached yet.
pub fn broadcast<T>() -> Sender<T> {
    Sender {
        channel: Arc::new(Channel::<T>::default()),
    }
}

pub fn channel<T>(capacity: Capacity) -> (Sender<T>, Receiver<T>) {
    let sender = broadcast::<T>();
    let receiver = sender.subscribe(capacity);

    (sender, receiver)
}
