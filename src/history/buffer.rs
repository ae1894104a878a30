use std::{fmt, str::FromStr};

use ringbuffer::{AllocRingBuffer, RingBuffer};
use thiserror::Error;

use crate::utils::capacity::Capacity;

/// What happens to a full history when a new value arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Truncation {
    /// Only the first `capacity` values since the last clear are kept:
    /// once full, newly appended values are dropped.
    #[default]
    KeepOldest,
    /// Sliding window over the most recent `capacity` values.
    KeepNewest,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("Unknown truncation policy '{0}' (expected 'keep_oldest' or 'keep_newest')")]
pub struct TruncationError(String);

impl FromStr for Truncation {
    type Err = TruncationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep_oldest" => Ok(Truncation::KeepOldest),
            "keep_newest" => Ok(Truncation::KeepNewest),
            other => Err(TruncationError(other.to_string())),
        }
    }
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truncation::KeepOldest => write!(f, "keep_oldest"),
            Truncation::KeepNewest => write!(f, "keep_newest"),
        }
    }
}

#[derive(Debug, Clone)]
enum BufType<T> {
    Oldest(Vec<T>),
    Newest(AllocRingBuffer<T>),
}

/// Insertion-ordered sequence holding at most `capacity` values.
#[derive(Debug, Clone)]
pub struct RollingHistory<T> {
    buf: BufType<T>,
    capacity: Capacity,
}

impl<T> RollingHistory<T> {
    pub fn new(capacity: Capacity, truncation: Truncation) -> Self {
        let buf = match truncation {
            Truncation::KeepOldest => BufType::Oldest(Vec::with_capacity(capacity.get())),
            Truncation::KeepNewest => BufType::Newest(AllocRingBuffer::new(capacity.get())),
        };

        Self { buf, capacity }
    }

    pub fn append(&mut self, value: T) {
        match &mut self.buf {
            BufType::Oldest(v) => {
                v.push(value);
                v.truncate(self.capacity.get());
            }
            BufType::Newest(b) => b.push(value),
        }
    }

    pub fn clear(&mut self) {
        match &mut self.buf {
            BufType::Oldest(v) => v.clear(),
            BufType::Newest(b) => b.clear(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.buf {
            BufType::Oldest(v) => v.len(),
            BufType::Newest(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity.get()
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn truncation(&self) -> Truncation {
        match &self.buf {
            BufType::Oldest(_) => Truncation::KeepOldest,
            BufType::Newest(_) => Truncation::KeepNewest,
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match &self.buf {
            BufType::Oldest(v) => Box::new(v.iter()),
            BufType::Newest(b) => Box::new(b.iter()),
        }
    }

    pub fn last(&self) -> Option<&T> {
        match &self.buf {
            BufType::Oldest(v) => v.last(),
            BufType::Newest(b) => b.back(),
        }
    }
}

impl<T: Clone> RollingHistory<T> {
    /// Values from oldest to newest.
    pub fn values(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}
