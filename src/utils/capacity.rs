use std::num::NonZero;

use crate::history::HistoryError;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Number of elements a rolling history is allowed to retain. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capacity(NonZero<usize>);

impl Capacity {
    pub fn new(value: usize) -> Result<Self, HistoryError> {
        NonZero::new(value)
            .map(Capacity)
            .ok_or(HistoryError::InvalidHistoryCapacity)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity(NonZero::<usize>::MIN.saturating_add(DEFAULT_HISTORY_CAPACITY - 1))
    }
}

impl TryFrom<usize> for Capacity {
    type Error = HistoryError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Capacity::new(value)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = HistoryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = usize::try_from(value).map_err(|_| HistoryError::InvalidHistoryCapacity)?;
        Capacity::new(value)
    }
}

impl From<NonZero<usize>> for Capacity {
    fn from(value: NonZero<usize>) -> Self {
        Capacity(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(Capacity::default().get(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(Capacity::new(0), Err(HistoryError::InvalidHistoryCapacity));
        assert_eq!(
            Capacity::try_from(-3i64),
            Err(HistoryError::InvalidHistoryCapacity)
        );
        assert_eq!(Capacity::try_from(7usize).map(|c| c.get()), Ok(7));
    }
}
