use thiserror::Error;

pub mod buffer;
pub mod series;

pub use buffer::{RollingHistory, Truncation};
pub use series::{BaselineHistory, PlotSeries};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History capacity must be greater than zero")]
    InvalidHistoryCapacity,
}
