use thiserror::Error;

use crate::{baseline::CodecError, link::LinkError, utils::ringchannel::ChannelError};

pub mod config;
pub mod ingestor;
pub mod shared;
pub mod view;

pub use config::{ConfigError, IngestConfig};
pub use ingestor::{RunState, SampleIngestor};
pub use shared::{SharedIngestor, ViewSubscriber};
pub use view::{DerivedView, TableRow};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("Baseline message rejected")]
    Codec(#[from] CodecError),

    #[error("Could not send command")]
    Link(#[from] LinkError),

    #[error("View subscription error")]
    Subscriber(#[from] ChannelError),

    #[error("Ingestor state lock was poisoned")]
    Poisoned,
}
