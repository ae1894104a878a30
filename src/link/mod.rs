//! Message bus the baseline records arrive on. The real transport is an
//! external collaborator; [`LoopbackLink`] is an in-memory stand-in used by
//! the replay tool and tests.
use bytes::Bytes;
use thiserror::Error;

pub mod loopback;

pub use loopback::{LinkInjector, LoopbackLink};

/// Message id of the baseline NED record.
pub const MSG_BASELINE: u16 = 0x0202;

/// Command asking the receiver to reset its carrier phase ambiguities.
pub const MSG_INIT_AMBIGUITIES: u16 = 0x99;

pub type MessageHandler = Box<dyn FnMut(&[u8]) + Send>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("The link was closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub msg_id: u16,
    pub payload: Bytes,
}

pub trait MessageLink {
    /// Registers `handler` to be invoked with the raw payload of every
    /// inbound message with id `msg_id`.
    fn add_callback(&mut self, msg_id: u16, handler: MessageHandler);

    fn send_message(&self, msg_id: u16, payload: &[u8]) -> Result<(), LinkError>;
}
