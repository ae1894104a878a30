//! Broadcast channel where each receiver owns a bounded ring buffer: a slow
//! receiver loses its oldest items instead of blocking the sender.
mod channel;

pub use channel::*;
