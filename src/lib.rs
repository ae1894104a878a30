//! Ingestion core for baseline (relative NED position) telemetry: decodes
//! fixed-layout records received on a message link, keeps a bounded history
//! per plotted coordinate and derives the values shown next to the plot.

pub mod baseline;
pub mod history;
pub mod ingest;
pub mod link;
pub mod parameters;
pub mod utils;
