use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use bytes::Bytes;
use log::debug;

use super::{Frame, LinkError, MessageHandler, MessageLink};

/// Producer side of a [`LoopbackLink`]. Cheap to clone and usable from any
/// thread.
#[derive(Debug, Clone)]
pub struct LinkInjector {
    tx: flume::Sender<Frame>,
}

impl LinkInjector {
    pub fn inject(&self, msg_id: u16, payload: impl Into<Bytes>) -> Result<(), LinkError> {
        self.tx
            .send(Frame {
                msg_id,
                payload: payload.into(),
            })
            .map_err(|_| LinkError::Closed)
    }
}

/// In-memory bus. Frames queued by injectors are handed to the registered
/// callbacks on whichever thread calls [`dispatch_pending`](Self::dispatch_pending)
/// or [`run`](Self::run), one at a time and in arrival order.
pub struct LoopbackLink {
    rx: flume::Receiver<Frame>,
    handlers: HashMap<u16, Vec<MessageHandler>>,
    sent: Mutex<Vec<Frame>>,
    closed: AtomicBool,
}

impl LoopbackLink {
    pub fn new() -> (LoopbackLink, LinkInjector) {
        let (tx, rx) = flume::unbounded();

        let link = LoopbackLink {
            rx,
            handlers: HashMap::new(),
            sent: Mutex::new(vec![]),
            closed: AtomicBool::new(false),
        };

        (link, LinkInjector { tx })
    }

    fn dispatch(&mut self, frame: Frame) {
        match self.handlers.get_mut(&frame.msg_id) {
            Some(handlers) => {
                for handler in handlers.iter_mut() {
                    handler(frame.payload.as_ref());
                }
            }
            None => debug!("No handler for message 0x{:04x}, dropped", frame.msg_id),
        }
    }

    /// Dispatches every frame already queued, without blocking. Returns the
    /// number of frames taken off the queue.
    pub fn dispatch_pending(&mut self) -> usize {
        let frames: Vec<Frame> = self.rx.try_iter().collect();
        let count = frames.len();

        for frame in frames {
            self.dispatch(frame);
        }
        count
    }

    /// Dispatches frames until every injector has been dropped.
    pub fn run(&mut self) -> usize {
        let mut count = 0;

        while let Ok(frame) = self.rx.recv() {
            self.dispatch(frame);
            count += 1;
        }
        count
    }

    /// Messages sent through [`MessageLink::send_message`] so far.
    pub fn sent(&self) -> Vec<Frame> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl MessageLink for LoopbackLink {
    fn add_callback(&mut self, msg_id: u16, handler: MessageHandler) {
        self.handlers.entry(msg_id).or_default().push(handler);
    }

    fn send_message(&self, msg_id: u16, payload: &[u8]) -> Result<(), LinkError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(LinkError::Closed);
        }

        let mut sent = self.sent.lock().map_err(|_| LinkError::Closed)?;
        sent.push(Frame {
            msg_id,
            payload: Bytes::copy_from_slice(payload),
        });

        debug!("Sent message 0x{msg_id:04x} ({} bytes)", payload.len());
        Ok(())
    }
}
