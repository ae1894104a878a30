use std::sync::{Arc, Mutex, MutexGuard};

use log::warn;

use crate::{
    history::PlotSeries,
    link::MessageLink,
    utils::{
        capacity::Capacity,
        ringchannel::{Receiver, Sender, broadcast},
    },
};

use super::{DerivedView, IngestError, RunState, SampleIngestor};

/// Receives every view produced after it subscribed. Holds at most its
/// capacity; older views are dropped when it falls behind.
#[derive(Debug)]
pub struct ViewSubscriber {
    receiver: Receiver<DerivedView>,
}

impl ViewSubscriber {
    pub fn recv(&self) -> Result<DerivedView, IngestError> {
        Ok(self.receiver.recv()?)
    }

    pub fn try_recv(&self) -> Result<DerivedView, IngestError> {
        Ok(self.receiver.try_recv()?)
    }

    pub fn drain(&self) -> Vec<DerivedView> {
        self.receiver.drain()
    }
}

#[derive(Debug)]
struct SharedInner {
    ingestor: SampleIngestor,
    views: Sender<DerivedView>,
}

/// Clonable handle serializing every access to one [`SampleIngestor`].
#[derive(Debug, Clone)]
pub struct SharedIngestor {
    inner: Arc<Mutex<SharedInner>>,
}

impl SharedIngestor {
    pub fn new(ingestor: SampleIngestor) -> Self {
        SharedIngestor {
            inner: Arc::new(Mutex::new(SharedInner {
                ingestor,
                views: broadcast(),
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SharedInner>, IngestError> {
        self.inner.lock().map_err(|_| IngestError::Poisoned)
    }

    /// Processes one record and publishes the resulting view to subscribers.
    pub fn on_message(&self, data: &[u8]) -> Result<Option<DerivedView>, IngestError> {
        let mut inner = self.lock()?;

        let view = inner.ingestor.on_message(data)?;
        if let Some(view) = view {
            inner.views.send(view);
        }

        Ok(view)
    }

    pub fn subscribe(&self, capacity: Capacity) -> Result<ViewSubscriber, IngestError> {
        Ok(ViewSubscriber {
            receiver: self.lock()?.views.subscribe(capacity),
        })
    }

    /// Routes messages with id `msg_id` arriving on `link` into this
    /// ingestor. Rejected records are logged.
    pub fn attach<L: MessageLink + ?Sized>(&self, link: &mut L, msg_id: u16) {
        let shared = self.clone();

        link.add_callback(
            msg_id,
            Box::new(move |data: &[u8]| {
                if let Err(e) = shared.on_message(data) {
                    warn!("Baseline message dropped: {e} ({e:?})");
                }
            }),
        );
    }

    pub fn pause(&self) -> Result<(), IngestError> {
        self.lock()?.ingestor.pause();
        Ok(())
    }

    pub fn resume(&self) -> Result<(), IngestError> {
        self.lock()?.ingestor.resume();
        Ok(())
    }

    pub fn toggle_pause(&self) -> Result<RunState, IngestError> {
        Ok(self.lock()?.ingestor.toggle_pause())
    }

    pub fn clear(&self) -> Result<(), IngestError> {
        self.lock()?.ingestor.clear();
        Ok(())
    }

    pub fn set_centering(&self, centered: bool) -> Result<(), IngestError> {
        self.lock()?.ingestor.set_centering(centered);
        Ok(())
    }

    pub fn init_ambiguities<L: MessageLink + ?Sized>(&self, link: &L) -> Result<(), IngestError> {
        self.lock()?.ingestor.init_ambiguities(link)
    }

    pub fn view(&self) -> Result<Option<DerivedView>, IngestError> {
        Ok(self.lock()?.ingestor.view().copied())
    }

    pub fn series(&self) -> Result<PlotSeries, IngestError> {
        Ok(self.lock()?.ingestor.series())
    }

    /// Runs `f` with exclusive access to the ingestor.
    pub fn with<R>(&self, f: impl FnOnce(&mut SampleIngestor) -> R) -> Result<R, IngestError> {
        Ok(f(&mut self.lock()?.ingestor))
    }
}
