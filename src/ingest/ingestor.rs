use log::{debug, info, trace};

use crate::{
    baseline::{self, Baseline},
    history::{BaselineHistory, HistoryError, PlotSeries, Truncation},
    link::MessageLink,
    utils::{capacity::Capacity, time::TimeConverter},
};

use super::{DerivedView, IngestConfig, IngestError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

/// Turns raw baseline records into history and table updates.
///
/// Not thread safe on its own: callers receiving messages from several
/// threads should go through [`SharedIngestor`](super::SharedIngestor).
#[derive(Debug, Clone)]
pub struct SampleIngestor {
    state: RunState,
    centered: bool,
    history: BaselineHistory,
    view: Option<DerivedView>,
    time: TimeConverter,
    init_ambiguities_msg_id: u16,
    processed: u64,
}

impl SampleIngestor {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            state: RunState::Running,
            centered: false,
            history: BaselineHistory::new(config.capacity, config.truncation),
            view: None,
            time: TimeConverter::new(config.tow_unit),
            init_ambiguities_msg_id: config.init_ambiguities_msg_id,
            processed: 0,
        }
    }

    pub fn with_capacity(capacity: usize, truncation: Truncation) -> Result<Self, HistoryError> {
        Ok(Self::new(&IngestConfig {
            capacity: Capacity::new(capacity)?,
            truncation,
            ..IngestConfig::default()
        }))
    }

    /// Handles one inbound record. Returns `Ok(None)` without looking at the
    /// bytes while paused. A malformed record leaves every series untouched.
    pub fn on_message(&mut self, data: &[u8]) -> Result<Option<DerivedView>, IngestError> {
        if self.state == RunState::Paused {
            trace!("Paused, dropping {} byte message", data.len());
            return Ok(None);
        }

        let baseline = baseline::decode(data)?;
        Ok(Some(self.ingest(baseline)))
    }

    /// Appends an already decoded sample, regardless of the run state.
    pub fn ingest(&mut self, baseline: Baseline) -> DerivedView {
        let view = DerivedView::new(baseline, &self.time);

        self.history.append(&baseline);
        self.view = Some(view);
        self.processed += 1;

        view
    }

    pub fn pause(&mut self) {
        if self.state != RunState::Paused {
            debug!("Baseline ingestion paused");
        }
        self.state = RunState::Paused;
    }

    pub fn resume(&mut self) {
        if self.state != RunState::Running {
            debug!("Baseline ingestion resumed");
        }
        self.state = RunState::Running;
    }

    pub fn toggle_pause(&mut self) -> RunState {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
        }
        self.state
    }

    /// Empties every series and the table. The run state is left as is.
    pub fn clear(&mut self) {
        self.history.clear();
        self.view = None;
        debug!("Baseline history cleared");
    }

    pub fn set_centering(&mut self, centered: bool) {
        self.centered = centered;
    }

    pub fn toggle_centering(&mut self) -> bool {
        self.centered = !self.centered;
        self.centered
    }

    pub fn init_ambiguities<L: MessageLink + ?Sized>(&self, link: &L) -> Result<(), IngestError> {
        link.send_message(self.init_ambiguities_msg_id, &[])?;
        info!("Requested ambiguity initialization");
        Ok(())
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_centered(&self) -> bool {
        self.centered
    }

    pub fn view(&self) -> Option<&DerivedView> {
        self.view.as_ref()
    }

    pub fn history(&self) -> &BaselineHistory {
        &self.history
    }

    pub fn series(&self) -> PlotSeries {
        self.history.series()
    }

    /// Number of samples accepted since construction. Not reset by
    /// [`clear`](Self::clear).
    pub fn processed(&self) -> u64 {
        self.processed
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use nalgebra::vector;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        baseline::{CodecError, RECORD_SIZE, encode},
        link::{Frame, LoopbackLink},
        utils::time::gps_reference_epoch,
    };

    fn record(n: f64, e: f64, d: f64) -> Bytes {
        encode(&Baseline {
            ned: vector![n, e, d],
            time_of_week: 0,
            week_number: 0,
            flags: 1,
            num_satellites: 6,
        })
    }

    fn ingestor(capacity: usize, truncation: Truncation) -> SampleIngestor {
        SampleIngestor::with_capacity(capacity, truncation).unwrap()
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(matches!(
            SampleIngestor::with_capacity(0, Truncation::KeepOldest),
            Err(HistoryError::InvalidHistoryCapacity)
        ));
    }

    #[test]
    fn test_on_message() {
        let mut ing = SampleIngestor::new(&IngestConfig::default());
        assert!(ing.is_running());
        assert_eq!(ing.view(), None);

        let view = ing.on_message(&record(3.0, 4.0, 0.0)).unwrap().unwrap();

        assert_eq!(view.distance, 5.0);
        assert_eq!(view.gps_time, gps_reference_epoch());
        assert_eq!(ing.view(), Some(&view));
        assert_eq!(ing.processed(), 1);
        assert_eq!(
            ing.series(),
            PlotSeries {
                n: vec![3.0],
                e: vec![4.0],
                d: vec![0.0],
                t: vec![0.0],
            }
        );
    }

    #[test]
    fn test_malformed_is_atomic() {
        let mut ing = ingestor(10, Truncation::KeepOldest);
        ing.on_message(&record(1.0, 2.0, 3.0)).unwrap();
        let before = ing.view().copied();

        let full = record(9.0, 9.0, 9.0);
        let short = &full[..RECORD_SIZE - 1];
        assert_eq!(
            ing.on_message(short),
            Err(IngestError::Codec(CodecError::MalformedRecord {
                expected: RECORD_SIZE,
                actual: RECORD_SIZE - 1
            }))
        );

        assert_eq!(ing.history().north().len(), 1);
        assert_eq!(ing.history().east().len(), 1);
        assert_eq!(ing.history().down().len(), 1);
        assert_eq!(ing.history().time_index().len(), 1);
        assert_eq!(ing.view().copied(), before);
        assert_eq!(ing.processed(), 1);
    }

    #[test]
    fn test_paused_drops_everything() {
        let mut ing = ingestor(10, Truncation::KeepOldest);
        ing.on_message(&record(1.0, 2.0, 3.0)).unwrap();
        let series = ing.series();
        let view = ing.view().copied();

        ing.pause();
        assert_eq!(ing.state(), RunState::Paused);

        assert_eq!(ing.on_message(&record(5.0, 5.0, 5.0)), Ok(None));
        assert_eq!(ing.on_message(&[]), Ok(None));
        assert_eq!(ing.on_message(&[0u8; 3]), Ok(None));

        assert_eq!(ing.series(), series);
        assert_eq!(ing.view().copied(), view);

        ing.resume();
        assert!(ing.on_message(&record(5.0, 5.0, 5.0)).unwrap().is_some());
        assert_eq!(ing.history().len(), 2);
    }

    #[test]
    fn test_toggles() {
        let mut ing = ingestor(10, Truncation::KeepOldest);

        assert_eq!(ing.toggle_pause(), RunState::Paused);
        assert_eq!(ing.toggle_pause(), RunState::Running);

        assert!(!ing.is_centered());
        assert!(ing.toggle_centering());
        ing.set_centering(false);
        assert!(!ing.is_centered());
    }

    #[test]
    fn test_centering_does_not_touch_data() {
        let mut ing = ingestor(10, Truncation::KeepOldest);
        ing.on_message(&record(1.0, 2.0, 3.0)).unwrap();
        let series = ing.series();

        ing.set_centering(true);
        assert_eq!(ing.series(), series);
    }

    #[test]
    fn test_clear_independent_of_state() {
        let mut ing = ingestor(10, Truncation::KeepOldest);
        for i in 0..4 {
            ing.on_message(&record(i as f64, 0.0, 0.0)).unwrap();
        }

        ing.pause();
        ing.clear();

        assert!(ing.history().is_empty());
        assert_eq!(ing.series(), PlotSeries::default());
        assert_eq!(ing.view(), None);
        assert_eq!(ing.state(), RunState::Paused);
        assert_eq!(ing.processed(), 4);
    }

    #[test]
    fn test_history_window() {
        let mut oldest = ingestor(3, Truncation::KeepOldest);
        let mut newest = ingestor(3, Truncation::KeepNewest);

        for i in 0..6 {
            let r = record(i as f64, 0.0, 0.0);
            oldest.on_message(&r).unwrap();
            newest.on_message(&r).unwrap();
        }

        assert_eq!(oldest.series().n, vec![0.0, 1.0, 2.0]);
        assert_eq!(newest.series().n, vec![3.0, 4.0, 5.0]);
        assert_eq!(oldest.series().t, vec![0.0, 1.0, 2.0]);

        // The table always follows the latest sample
        assert_eq!(oldest.view().map(|v| v.baseline.north()), Some(5.0));
    }

    #[test]
    fn test_init_ambiguities() {
        let (link, _injector) = LoopbackLink::new();
        let ing = SampleIngestor::new(&IngestConfig::default());

        ing.init_ambiguities(&link).unwrap();

        assert_eq!(
            link.sent(),
            vec![Frame {
                msg_id: 0x99,
                payload: Bytes::new()
            }]
        );
    }
}
