use crate::{baseline::Baseline, utils::capacity::Capacity};

use super::{RollingHistory, Truncation};

/// Plain copies of the plotted series, ready to hand to a plotting library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotSeries {
    pub n: Vec<f64>,
    pub e: Vec<f64>,
    pub d: Vec<f64>,
    /// Sample index `0..len`, used as the time axis
    pub t: Vec<f64>,
}

/// North, east and down histories kept in lock step, plus the synthetic
/// time index series.
#[derive(Debug, Clone)]
pub struct BaselineHistory {
    north: RollingHistory<f64>,
    east: RollingHistory<f64>,
    down: RollingHistory<f64>,
    time_index: Vec<f64>,
}

impl BaselineHistory {
    pub fn new(capacity: Capacity, truncation: Truncation) -> Self {
        Self {
            north: RollingHistory::new(capacity, truncation),
            east: RollingHistory::new(capacity, truncation),
            down: RollingHistory::new(capacity, truncation),
            time_index: Vec::with_capacity(capacity.get()),
        }
    }

    pub fn append(&mut self, baseline: &Baseline) {
        self.north.append(baseline.north());
        self.east.append(baseline.east());
        self.down.append(baseline.down());

        self.time_index = (0..self.north.len()).map(|i| i as f64).collect();
    }

    pub fn clear(&mut self) {
        self.north.clear();
        self.east.clear();
        self.down.clear();
        self.time_index.clear();
    }

    pub fn len(&self) -> usize {
        self.north.len()
    }

    pub fn is_empty(&self) -> bool {
        self.north.is_empty()
    }

    pub fn north(&self) -> &RollingHistory<f64> {
        &self.north
    }

    pub fn east(&self) -> &RollingHistory<f64> {
        &self.east
    }

    pub fn down(&self) -> &RollingHistory<f64> {
        &self.down
    }

    pub fn time_index(&self) -> &[f64] {
        &self.time_index
    }

    pub fn series(&self) -> PlotSeries {
        PlotSeries {
            n: self.north.values(),
            e: self.east.values(),
            d: self.down.values(),
            t: self.time_index.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::vector;
    use pretty_assertions::assert_eq;

    use super::*;

    fn baseline(i: u32) -> Baseline {
        let v = i as f64;
        Baseline {
            ned: vector![v, 10.0 * v, -v],
            time_of_week: i,
            week_number: 1,
            flags: 0,
            num_satellites: 5,
        }
    }

    fn history(capacity: usize, truncation: Truncation) -> BaselineHistory {
        BaselineHistory::new(Capacity::new(capacity).unwrap(), truncation)
    }

    #[test]
    fn test_series_in_lock_step() {
        let mut h = history(4, Truncation::KeepOldest);

        for i in 0..3 {
            h.append(&baseline(i));
        }

        assert_eq!(
            h.series(),
            PlotSeries {
                n: vec![0.0, 1.0, 2.0],
                e: vec![0.0, 10.0, 20.0],
                d: vec![0.0, -1.0, -2.0],
                t: vec![0.0, 1.0, 2.0],
            }
        );
    }

    #[test]
    fn test_time_index_stops_growing_at_capacity() {
        for truncation in [Truncation::KeepOldest, Truncation::KeepNewest] {
            let mut h = history(3, truncation);

            for i in 0..10 {
                h.append(&baseline(i));
            }

            assert_eq!(h.len(), 3);
            assert_eq!(h.time_index(), &[0.0, 1.0, 2.0]);
        }
    }

    #[test]
    fn test_windows_per_policy() {
        let mut oldest = history(2, Truncation::KeepOldest);
        let mut newest = history(2, Truncation::KeepNewest);

        for i in 0..5 {
            oldest.append(&baseline(i));
            newest.append(&baseline(i));
        }

        assert_eq!(oldest.north().values(), vec![0.0, 1.0]);
        assert_eq!(newest.north().values(), vec![3.0, 4.0]);
        assert_eq!(newest.east().values(), vec![30.0, 40.0]);
    }

    #[test]
    fn test_clear() {
        let mut h = history(3, Truncation::KeepOldest);
        for i in 0..5 {
            h.append(&baseline(i));
        }

        h.clear();

        assert!(h.is_empty());
        assert_eq!(h.series(), PlotSeries::default());
    }
}
