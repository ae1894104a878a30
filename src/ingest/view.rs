use std::fmt;

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use crate::{baseline::Baseline, utils::time::TimeConverter};

/// Snapshot derived from the latest sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedView {
    pub baseline: Baseline,
    pub distance: f64,
    pub gps_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub label: &'static str,
    pub value: String,
}

impl TableRow {
    fn new(label: &'static str, value: impl ToString) -> Self {
        TableRow {
            label,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

impl DerivedView {
    pub fn new(baseline: Baseline, time: &TimeConverter) -> Self {
        DerivedView {
            baseline,
            distance: baseline.distance(),
            gps_time: time.to_calendar(baseline.week_number, baseline.time_of_week),
        }
    }

    /// Rows of the side table, in display order.
    pub fn table(&self) -> Vec<TableRow> {
        let b = &self.baseline;

        vec![
            TableRow::new("GPS Time", self.gps_time.format("%Y-%m-%d %H:%M:%S%.3f")),
            TableRow::new("N", b.north()),
            TableRow::new("E", b.east()),
            TableRow::new("D", b.down()),
            TableRow::new("Dist.", self.distance),
            TableRow::new("Num. Sats.", b.num_satellites),
            TableRow::new("Flags", format!("{:#04x}", b.flags)),
        ]
    }

    /// Segment from the origin to the current baseline, drawn as a marker.
    pub fn reference_line(&self) -> [Vector3<f64>; 2] {
        [Vector3::zeros(), self.baseline.ned]
    }
}
