use nalgebra::Vector3;

pub mod codec;

pub use codec::{CodecError, RECORD_SIZE, decode, encode};

/// Relative position solution between the base station and the rover, as
/// decoded from one wire record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// North, east, down offsets in meters
    pub ned: Vector3<f64>,
    pub time_of_week: u32,
    pub week_number: u16,
    /// Raw solution status bits
    pub flags: u8,
    pub num_satellites: u8,
}

impl Baseline {
    pub fn north(&self) -> f64 {
        self.ned.x
    }

    pub fn east(&self) -> f64 {
        self.ned.y
    }

    pub fn down(&self) -> f64 {
        self.ned.z
    }

    /// Length of the baseline vector, `sqrt(ned . ned)`.
    pub fn distance(&self) -> f64 {
        self.ned.dot(&self.ned).sqrt()
    }
}
