//! Wire layout of the baseline record. Everything that depends on field
//! offsets or byte order lives here.
//!
//! ```text
//! offset  size  field
//! 0       8     north           f64
//! 8       8     east            f64
//! 16      8     down            f64
//! 24      4     time_of_week    u32
//! 28      2     week_number     u16
//! 30      1     flags           u8
//! 31      1     num_satellites  u8
//! ```
//! All fields are little-endian.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use nalgebra::Vector3;
use thiserror::Error;

use super::Baseline;

pub const RECORD_SIZE: usize = 3 * 8 + 4 + 2 + 1 + 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed baseline record: expected {expected} bytes, got {actual}")]
    MalformedRecord { expected: usize, actual: usize },
}

pub fn decode(mut data: &[u8]) -> Result<Baseline, CodecError> {
    if data.len() != RECORD_SIZE {
        return Err(CodecError::MalformedRecord {
            expected: RECORD_SIZE,
            actual: data.len(),
        });
    }

    let ned = Vector3::new(data.get_f64_le(), data.get_f64_le(), data.get_f64_le());

    Ok(Baseline {
        ned,
        time_of_week: data.get_u32_le(),
        week_number: data.get_u16_le(),
        flags: data.get_u8(),
        num_satellites: data.get_u8(),
    })
}

pub fn encode_into(baseline: &Baseline, buf: &mut impl BufMut) {
    buf.put_f64_le(baseline.ned.x);
    buf.put_f64_le(baseline.ned.y);
    buf.put_f64_le(baseline.ned.z);
    buf.put_u32_le(baseline.time_of_week);
    buf.put_u16_le(baseline.week_number);
    buf.put_u8(baseline.flags);
    buf.put_u8(baseline.num_satellites);
}

pub fn encode(baseline: &Baseline) -> Bytes {
    let mut buf = BytesMut::with_capacity(RECORD_SIZE);
    encode_into(baseline, &mut buf);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use nalgebra::vector;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    use super::*;

    fn reference_bytes() -> Vec<u8> {
        let mut bytes = vec![];
        bytes.extend_from_slice(&1.25f64.to_le_bytes());
        bytes.extend_from_slice(&(-3.5f64).to_le_bytes());
        bytes.extend_from_slice(&0.125f64.to_le_bytes());
        bytes.extend_from_slice(&123_456_789u32.to_le_bytes());
        bytes.extend_from_slice(&1765u16.to_le_bytes());
        bytes.push(0x81);
        bytes.push(9);
        bytes
    }

    #[test]
    fn test_record_size() {
        assert_eq!(RECORD_SIZE, 32);
        assert_eq!(reference_bytes().len(), RECORD_SIZE);
    }

    #[test]
    fn test_decode_layout() {
        let b = decode(&reference_bytes()).unwrap();

        assert_eq!(
            b,
            Baseline {
                ned: vector![1.25, -3.5, 0.125],
                time_of_week: 123_456_789,
                week_number: 1765,
                flags: 0x81,
                num_satellites: 9,
            }
        );
    }

    #[test]
    fn test_encode_layout() {
        let b = decode(&reference_bytes()).unwrap();
        assert_eq!(encode(&b).to_vec(), reference_bytes());
    }

    #[test]
    fn test_random_records_roundtrip() {
        let mut rng = rand::rng();

        for _ in 0..256 {
            let mut record = [0u8; RECORD_SIZE];
            rng.fill(&mut record[..]);

            // NaN payloads must survive untouched as well
            let decoded = decode(&record).unwrap();
            assert_eq!(&encode(&decoded)[..], &record[..]);
        }
    }

    #[test]
    fn test_wrong_length() {
        let bytes = reference_bytes();

        for len in [0, 1, RECORD_SIZE - 1, RECORD_SIZE + 1, RECORD_SIZE + 2, 64] {
            let mut data = bytes.clone();
            data.resize(len, 0);

            assert_eq!(
                decode(&data),
                Err(CodecError::MalformedRecord {
                    expected: RECORD_SIZE,
                    actual: len
                })
            );
        }
    }
}
