//! CSV rendering and parsing of recorded sessions
//!
//! # Format
//!
//! ```text
//! Timestamp,AccX,AccY,AccZ,RotX,RotY,RotZ,Pitch,Roll,Yaw,Label
//! 1718000000.125,0.0,0.0,0.0,0.0,0.0,0.0,0.1,0.0,0.0,walk
//! ```
//!
//! Numbers are written with Rust's shortest round-trip float formatting, so
//! parsing a row gives back the exact `f64` that was written. The label is
//! written verbatim apart from line breaks, which become spaces so a row can
//! never be split in two.

use std::io::Write;

use crate::buffer::SampleBuffer;
use crate::error::{RecorderError, Result};
use crate::types::{Attitude, MotionSample, Vector3};

/// Header row of every session file
pub const CSV_HEADER: &str = "Timestamp,AccX,AccY,AccZ,RotX,RotY,RotZ,Pitch,Roll,Yaw,Label";

/// Number of numeric columns before the label
const NUMERIC_COLUMNS: usize = 10;

/// A session file read back into memory
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedSession {
    pub samples: Vec<MotionSample>,
    /// Label of the first row, if there are any rows
    pub label: Option<String>,
}

/// Converts session buffers to and from CSV
pub struct CsvSerializer;

impl CsvSerializer {
    /// Render a buffer as a CSV document with `label` on every row
    pub fn serialize(buffer: &SampleBuffer, label: &str) -> Vec<u8> {
        Self::serialize_samples(buffer.as_slice(), label)
    }

    /// Render a slice of samples as a CSV document
    pub fn serialize_samples(samples: &[MotionSample], label: &str) -> Vec<u8> {
        // Roughly 200 bytes per row at full precision
        let mut out = Vec::with_capacity(CSV_HEADER.len() + 1 + samples.len() * 200);
        // Writing into a Vec cannot fail
        let _ = Self::write_to(&mut out, samples, label);
        out
    }

    /// Stream the CSV document into `writer`
    pub fn write_to<W: Write>(
        writer: &mut W,
        samples: &[MotionSample],
        label: &str,
    ) -> std::io::Result<()> {
        let label = normalize_label(label);
        writeln!(writer, "{}", CSV_HEADER)?;
        for s in samples {
            writeln!(
                writer,
                "{:?},{:?},{:?},{:?},{:?},{:?},{:?},{:?},{:?},{:?},{}",
                s.timestamp,
                s.acceleration.x,
                s.acceleration.y,
                s.acceleration.z,
                s.rotation_rate.x,
                s.rotation_rate.y,
                s.rotation_rate.z,
                s.attitude.pitch,
                s.attitude.roll,
                s.attitude.yaw,
                label
            )?;
        }
        Ok(())
    }

    /// Parse a CSV document produced by [`CsvSerializer::serialize`].
    ///
    /// Labels containing commas are re-joined from the trailing fields.
    pub fn parse(bytes: &[u8]) -> Result<LoadedSession> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(bytes);

        let header = reader.headers()?;
        let header_line = header.iter().collect::<Vec<_>>().join(",");
        if header_line != CSV_HEADER {
            return Err(RecorderError::Parse {
                line: 1,
                message: format!("Unexpected header: {}", header_line),
            });
        }

        let mut parsed = LoadedSession::default();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 2);

            if record.len() < NUMERIC_COLUMNS + 1 {
                return Err(RecorderError::Parse {
                    line,
                    message: format!(
                        "Expected at least {} columns, found {}",
                        NUMERIC_COLUMNS + 1,
                        record.len()
                    ),
                });
            }

            let mut values = [0.0f64; NUMERIC_COLUMNS];
            for (column, value) in values.iter_mut().enumerate() {
                *value = record[column].parse().map_err(|e| RecorderError::Parse {
                    line,
                    message: format!("Invalid number in column {}: {}", column + 1, e),
                })?;
            }
            let label = record
                .iter()
                .skip(NUMERIC_COLUMNS)
                .collect::<Vec<_>>()
                .join(",");

            if parsed.label.is_none() {
                parsed.label = Some(label.clone());
            }
            parsed.samples.push(MotionSample {
                timestamp: values[0],
                acceleration: Vector3::new(values[1], values[2], values[3]),
                rotation_rate: Vector3::new(values[4], values[5], values[6]),
                attitude: Attitude::new(values[7], values[8], values[9]),
                label,
            });
        }

        Ok(parsed)
    }
}

fn normalize_label(label: &str) -> String {
    label.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(timestamp: f64, pitch: f64) -> MotionSample {
        MotionSample {
            timestamp,
            attitude: Attitude::new(pitch, 0.0, 0.0),
            ..Default::default()
        }
    }

    fn to_string(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("serializer emits UTF-8")
    }

    #[test]
    fn test_empty_buffer_is_header_only() {
        let csv = to_string(CsvSerializer::serialize(&SampleBuffer::new(), "walk"));
        assert_eq!(csv, format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn test_rows_follow_buffer_order() {
        let buffer: SampleBuffer = vec![sample(1.0, 0.0), sample(2.0, 0.1), sample(3.0, 0.2)]
            .into_iter()
            .collect();
        let csv = to_string(CsvSerializer::serialize(&buffer, "walk"));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,walk");
        assert_eq!(lines[2], "2.0,0.0,0.0,0.0,0.0,0.0,0.0,0.1,0.0,0.0,walk");
        assert_eq!(lines[3], "3.0,0.0,0.0,0.0,0.0,0.0,0.0,0.2,0.0,0.0,walk");
    }

    #[test]
    fn test_label_overrides_sample_label() {
        let mut s = sample(1.0, 0.0);
        s.label = "ignored".to_string();
        let csv = to_string(CsvSerializer::serialize_samples(&[s], "head nod"));
        assert!(csv.lines().nth(1).unwrap().ends_with(",head nod"));
    }

    #[test]
    fn test_full_precision() {
        let s = MotionSample {
            timestamp: 1_718_000_000.123_456_7,
            acceleration: Vector3::new(0.123_456_789_012_345_67, -1e-9, 3.0),
            ..Default::default()
        };
        let parsed = CsvSerializer::parse(&CsvSerializer::serialize_samples(&[s.clone()], ""))
            .unwrap();
        assert_eq!(parsed.samples[0].timestamp, s.timestamp);
        assert_eq!(parsed.samples[0].acceleration, s.acceleration);
    }

    #[test]
    fn test_line_breaks_in_label_are_flattened() {
        let csv = to_string(CsvSerializer::serialize_samples(
            &[sample(1.0, 0.0)],
            "two\nlines",
        ));
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains(",two lines"));
    }

    #[test]
    fn test_parse_label_with_commas() {
        let bytes = CsvSerializer::serialize_samples(&[sample(1.0, 0.0)], "sit, then stand");
        let parsed = CsvSerializer::parse(&bytes).unwrap();
        assert_eq!(parsed.label.as_deref(), Some("sit, then stand"));
        assert_eq!(parsed.samples[0].label, "sit, then stand");
    }

    #[test]
    fn test_parse_rejects_foreign_header() {
        let err = CsvSerializer::parse(b"time,value\n1,2\n").unwrap_err();
        assert!(matches!(err, RecorderError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_reports_bad_number() {
        let doc = format!("{}\n1.0,x,0,0,0,0,0,0,0,0,walk\n", CSV_HEADER);
        let err = CsvSerializer::parse(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, RecorderError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_parse_empty_session() {
        let parsed = CsvSerializer::parse(&CsvSerializer::serialize(&SampleBuffer::new(), "x"))
            .unwrap();
        assert!(parsed.samples.is_empty());
        assert_eq!(parsed.label, None);
    }

    fn finite() -> impl Strategy<Value = f64> {
        -1.0e6f64..1.0e6
    }

    proptest! {
        #[test]
        fn test_serialize_is_deterministic_and_faithful(
            rows in prop::collection::vec(
                (finite(), finite(), finite(), finite(), finite(), finite(), finite(), finite(), finite(), finite()),
                0..40,
            ),
            label in "[a-zA-Z0-9 _-]{0,16}",
        ) {
            let samples: Vec<MotionSample> = rows
                .iter()
                .map(|r| MotionSample {
                    timestamp: r.0,
                    acceleration: Vector3::new(r.1, r.2, r.3),
                    rotation_rate: Vector3::new(r.4, r.5, r.6),
                    attitude: Attitude::new(r.7, r.8, r.9),
                    label: String::new(),
                })
                .collect();

            let first = CsvSerializer::serialize_samples(&samples, &label);
            let second = CsvSerializer::serialize_samples(&samples, &label);
            prop_assert_eq!(&first, &second);

            let parsed = CsvSerializer::parse(&first).unwrap();
            prop_assert_eq!(parsed.samples.len(), samples.len());
            for (back, original) in parsed.samples.iter().zip(&samples) {
                prop_assert_eq!(back.timestamp, original.timestamp);
                prop_assert_eq!(back.acceleration, original.acceleration);
                prop_assert_eq!(back.rotation_rate, original.rotation_rate);
                prop_assert_eq!(back.attitude, original.attitude);
                prop_assert_eq!(&back.label, &label);
            }
        }
    }
}
