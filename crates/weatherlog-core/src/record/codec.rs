//! Tab-separated line codec
//!
//! `YYYY-MM-DD<TAB>HH:MM<TAB>v1<TAB>...<TAB>vn`, each value rounded to the
//! precision its schema declares so that re-reading a line is stable.

use chrono::{NaiveDate, NaiveTime};

use super::{DecodeError, Record, Schema, DATE_FORMAT, TIME_FORMAT};
use crate::clock::Zone;

/// Encode a record as one log line, without the trailing newline
pub fn encode<S: Schema>(record: &Record<S>) -> String {
    encode_with_precision(record, S::PRECISION)
}

/// Encode a record with per-column decimal places overriding the schema's.
///
/// A `precision` that does not have one entry per column is ignored.
pub fn encode_with_precision<S: Schema>(record: &Record<S>, precision: &[usize]) -> String {
    let precision = if precision.len() == S::width() {
        precision
    } else {
        S::PRECISION
    };
    let wall_clock = record.wall_clock();
    let mut line = format!(
        "{}\t{}",
        wall_clock.format(DATE_FORMAT),
        wall_clock.format(TIME_FORMAT)
    );
    for (value, places) in record.values().columns().iter().zip(precision) {
        line.push('\t');
        line.push_str(&format!("{:.*}", *places, value));
    }
    line
}

/// Decode one log line; a trailing newline is ignored
pub fn decode<S: Schema>(line: &str, zone: Zone) -> Result<Record<S>, DecodeError> {
    let line = line.trim_end_matches(['\n', '\r']);
    let fields: Vec<&str> = line.split('\t').collect();

    let expected = 2 + S::width();
    if fields.len() != expected {
        return Err(DecodeError::FieldCount {
            expected,
            found: fields.len(),
        });
    }

    let date = NaiveDate::parse_from_str(fields[0], DATE_FORMAT)
        .map_err(|_| DecodeError::InvalidDate(fields[0].to_string()))?;
    let time = NaiveTime::parse_from_str(fields[1], TIME_FORMAT)
        .map_err(|_| DecodeError::InvalidTime(fields[1].to_string()))?;

    let columns = fields[2..]
        .iter()
        .enumerate()
        .map(|(i, text)| parse_number(text, i + 2))
        .collect::<Result<Vec<f64>, _>>()?;

    Record::new(date.and_time(time), S::from_columns(&columns), zone)
}

fn parse_number(text: &str, column: usize) -> Result<f64, DecodeError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DecodeError::InvalidNumber {
            column,
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Quantity, Sample, SummaryRow};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const LINE: &str = "2024-10-28\t14:15\t21.4\t990.12\t1016.07\t54.2\t10.13";

    #[test]
    fn test_decode_sample_line() {
        let record: Record<Sample> = decode(LINE, Zone::UTC).unwrap();
        assert_eq!(record.value(Quantity::Temperature), 21.4);
        assert_eq!(record.value(Quantity::PressureRaw), 990.12);
        assert_eq!(record.value(Quantity::PressureSeaLevel), 1016.07);
        assert_eq!(record.value(Quantity::HumidityRel), 54.2);
        assert_eq!(record.value(Quantity::HumidityAbs), 10.13);
        assert_eq!(record.timestamp(), 1_730_124_900);
    }

    #[test]
    fn test_encode_rounds_to_column_precision() {
        let values = Sample {
            temperature: 21.449,
            pressure_raw: 990.1234,
            pressure_sea_level: 1016.0749,
            rel_humidity: 54.16,
            abs_humidity: 10.126,
        };
        let record = Record::at(1_730_124_900, values, Zone::UTC).unwrap();
        assert_eq!(encode(&record), LINE);
    }

    #[test]
    fn test_decode_ignores_trailing_newline() {
        let line = format!("{}\n", LINE);
        assert!(decode::<Sample>(&line, Zone::UTC).is_ok());
        let line = format!("{}\r\n", LINE);
        assert!(decode::<Sample>(&line, Zone::UTC).is_ok());
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        let err = decode::<SummaryRow>(LINE, Zone::UTC).unwrap_err();
        assert_eq!(
            err,
            DecodeError::FieldCount {
                expected: 5,
                found: 7
            }
        );
        assert!(matches!(
            decode::<Sample>("", Zone::UTC),
            Err(DecodeError::FieldCount { found: 1, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_fields() {
        assert!(matches!(
            decode::<SummaryRow>("2024-13-01\t10:00\t1.0\t2.0\t3.0", Zone::UTC),
            Err(DecodeError::InvalidDate(_))
        ));
        assert!(matches!(
            decode::<SummaryRow>("2024-10-01\t25:00\t1.0\t2.0\t3.0", Zone::UTC),
            Err(DecodeError::InvalidTime(_))
        ));
        assert_eq!(
            decode::<SummaryRow>("2024-10-01\t10:00\t1.0\tabc\t3.0", Zone::UTC).unwrap_err(),
            DecodeError::InvalidNumber {
                column: 3,
                value: "abc".to_string()
            }
        );
        assert!(matches!(
            decode::<SummaryRow>("2024-10-01\t10:00\t1.0\tNaN\t3.0", Zone::UTC),
            Err(DecodeError::InvalidNumber { column: 3, .. })
        ));
    }

    /// Minute-aligned instants between 1990 and 2060
    fn random_instant(rng: &mut StdRng) -> i64 {
        rng.gen_range(631_152_000 / 60..2_840_140_800 / 60) * 60
    }

    fn assert_round_trip<S: Schema>(record: &Record<S>, precision: &[usize]) {
        let line = encode_with_precision(record, precision);
        let decoded: Record<S> = decode(&line, Zone::UTC).unwrap();
        assert_eq!(decoded.timestamp(), record.timestamp(), "{}", line);
        let columns = record.values().columns();
        let read_back = decoded.values().columns();
        for (column, (value, places)) in read_back.iter().zip(precision).enumerate() {
            let tolerance = 0.5 * 10f64.powi(-(*places as i32)) + 1e-9;
            assert!(
                (value - columns[column]).abs() <= tolerance,
                "column {} of '{}' decoded as {}, was {}",
                column,
                line,
                value,
                columns[column]
            );
        }
    }

    #[test]
    fn test_sample_round_trip_within_precision() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let values = Sample {
                temperature: rng.gen_range(-30.0..45.0),
                pressure_raw: rng.gen_range(900.0..1050.0),
                pressure_sea_level: rng.gen_range(950.0..1060.0),
                rel_humidity: rng.gen_range(0.0..100.0),
                abs_humidity: rng.gen_range(0.0..40.0),
            };
            let record = Record::at(random_instant(&mut rng), values, Zone::UTC).unwrap();
            assert_round_trip(&record, Sample::PRECISION);
        }
    }

    #[test]
    fn test_summary_round_trip_within_precision() {
        let mut rng = StdRng::seed_from_u64(11);
        for quantity in Quantity::ALL {
            let precision = SummaryRow::precision_for(quantity);
            for _ in 0..100 {
                let min = rng.gen_range(-30.0..1000.0);
                let avg = min + rng.gen_range(0.0..20.0);
                let values = SummaryRow::new(min, avg, avg + rng.gen_range(0.0..20.0));
                let record = Record::at(random_instant(&mut rng), values, Zone::UTC).unwrap();
                assert_round_trip(&record, precision);
            }
        }
    }

    #[test]
    fn test_mismatched_precision_falls_back_to_schema() {
        let record = Record::at(0, SummaryRow::new(1.26, 2.0, 3.0), Zone::UTC).unwrap();
        assert_eq!(encode_with_precision(&record, &[2]), encode(&record));
        assert_eq!(
            encode_with_precision(&record, &[2, 2, 2]),
            "1970-01-01\t00:00\t1.26\t2.00\t3.00"
        );
    }

    #[test]
    fn test_timestamp_follows_zone() {
        let utc: Record<Sample> = decode(LINE, Zone::UTC).unwrap();
        let cet: Record<Sample> = decode(LINE, Zone::Fixed { offset_secs: 3600 }).unwrap();
        assert_eq!(utc.timestamp() - cet.timestamp(), 3600);
    }
}
