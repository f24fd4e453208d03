//! Self-describing object format.
//!
//! Each call writes one JSON document on its own line: the storage kind and
//! the samples of a table, or `null` for an absent table.
//!
//! ```text
//! {"kind":"linked_list","x_values":[0.0,1.0],"y_values":[2.0,"inf"]}
//! null
//! ```
//!
//! Finite samples are plain JSON numbers and read back bit for bit.
//! Non-finite samples are tagged strings: `"inf"`, `"-inf"` and `"NaN"`, or
//! `"NaN:0x<bits>"` for a NaN other than the canonical one.

use std::io::{BufRead, Write};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use super::{CodecError, ErrorContext};
use crate::functions::{StorageKind, TabulatedFunction};

const POSITIVE_INFINITY: &str = "inf";
const NEGATIVE_INFINITY: &str = "-inf";
const NAN: &str = "NaN";
const NAN_BITS_PREFIX: &str = "NaN:0x";

/// A single stored sample value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Sample {
    Number(f64),
    Tagged(String),
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Sample::Number(value)
        } else if value.is_nan() {
            if value.to_bits() == f64::NAN.to_bits() {
                Sample::Tagged(NAN.to_string())
            } else {
                Sample::Tagged(format!("{}{:016x}", NAN_BITS_PREFIX, value.to_bits()))
            }
        } else if value > 0.0 {
            Sample::Tagged(POSITIVE_INFINITY.to_string())
        } else {
            Sample::Tagged(NEGATIVE_INFINITY.to_string())
        }
    }
}

impl Sample {
    fn value(&self) -> Option<f64> {
        match self {
            Sample::Number(value) => Some(*value),
            Sample::Tagged(tag) => match tag.as_str() {
                POSITIVE_INFINITY => Some(f64::INFINITY),
                NEGATIVE_INFINITY => Some(f64::NEG_INFINITY),
                NAN => Some(f64::NAN),
                _ => tag
                    .strip_prefix(NAN_BITS_PREFIX)
                    .and_then(|bits| u64::from_str_radix(bits, 16).ok())
                    .map(f64::from_bits)
                    .filter(|value| value.is_nan()),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTable {
    kind: StorageKind,
    x_values: Vec<Sample>,
    y_values: Vec<Sample>,
}

impl RawTable {
    fn capture(function: &dyn TabulatedFunction) -> Self {
        let points = function.points();
        RawTable {
            kind: function.kind(),
            x_values: points.iter().map(|p| Sample::from(p.x)).collect(),
            y_values: points.iter().map(|p| Sample::from(p.y)).collect(),
        }
    }
}

fn decode_samples(samples: &[Sample], field: &str) -> Result<Vec<f64>, CodecError> {
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            sample.value().ok_or_else(|| {
                CodecError::malformed(
                    format!("{:?} is not a sample value at index {}", sample, index),
                    ErrorContext::new().with_parsing(field),
                )
            })
        })
        .collect()
}

impl TryFrom<RawTable> for Box<dyn TabulatedFunction> {
    type Error = CodecError;

    /// Rebuilds the table through the same checks as its constructor.
    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let x_values = decode_samples(&raw.x_values, "x_values")?;
        let y_values = decode_samples(&raw.y_values, "y_values")?;
        Ok(raw.kind.create(&x_values, &y_values)?)
    }
}

/// Writes `function`, or the absent marker for `None`, followed by a
/// newline. The writer is flushed, never closed.
pub fn serialize<W: Write + ?Sized>(
    writer: &mut W,
    function: Option<&dyn TabulatedFunction>,
) -> Result<(), CodecError> {
    let raw = function.map(RawTable::capture);
    serde_json::to_writer(&mut *writer, &raw)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads one value written by [`serialize`], restoring the original storage
/// variant. Returns `None` for the absent marker.
///
/// # Errors
/// - `MalformedInput` when the input is already exhausted or the line is
///   not a valid document.
/// - `Function` when the samples do not form a valid table.
pub fn deserialize<R: BufRead + ?Sized>(
    reader: &mut R,
) -> Result<Option<Box<dyn TabulatedFunction>>, CodecError> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Err(CodecError::malformed(
            "input ended before an object",
            ErrorContext::new().with_parsing("object"),
        ));
    }

    let raw: Option<RawTable> =
        serde_json::from_slice(line.trim_ascii_end()).map_err(|err| match err.classify() {
            Category::Io => CodecError::Serialization(err),
            _ => CodecError::malformed(
                err.to_string(),
                ErrorContext::new().with_parsing("object"),
            ),
        })?;
    let table = raw.map(Box::<dyn TabulatedFunction>::try_from).transpose()?;
    debug!(
        "deserialized {}",
        table
            .as_ref()
            .map_or_else(|| "absent table".to_string(), |t| t.kind().type_name().to_string())
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::functions::{
        ArrayTabulatedFunction, FunctionError, LinkedListTabulatedFunction, MathFunction,
        from_fn,
    };

    use super::*;

    fn round_trip(table: &dyn TabulatedFunction) -> Box<dyn TabulatedFunction> {
        let mut out = Vec::new();
        serialize(&mut out, Some(table)).unwrap();
        deserialize(&mut out.as_slice()).unwrap().unwrap()
    }

    fn bits(table: &dyn TabulatedFunction) -> Vec<(u64, u64)> {
        table
            .points()
            .iter()
            .map(|p| (p.x.to_bits(), p.y.to_bits()))
            .collect()
    }

    #[test]
    fn test_document_layout() {
        let table = LinkedListTabulatedFunction::new(&[0.0, 1.0], &[2.0, 3.5]).unwrap();
        let mut out = Vec::new();
        serialize(&mut out, Some(&table)).unwrap();
        serialize(&mut out, None).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"kind\":\"linked_list\",\"x_values\":[0.0,1.0],\"y_values\":[2.0,3.5]}\nnull\n"
        );
    }

    #[test]
    fn test_round_trip_keeps_storage() {
        let array = ArrayTabulatedFunction::new(&[0.0, 0.5, 1.0], &[1.0, -1.0, 0.1]).unwrap();
        let list = LinkedListTabulatedFunction::new(&[-3.0, 3.0], &[9.0, 9.0]).unwrap();

        let mut out = Vec::new();
        serialize(&mut out, Some(&array)).unwrap();
        serialize(&mut out, None).unwrap();
        serialize(&mut out, Some(&list)).unwrap();

        let mut input = Cursor::new(out);
        let first = deserialize(&mut input).unwrap().unwrap();
        assert_eq!(first.kind(), StorageKind::Array);
        assert_eq!(first.points(), array.points());

        assert!(deserialize(&mut input).unwrap().is_none());

        let third = deserialize(&mut input).unwrap().unwrap();
        assert_eq!(third.kind(), StorageKind::LinkedList);
        assert_eq!(third.points(), list.points());

        assert!(deserialize(&mut input).unwrap_err().is_malformed_input());
    }

    #[test]
    fn test_non_finite_samples_round_trip() {
        let reciprocal = from_fn(|x| 1.0 / x);
        let mut table = ArrayTabulatedFunction::from_function(&reciprocal, -1.0, 1.0, 3).unwrap();
        assert_eq!(table.get_y(1).unwrap(), f64::INFINITY);
        table.set_y(2, f64::NAN).unwrap();

        let mut out = Vec::new();
        serialize(&mut out, Some(&table)).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "{\"kind\":\"array\",\"x_values\":[-1.0,0.0,1.0],\"y_values\":[-1.0,\"inf\",\"NaN\"]}\n"
        );

        let back = deserialize(&mut out.as_slice()).unwrap().unwrap();
        assert_eq!(bits(&*back), bits(&table));
        assert_eq!(back.apply(-2.0), table.apply(-2.0));
    }

    #[test]
    fn test_infinite_bounds_and_nan_payloads_round_trip() {
        let payload = f64::from_bits(0xfff8_0000_0000_0001);
        let table = LinkedListTabulatedFunction::new(
            &[f64::NEG_INFINITY, 0.0, f64::INFINITY],
            &[payload, -0.0, f64::NEG_INFINITY],
        )
        .unwrap();

        let back = round_trip(&table);
        assert_eq!(back.kind(), StorageKind::LinkedList);
        assert_eq!(bits(&*back), bits(&table));
    }

    #[test]
    fn test_finite_samples_are_bit_exact() {
        let ys = [
            1.0715660391465826e-75,
            0.1 + 0.2,
            f64::MIN_POSITIVE,
            5e-324,
            f64::MAX,
            -f64::MAX,
            1.0 / 3.0,
        ];
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64 * 0.7 - 1e-300).collect();
        let table = ArrayTabulatedFunction::new(&xs, &ys).unwrap();

        assert_eq!(bits(&*round_trip(&table)), bits(&table));
    }

    #[test]
    fn test_invariants_are_rechecked() {
        let input = r#"{"kind":"array","x_values":[1.0,0.0],"y_values":[0.0,0.0]}"#;
        assert!(matches!(
            deserialize(&mut input.as_bytes()),
            Err(CodecError::Function(FunctionError::NotStrictlyIncreasing { .. }))
        ));

        let input = r#"{"kind":"array","x_values":[0.0,1.0],"y_values":[0.0]}"#;
        assert!(matches!(
            deserialize(&mut input.as_bytes()),
            Err(CodecError::Function(FunctionError::DifferentLength { .. }))
        ));

        let input = r#"{"kind":"array","x_values":["NaN",1.0],"y_values":[0.0,0.0]}"#;
        assert!(matches!(
            deserialize(&mut input.as_bytes()),
            Err(CodecError::Function(FunctionError::NotStrictlyIncreasing { .. }))
        ));
    }

    #[test]
    fn test_bad_documents_are_malformed_input() {
        for input in [
            "{\"kind\":\"tree\",\"x_values\":[],\"y_values\":[]}\n",
            "[1, 2]\n",
            "\n",
            "{\"kind\":\"array\",\"x_values\":[0.0,1.",
            "{\"kind\":\"array\",\"x_values\":[0.0,\"huge\"],\"y_values\":[0.0,0.0]}\n",
            "{\"kind\":\"array\",\"x_values\":[0.0,\"NaN:0x3ff0000000000000\"],\"y_values\":[0.0,0.0]}\n",
        ] {
            let err = deserialize(&mut input.as_bytes()).unwrap_err();
            assert!(err.is_malformed_input(), "{:?} gave {}", input, err);
        }

        let mut invalid_utf8 = b"{\"kind\":\"array\",\"x_values\":[\xff]}\n".as_slice();
        assert!(deserialize(&mut invalid_utf8).unwrap_err().is_malformed_input());
    }
}
