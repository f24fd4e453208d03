//! Fixed-width binary format: a big-endian `i32` sample count followed by
//! that many big-endian `f64` `(x, y)` pairs, without padding.

use std::io::{self, Read, Write};

use log::debug;

use super::{CodecError, ErrorContext};
use crate::functions::{TabulatedFunction, TabulatedFunctionFactory};

const COUNT_WIDTH: u64 = 4;
const PAIR_WIDTH: u64 = 16;

/// Writes `function` in binary. The writer is flushed, never closed.
///
/// # Errors
/// `MalformedInput` when the table has more samples than an `i32` count
/// can describe.
pub fn write_binary<W: Write + ?Sized>(
    writer: &mut W,
    function: &(impl TabulatedFunction + ?Sized),
) -> Result<(), CodecError> {
    let points = function.points();
    let count = i32::try_from(points.len()).map_err(|_| {
        CodecError::malformed(
            format!("{} points do not fit the count field", points.len()),
            ErrorContext::with_offset(0).with_parsing("point count"),
        )
    })?;

    writer.write_all(&count.to_be_bytes())?;
    for point in &points {
        writer.write_all(&point.x.to_be_bytes())?;
        writer.write_all(&point.y.to_be_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads one table written by [`write_binary`] and builds it with
/// `factory`. Samples are restored bit for bit.
///
/// # Errors
/// - `MalformedInput` for a negative count.
/// - `UnexpectedEof` when fewer bytes than declared are available.
/// - `Function` when the samples do not form a valid table.
pub fn read_binary<R: Read + ?Sized>(
    reader: &mut R,
    factory: &dyn TabulatedFunctionFactory,
) -> Result<Box<dyn TabulatedFunction>, CodecError> {
    let mut count_bytes = [0u8; 4];
    read_exact_or_eof(reader, &mut count_bytes, 0, 0, 0)?;
    let declared = i32::from_be_bytes(count_bytes);
    let count = usize::try_from(declared).map_err(|_| {
        CodecError::malformed(
            format!("negative point count {}", declared),
            ErrorContext::with_offset(0).with_parsing("point count"),
        )
    })?;

    // the count is untrusted until the points are actually read
    let capacity = count.min(super::PREALLOCATION_LIMIT);
    let mut x_values = Vec::with_capacity(capacity);
    let mut y_values = Vec::with_capacity(capacity);
    let mut pair = [0u8; 16];
    for index in 0..count {
        let offset = COUNT_WIDTH + index as u64 * PAIR_WIDTH;
        read_exact_or_eof(reader, &mut pair, count, index, offset)?;
        let (x, y) = pair.split_at(8);
        x_values.push(f64::from_be_bytes(to_word(x)));
        y_values.push(f64::from_be_bytes(to_word(y)));
    }

    debug!("read {} points from binary", count);
    Ok(factory.create(&x_values, &y_values)?)
}

fn read_exact_or_eof<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    expected: usize,
    found: usize,
    offset: u64,
) -> Result<(), CodecError> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => CodecError::UnexpectedEof {
            expected,
            found,
            context: ErrorContext::with_offset(offset),
        },
        _ => CodecError::Io(err),
    })
}

fn to_word(bytes: &[u8]) -> [u8; 8] {
    let mut word = [0u8; 8];
    word.copy_from_slice(bytes);
    word
}
