//! Line-oriented text format.
//!
//! ```text
//! 3
//! 0,0 0,0
//! 1,0 1,0
//! 2,5 6,25
//! ```
//!
//! The first line holds the number of samples, each following line one
//! `x y` pair in index order. Separators come from a [`TextFormat`].

use std::io::{BufRead, Write};

use log::debug;

use super::{CodecError, ErrorContext, TextFormat};
use crate::functions::{TabulatedFunction, TabulatedFunctionFactory};

/// Writes `function` as text. The writer is flushed, never closed.
pub fn write_text<W: Write + ?Sized>(
    writer: &mut W,
    function: &(impl TabulatedFunction + ?Sized),
    format: &TextFormat,
) -> Result<(), CodecError> {
    format.validate()?;

    let points = function.points();
    writeln!(writer, "{}", points.len())?;
    for point in &points {
        writeln!(
            writer,
            "{}{}{}",
            format.format_number(point.x),
            format.column_separator,
            format.format_number(point.y)
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads one table written by [`write_text`] and builds it with `factory`.
///
/// Consumes exactly the count line and the declared number of point lines,
/// so several tables can be read from one stream in sequence.
///
/// # Errors
/// - `MalformedInput` for a missing or non-integer count line, a line that
///   is not valid UTF-8 or not exactly two numbers, or a number in the wrong
///   decimal format.
/// - `UnexpectedEof` when the input ends before all points are read.
/// - `Function` when the points do not form a valid table.
pub fn read_text<R: BufRead + ?Sized>(
    reader: &mut R,
    factory: &dyn TabulatedFunctionFactory,
    format: &TextFormat,
) -> Result<Box<dyn TabulatedFunction>, CodecError> {
    format.validate()?;

    let mut buffer = Vec::new();
    let Some(line) = next_line(reader, &mut buffer, 1)? else {
        return Err(CodecError::malformed(
            "missing point count",
            ErrorContext::with_line(1),
        ));
    };
    let count_text = line.trim();
    let count: usize = count_text.parse().map_err(|_| {
        CodecError::malformed(
            format!("'{}' is not a point count", count_text),
            ErrorContext::with_line(1).with_parsing("point count"),
        )
    })?;

    // the count is untrusted until the points are actually read
    let capacity = count.min(super::PREALLOCATION_LIMIT);
    let mut x_values = Vec::with_capacity(capacity);
    let mut y_values = Vec::with_capacity(capacity);
    for index in 0..count {
        let line_number = index + 2;
        let Some(line) = next_line(reader, &mut buffer, line_number)? else {
            return Err(CodecError::UnexpectedEof {
                expected: count,
                found: index,
                context: ErrorContext::with_line(line_number),
            });
        };

        let columns = format.split_columns(line.trim_end_matches(['\n', '\r']));
        let [x, y] = columns[..] else {
            return Err(CodecError::malformed(
                format!("expected 2 columns, found {}", columns.len()),
                ErrorContext::with_line(line_number).with_parsing("point"),
            ));
        };
        x_values.push(format.parse_number(
            x,
            ErrorContext::with_line(line_number).with_parsing("x-value"),
        )?);
        y_values.push(format.parse_number(
            y,
            ErrorContext::with_line(line_number).with_parsing("y-value"),
        )?);
    }

    debug!("read {} points from text", count);
    Ok(factory.create(&x_values, &y_values)?)
}

/// Reads the next line into `buffer`, or `None` at end of input.
fn next_line<'a, R: BufRead + ?Sized>(
    reader: &mut R,
    buffer: &'a mut Vec<u8>,
    line_number: usize,
) -> Result<Option<&'a str>, CodecError> {
    buffer.clear();
    if reader.read_until(b'\n', buffer)? == 0 {
        return Ok(None);
    }
    std::str::from_utf8(buffer).map(Some).map_err(|err| {
        CodecError::malformed(
            format!("line is not valid UTF-8: {}", err),
            ErrorContext::with_line(line_number),
        )
    })
}
