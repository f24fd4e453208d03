//! # Codecs
//!
//! Reading and writing tabulated functions to byte streams:
//!
//! - [`text`]: a count line, then one `x y` line per sample, with
//!   separators set by [`TextFormat`]
//! - [`binary`]: fixed-width big-endian count and samples, bit-exact
//! - [`object`]: one self-describing JSON document per table, which keeps
//!   the storage variant and can stand for an absent table
//!
//! Writers take `&mut W` and flush but never close the stream, so several
//! tables can share one stream. Readers consume exactly one table.
//!
//! ```rust
//! use tabfn::{
//!     functions::{ArrayTabulatedFunctionFactory, TabulatedFunction},
//!     io::{TextFormat, read_text},
//! };
//!
//! let mut input = "3\n0,0 0,0\n1,0 1,0\n2,5 6,25\n".as_bytes();
//! let table = read_text(&mut input, &ArrayTabulatedFunctionFactory, &TextFormat::default()).unwrap();
//! assert_eq!(table.x_values(), vec![0.0, 1.0, 2.5]);
//! assert_eq!(table.y_values(), vec![0.0, 1.0, 6.25]);
//! ```

pub mod binary;
pub mod config;
pub mod errors;
pub mod object;
pub mod text;

pub use binary::{read_binary, write_binary};
pub use config::TextFormat;
pub use errors::{CodecError, ErrorContext};
pub use object::{deserialize, serialize};
pub use text::{read_text, write_text};

/// Upper bound on samples reserved ahead of reading them.
const PREALLOCATION_LIMIT: usize = 1 << 16;
