//! Binary image to hex record transcoder for 8-bit target loaders
//! - Three input layouts (origin-prefixed, chunk table, raw)
//! - Up to 16 data bytes per record, 16-bit wrapping addresses
//! - Every output ends with the fixed `:00000001FF` terminator
//!
//! ## Input layouts
//! - **1 / `OriginPrefixed`**: origin word (lsb, msb) followed by data to end of input.
//! - **2 / `ChunkTable`**: repeated origin word, length word, `length` data bytes.
//! - **3 / `Raw`**: data only, loaded at `$0000`.
//!
//! ## Record format
//! ```text
//! :LLAAAA00DD..DDCC
//! ```
//! - `LL` = number of data bytes, `AAAA` = address (high byte first)
//! - `00` = data record, `CC` = two's complement of the sum of all fields
//!
//! ## Basic Usage
//! ```rust
//! use binhex::Layout;
//!
//! fn main() -> Result<(), binhex::EncodeError> {
//!     let text = binhex::encode_bytes(Layout::Raw, &[0x01, 0x02, 0x03])?;
//!     assert_eq!(text, ":03000000010203F7\r\n:00000001FF\r\n");
//!     Ok(())
//! }
//! ```
//!
//! ## License
//! This project is released under [The Unlicense](https://unlicense.org/).
//! You are free to use it for any purpose, without restriction.

mod error;
mod layout;
mod record;
mod chunk;
mod encoder;

// Public exports
pub use error::{EncodeError, Result};
pub use layout::Layout;
pub use record::{Record, write_terminator, LINE_END, RECORD_DATA_MAX, TERMINATOR};
pub use chunk::{Chunk, ChunkReader, Records};
pub use encoder::{encode, encode_bytes, EncodeSummary, HexEncoder};
