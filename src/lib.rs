//! # LZW decoder and encoder
//!
//! This crate provides an LZW `Encoder` and `Decoder` for the variable-width flavour used by
//! GIF, TIFF and PDF. Code words are read from and written to bit streams where either the most
//! or the least significant bit of each byte comes first. The maximum code size is 12 bits.
//!
//! The code table has a fixed layout, determined by the literal width `size` (2 to 8 bits):
//!
//!  * `CLEAR_CODE == 1 << size`
//!  * `END_CODE   == CLEAR_CODE + 1`
//!  * dictionary codes start at `END_CODE + 1`
//!
//! The encoder always starts its stream with a clear code and ends it with an end code. The
//! decoder accepts streams without a leading clear code unless configured otherwise.
//!
//! Exemplary use of the encoder:
//!
//! ```
//! use lzwcodec::{BitOrder, encode::Encoder};
//! let size = 8;
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//! let mut compressed = vec![];
//!
//! let mut enc = Encoder::new(BitOrder::Msb, size).unwrap();
//! let result = enc.into_stream(&mut compressed).encode_all(&data[..]);
//! result.status.unwrap();
//! ```
//!
//! And the matching decoder:
//!
//! ```
//! use lzwcodec::{BitOrder, decode::Decoder};
//! let compressed = [
//!     0x54, 0x9e, 0x08, 0x29, 0xf2, 0x44, 0x8a, 0x93, 0x27, 0x54,
//!     0x04, 0x12, 0x34, 0xb8, 0xb0, 0xe0, 0xc1, 0x84, 0x01, 0x01,
//! ];
//! let mut decoded = vec![];
//!
//! let mut dec = Decoder::new(BitOrder::Lsb, 8).unwrap();
//! let result = dec.into_vec(&mut decoded).decode_all(&compressed[..]);
//! result.status.unwrap();
//! assert_eq!(decoded, b"TOBEORNOTTOBEORTOBEORNOT");
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;
#[cfg(all(feature = "alloc", feature = "std"))]
use std as alloc;

#[cfg(feature = "alloc")]
pub(crate) const MAX_CODESIZE: u8 = 12;
#[cfg(feature = "alloc")]
pub(crate) const MAX_ENTRIES: usize = 1 << MAX_CODESIZE as usize;

/// Smallest supported literal width.
pub const MIN_LITERAL_SIZE: u8 = 2;
/// Largest supported literal width.
pub const MAX_LITERAL_SIZE: u8 = 8;

/// Alias for a LZW code point
#[cfg(feature = "alloc")]
pub(crate) type Code = u16;

/// The order of bits in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitOrder {
    /// The most significant bit is processed first.
    Msb,
    /// The least significant bit is processed first.
    Lsb,
}

#[cfg(feature = "alloc")]
pub(crate) fn assert_code_size(size: u8) -> Result<(), CodeSizeError> {
    if (MIN_LITERAL_SIZE..=MAX_LITERAL_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(CodeSizeError { size })
    }
}

#[cfg(feature = "alloc")]
mod bits;
#[cfg(feature = "alloc")]
pub mod decode;
#[cfg(feature = "alloc")]
pub mod encode;
mod error;

#[cfg(feature = "async")]
mod decode_into_async;
#[cfg(feature = "async")]
mod encode_into_async;

#[cfg(feature = "std")]
pub use self::error::StreamResult;
#[cfg(feature = "alloc")]
pub use self::error::VectorResult;
pub use self::error::{BufferResult, CodeSizeError, LzwError, LzwStatus};
