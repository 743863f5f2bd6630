use core::fmt;

/// The result of a coding operation on a pair of buffer.
#[must_use = "Contains a status with potential error information"]
#[derive(Debug)]
pub struct BufferResult {
    /// The number of bytes consumed from the input buffer.
    pub consumed_in: usize,
    /// The number of bytes written into the output buffer.
    pub consumed_out: usize,
    /// The status after returning from the write call.
    pub status: Result<LzwStatus, LzwError>,
}

/// The result of coding into an output stream.
#[cfg(feature = "std")]
#[must_use = "Contains a status with potential error information"]
#[derive(Debug)]
pub struct StreamResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: usize,
    /// The total number of bytes written into the writer.
    pub bytes_written: usize,
    /// The possible error that occurred.
    ///
    /// Note that when writing into streams it is not in general possible to recover from an
    /// error.
    pub status: std::io::Result<()>,
}

/// The result of coding into an output vector.
#[cfg(feature = "alloc")]
#[must_use = "Contains a status with potential error information"]
#[derive(Debug)]
pub struct VectorResult {
    /// The number of bytes consumed from the input buffer.
    pub consumed_in: usize,
    /// The number of bytes appended to the output vector.
    pub consumed_out: usize,
    /// The status after the last coding step.
    pub status: Result<LzwStatus, LzwError>,
}

/// The status after successful coding of an LZW stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzwStatus {
    /// Everything went well.
    Ok,
    /// No bytes were read or written and no internal state advanced.
    ///
    /// If this is returned but your application can not provide more input data then decoding is
    /// definitely stuck for good and it should stop trying and report some error of its own. In
    /// other situations this may be used as a signal to refill an internal buffer.
    NoProgress,
    /// No more data will be produced because an end marker was reached.
    Done,
}

/// The error kind after unsuccessful coding of an LZW stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzwError {
    /// The input contained an invalid code.
    ///
    /// For decompression this refers to a code larger than those currently known through the
    /// prior decoding stages, a dictionary code where a literal is required, or a missing clear
    /// code when one was required. For compression this refers to a byte that has no literal
    /// representation due to being larger than the literal width permits.
    InvalidCode,
}

/// A literal width outside of the supported range was requested.
///
/// Returned when constructing a decoder or encoder, before any data is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSizeError {
    pub(crate) size: u8,
}

impl CodeSizeError {
    /// The rejected literal width.
    pub fn size(&self) -> u8 {
        self.size
    }
}

impl fmt::Display for LzwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LzwError::InvalidCode => f.write_str("invalid code in LZW stream"),
        }
    }
}

impl fmt::Display for CodeSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "literal width {} is outside of the supported range {}..={}",
            self.size,
            crate::MIN_LITERAL_SIZE,
            crate::MAX_LITERAL_SIZE
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LzwError {}

#[cfg(feature = "std")]
impl std::error::Error for CodeSizeError {}

#[cfg(feature = "std")]
impl From<LzwError> for std::io::Error {
    fn from(err: LzwError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, err)
    }
}

#[cfg(feature = "std")]
pub(crate) fn unexpected_end() -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "No more data but no end marker detected",
    )
}
