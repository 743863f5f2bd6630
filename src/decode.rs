//! A module for all decoding needs.
use crate::alloc::{boxed::Box, vec::Vec};
use crate::bits::{CodeReader, Lsb, Msb, Packing};
use crate::error::{BufferResult, LzwError, LzwStatus, VectorResult};
use crate::{assert_code_size, BitOrder, Code, CodeSizeError, MAX_CODESIZE, MAX_ENTRIES};

#[cfg(feature = "std")]
use crate::error::{unexpected_end, StreamResult};
#[cfg(feature = "std")]
use std::io::{self, BufRead, Read, Write};

use log::{debug, trace, warn};

/// The default size of the intermediate buffer of stream adapters.
#[cfg(feature = "std")]
const STREAM_BUF_SIZE: usize = 1 << 16;

/// How much a vector grows per decoding step in `IntoVec`.
const VEC_CHUNK: usize = 1 << 12;

/// The state for decoding data with an LZW algorithm.
///
/// The same structure can be utilized with streams as well as your own buffers and driver logic.
/// It may even be possible to mix them if you are sufficiently careful not to lose or skip any
/// already decoded data in the process.
pub struct Decoder {
    state: Box<dyn Stateful + Send + 'static>,
}

/// The construction parameters of a [`Decoder`].
///
/// [`Decoder`]: struct.Decoder.html
#[derive(Clone, Debug)]
pub struct Configuration {
    order: BitOrder,
    size: u8,
    tiff: bool,
    clear_required: bool,
}

/// A decoding stream sink.
///
/// See [`Decoder::into_stream`] on how to create this type.
///
/// [`Decoder::into_stream`]: struct.Decoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
    buffer_size: usize,
}

/// An async decoding sink.
///
/// See [`Decoder::into_async`] on how to create this type.
///
/// [`Decoder::into_async`]: struct.Decoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    pub(crate) decoder: &'d mut Decoder,
    pub(crate) writer: W,
    pub(crate) buffer_size: usize,
}

/// A decoding sink into a vector.
///
/// See [`Decoder::into_vec`] on how to create this type.
///
/// [`Decoder::into_vec`]: struct.Decoder.html#method.into_vec
pub struct IntoVec<'d> {
    decoder: &'d mut Decoder,
    vector: &'d mut Vec<u8>,
}

/// Decompresses an LZW stream read from a source.
///
/// Decoded bytes are handed out as soon as they are available. When the source runs dry before
/// the end code, all bytes decoded up to that point are returned first and the following read
/// fails with [`io::ErrorKind::UnexpectedEof`].
///
/// [`io::ErrorKind::UnexpectedEof`]: https://doc.rust-lang.org/std/io/enum.ErrorKind.html
#[cfg(feature = "std")]
pub struct Reader<R> {
    decoder: Decoder,
    source: R,
}

trait Stateful {
    fn advance(&mut self, inp: &[u8], out: &mut [u8]) -> BufferResult;
    fn has_ended(&self) -> bool;
    /// Return to the state right after construction.
    fn reset(&mut self);
}

#[derive(Clone, Copy)]
struct Link {
    prev: Code,
    byte: u8,
}

/// The dictionary, one link per code.
///
/// Strings are never materialized in the table. Each entry refers to its prefix and only stores
/// the final byte, together with the length of the string it expands to.
struct Table {
    inner: Vec<Link>,
    depths: Vec<u16>,
}

/// The expansion of the most recent code, possibly not yet handed out completely.
struct Buffer {
    bytes: Box<[u8]>,
    read_mark: usize,
    write_mark: usize,
}

struct DecodeState<P> {
    /// The configured minimum code size.
    min_size: u8,
    /// The table of decoded codes.
    table: Table,
    /// The buffer of decoded data.
    buffer: Buffer,
    /// The previous code, `None` directly after the start or a clear code.
    last: Option<Code>,
    /// The code which the next table entry gets assigned.
    ///
    /// Only decreases on a clear code and never exceeds the largest 12-bit code. Once the table
    /// is full it stays at that value while no new entries are created.
    next_code: Code,
    /// Code to reset all tables.
    clear_code: Code,
    /// Code to signal the end of the stream.
    end_code: Code,
    /// Switch code sizes one entry early.
    is_tiff: bool,
    /// Whether the stream must begin with a clear code.
    clear_required: bool,
    /// No code has been seen yet and a clear code is required.
    awaiting_clear: bool,
    /// An end code was read.
    has_ended: bool,
    /// Errors are final, the stream can not be resynchronized.
    error: Option<LzwError>,
    /// Extracts codes from the input.
    reader: CodeReader<P>,
}

impl Configuration {
    /// Parameters for a decoder of GIF-style streams.
    ///
    /// The `size` is the literal width in bits and must be within `2..=8`.
    pub fn new(order: BitOrder, size: u8) -> Result<Self, CodeSizeError> {
        assert_code_size(size)?;
        Ok(Configuration {
            order,
            size,
            tiff: false,
            clear_required: false,
        })
    }

    /// Parameters for a decoder that switches code sizes one code early.
    ///
    /// This is the behaviour of TIFF and of PDF streams with `EarlyChange` set.
    pub fn with_tiff_size_switch(order: BitOrder, size: u8) -> Result<Self, CodeSizeError> {
        let mut config = Configuration::new(order, size)?;
        config.tiff = true;
        Ok(config)
    }

    /// Require the stream to begin with a clear code.
    ///
    /// By default a stream without a leading clear code is decoded as if it had one. With this
    /// option such a stream is rejected with [`LzwError::InvalidCode`].
    ///
    /// [`LzwError::InvalidCode`]: ../enum.LzwError.html#variant.InvalidCode
    pub fn with_clear_code_required(self, required: bool) -> Self {
        Configuration {
            clear_required: required,
            ..self
        }
    }

    /// Create a decoder with these parameters.
    pub fn build(self) -> Decoder {
        type Boxed = Box<dyn Stateful + Send + 'static>;
        let state = match self.order {
            BitOrder::Lsb => Box::new(DecodeState::<Lsb>::new(&self)) as Boxed,
            BitOrder::Msb => Box::new(DecodeState::<Msb>::new(&self)) as Boxed,
        };

        Decoder { state }
    }
}

impl Decoder {
    /// Create a new decoder with the specified bit order and literal width.
    ///
    /// The literal width must be within `2..=8`, otherwise an error is returned immediately.
    pub fn new(order: BitOrder, size: u8) -> Result<Self, CodeSizeError> {
        Ok(Configuration::new(order, size)?.build())
    }

    /// Create a TIFF compatible decoder with the specified bit order and literal width.
    ///
    /// The algorithm for dynamically increasing the code symbol bit width is compatible with the
    /// TIFF specification, which is a misinterpretation of the original algorithm for increasing
    /// the code size. It switches one symbol sooner.
    pub fn with_tiff_size_switch(order: BitOrder, size: u8) -> Result<Self, CodeSizeError> {
        Ok(Configuration::with_tiff_size_switch(order, size)?.build())
    }

    /// Decode some bytes from `inp` and write result to `out`.
    ///
    /// This will consume a prefix of the input buffer and write decoded output into a prefix of
    /// the output buffer. See the respective fields of the return value for the count of consumed
    /// and written bytes. For the next call You should have adjusted the inputs accordingly.
    ///
    /// The call will try to decode and write as many bytes of output as available. It will be
    /// much more optimized (and avoid intermediate buffering) if it is allowed to write a large
    /// contiguous chunk at once.
    ///
    /// Running out of input is not an error at this level. A status of `NoProgress` while no more
    /// input can be supplied means the stream was truncated before its end code.
    pub fn decode_bytes(&mut self, inp: &[u8], out: &mut [u8]) -> BufferResult {
        self.state.advance(inp, out)
    }

    /// Construct a decoder into a writer.
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            decoder: self,
            writer,
            buffer_size: STREAM_BUF_SIZE,
        }
    }

    /// Construct a decoder into an async writer.
    ///
    /// Input is pulled from an `AsyncBufRead` source, see the methods of [`IntoAsync`].
    ///
    /// [`IntoAsync`]: struct.IntoAsync.html
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::io::AsyncWrite + Unpin>(
        &mut self,
        writer: W,
    ) -> IntoAsync<'_, W> {
        IntoAsync {
            decoder: self,
            writer,
            buffer_size: STREAM_BUF_SIZE,
        }
    }

    /// Construct a decoder into a vector.
    ///
    /// All decoded data is appended and the vector is __not__ cleared.
    ///
    /// Compared to `into_stream` this interface allows a high-level access to decoding without
    /// requires the `std`-feature. Also, it can make full use of the extra buffer control that the
    /// special target exposes.
    pub fn into_vec<'lt>(&'lt mut self, vec: &'lt mut Vec<u8>) -> IntoVec<'lt> {
        IntoVec {
            decoder: self,
            vector: vec,
        }
    }

    /// Check if the decoding has finished.
    ///
    /// No more output is produced beyond the end code that marked the finish of the stream. The
    /// decoder may have read additional bytes, including padding bits beyond the last code word
    /// but also excess bytes provided.
    pub fn has_ended(&self) -> bool {
        self.state.has_ended()
    }

    /// Reset all internal state.
    ///
    /// This produces a decoder as if just constructed with `new` but taking slightly less work.
    /// In particular it will not deallocate any internal allocations. It will also avoid some
    /// duplicate setup work.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(feature = "std")]
impl<'d, W: Write> IntoStream<'d, W> {
    /// Decode data from a reader.
    ///
    /// This will read data until the stream is empty or an end marker is reached.
    pub fn decode(&mut self, read: impl BufRead) -> StreamResult {
        self.decode_part(read, false)
    }

    /// Decode data from a reader, requiring an end marker.
    ///
    /// If the reader runs out of data before the end marker, everything decoded so far is still
    /// written and the status is an `UnexpectedEof` error.
    pub fn decode_all(mut self, read: impl BufRead) -> StreamResult {
        self.decode_part(read, true)
    }

    /// Set the size of the intermediate decode buffer.
    ///
    /// A buffer of this size is allocated by each decoding call to hold one part of the decoded
    /// stream before it is written.
    ///
    /// # Panics
    /// This method panics if `size` is `0`.
    pub fn set_buffer_size(&mut self, size: usize) {
        assert_ne!(size, 0, "Attempted to set empty buffer");
        self.buffer_size = size;
    }

    fn decode_part(&mut self, mut read: impl BufRead, must_finish: bool) -> StreamResult {
        let IntoStream {
            decoder,
            writer,
            buffer_size,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut outbuf = vec![0; *buffer_size];

        let status = loop {
            let data = match read.fill_buf() {
                Ok(data) => data,
                Err(err) => break Err(err),
            };

            let at_eof = data.is_empty();
            let result = decoder.decode_bytes(data, &mut outbuf[..]);
            bytes_read += result.consumed_in;
            bytes_written += result.consumed_out;
            read.consume(result.consumed_in);

            // Deliver what was decoded before reporting any problem with the rest.
            if let Err(err) = writer.write_all(&outbuf[..result.consumed_out]) {
                break Err(err);
            }

            match result.status {
                Err(err) => break Err(err.into()),
                Ok(LzwStatus::Done) => break Ok(()),
                Ok(LzwStatus::NoProgress) if at_eof => {
                    break if must_finish {
                        Err(unexpected_end())
                    } else {
                        Ok(())
                    };
                }
                Ok(LzwStatus::NoProgress) | Ok(LzwStatus::Ok) => {}
            }
        };

        StreamResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

impl IntoVec<'_> {
    /// Decode data from a slice.
    pub fn decode(&mut self, read: &[u8]) -> VectorResult {
        self.decode_part(read, false)
    }

    /// Decode data from a slice, requiring an end marker.
    ///
    /// A status of `NoProgress` signals that the data ended before the end code. All data decoded
    /// up to that point has been appended nonetheless.
    pub fn decode_all(mut self, read: &[u8]) -> VectorResult {
        self.decode_part(read, true)
    }

    fn decode_part(&mut self, mut read: &[u8], must_finish: bool) -> VectorResult {
        let mut consumed_in = 0;
        let mut consumed_out = 0;

        let status = loop {
            let start = self.vector.len();
            self.vector.resize(start + VEC_CHUNK, 0);
            let result = self.decoder.decode_bytes(read, &mut self.vector[start..]);
            self.vector.truncate(start + result.consumed_out);

            read = &read[result.consumed_in..];
            consumed_in += result.consumed_in;
            consumed_out += result.consumed_out;

            match result.status {
                Err(err) => break Err(err),
                Ok(LzwStatus::Done) => break Ok(LzwStatus::Done),
                Ok(LzwStatus::NoProgress) => {
                    let progressed = consumed_in > 0 || consumed_out > 0;
                    break Ok(if must_finish || !progressed {
                        LzwStatus::NoProgress
                    } else {
                        LzwStatus::Ok
                    });
                }
                Ok(LzwStatus::Ok) => {}
            }
        };

        VectorResult {
            consumed_in,
            consumed_out,
            status,
        }
    }
}

#[cfg(feature = "std")]
impl<R: BufRead> Reader<R> {
    /// Create a reader decoding the stream in `source`.
    pub fn new(source: R, order: BitOrder, size: u8) -> Result<Self, CodeSizeError> {
        Ok(Reader::with_decoder(Decoder::new(order, size)?, source))
    }

    /// Create a reader from a configured decoder.
    pub fn with_decoder(decoder: Decoder, source: R) -> Self {
        Reader { decoder, source }
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Unwrap the underlying source.
    ///
    /// Bytes already pulled into the decoder's bit buffer are not returned to it.
    pub fn into_inner(self) -> R {
        self.source
    }
}

#[cfg(feature = "std")]
impl<R: BufRead> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let data = self.source.fill_buf()?;
            let at_eof = data.is_empty();
            let result = self.decoder.decode_bytes(data, buf);
            self.source.consume(result.consumed_in);

            match result.status {
                // The error is sticky, it is reported by the next call.
                Err(_) if result.consumed_out > 0 => return Ok(result.consumed_out),
                Err(err) => return Err(err.into()),
                Ok(LzwStatus::Done) => return Ok(result.consumed_out),
                Ok(_) if result.consumed_out > 0 => return Ok(result.consumed_out),
                Ok(LzwStatus::NoProgress) if at_eof => return Err(unexpected_end()),
                Ok(_) => {}
            }
        }
    }
}

impl<P: Packing> DecodeState<P> {
    fn new(config: &Configuration) -> Self {
        let min_size = config.size;
        let clear_code = 1 << min_size;
        let mut table = Table::new();
        table.init(min_size);

        DecodeState {
            min_size,
            table,
            buffer: Buffer::new(),
            last: None,
            next_code: clear_code + 2,
            clear_code,
            end_code: clear_code + 1,
            is_tiff: config.tiff,
            clear_required: config.clear_required,
            awaiting_clear: config.clear_required,
            has_ended: false,
            error: None,
            reader: CodeReader::new(min_size),
        }
    }

    fn reset_tables(&mut self) {
        self.reader.reset(self.min_size);
        self.next_code = self.end_code + 1;
        self.table.init(self.min_size);
        self.last = None;
    }

    /// Process one code, leaving its expansion in the buffer.
    fn next(&mut self, code: Code) -> Result<(), LzwError> {
        if code == self.clear_code {
            trace!("clear code, resetting the table to {} literals", self.clear_code);
            self.awaiting_clear = false;
            self.reset_tables();
            return Ok(());
        }

        if self.awaiting_clear {
            warn!("stream starts with code {} instead of a clear code", code);
            return Err(LzwError::InvalidCode);
        }

        if code == self.end_code {
            self.has_ended = true;
            return Ok(());
        }

        let first = match self.last {
            None if code < self.clear_code => self.buffer.reconstruct(&self.table, code),
            Some(_) if usize::from(code) < self.table.len() => {
                self.buffer.reconstruct(&self.table, code)
            }
            // The encoder used the entry it created with the previous code.
            Some(_) if code == self.next_code && !self.table.is_full() => {
                self.buffer.reconstruct_high()
            }
            _ => {
                warn!("invalid code {}, the next free code is {}", code, self.next_code);
                return Err(LzwError::InvalidCode);
            }
        };

        if let Some(prev) = self.last {
            if !self.table.is_full() {
                self.table.derive(prev, first);

                if self.table.is_full() {
                    debug!("code table is full, no new entries until the next clear code");
                } else {
                    self.next_code += 1;
                }

                let switch = (1usize << self.reader.code_size()) - usize::from(self.is_tiff);
                if self.table.len() == switch && self.reader.code_size() < MAX_CODESIZE {
                    self.reader.bump_code_size();
                    trace!("code size increased to {} bits", self.reader.code_size());
                }
            }
        }

        self.last = Some(code);
        Ok(())
    }
}

impl<P: Packing> Stateful for DecodeState<P> {
    fn advance(&mut self, mut inp: &[u8], mut out: &mut [u8]) -> BufferResult {
        if let Some(err) = self.error {
            return BufferResult {
                consumed_in: 0,
                consumed_out: 0,
                status: Err(err),
            };
        }

        let o_in = inp.len();
        let o_out = out.len();
        let mut codes_read = false;
        let mut status = Ok(LzwStatus::Ok);

        loop {
            self.buffer.drain_into(&mut out);
            if !self.buffer.is_empty() {
                // The output is full.
                break;
            }

            if self.has_ended {
                status = Ok(LzwStatus::Done);
                break;
            }

            let code = match self.reader.next_code(&mut inp) {
                Some(code) => code,
                None => break,
            };

            codes_read = true;
            if let Err(err) = self.next(code) {
                self.error = Some(err);
                status = Err(err);
                break;
            }
        }

        let consumed_in = o_in - inp.len();
        let consumed_out = o_out - out.len();

        if status == Ok(LzwStatus::Ok) && !codes_read && consumed_in == 0 && consumed_out == 0 {
            status = Ok(LzwStatus::NoProgress);
        }

        BufferResult {
            consumed_in,
            consumed_out,
            status,
        }
    }

    fn has_ended(&self) -> bool {
        self.has_ended
    }

    fn reset(&mut self) {
        self.reader.clear(self.min_size);
        self.reset_tables();
        self.buffer.clear();
        self.awaiting_clear = self.clear_required;
        self.has_ended = false;
        self.error = None;
    }
}

impl Buffer {
    fn new() -> Self {
        let mut bytes = Vec::new();
        bytes.resize(MAX_ENTRIES, 0u8);
        Buffer {
            bytes: bytes.into_boxed_slice(),
            read_mark: 0,
            write_mark: 0,
        }
    }

    fn clear(&mut self) {
        self.read_mark = 0;
        self.write_mark = 0;
    }

    fn is_empty(&self) -> bool {
        self.read_mark == self.write_mark
    }

    /// Expand a code that is in the table, returning its first byte.
    fn reconstruct(&mut self, table: &Table, code: Code) -> u8 {
        let depth = usize::from(table.depths[usize::from(code)]);
        let mut code_iter = code;
        for ch in self.bytes[..depth].iter_mut().rev() {
            let link = table.inner[usize::from(code_iter)];
            *ch = link.byte;
            code_iter = link.prev;
        }

        self.read_mark = 0;
        self.write_mark = depth;
        self.bytes[0]
    }

    /// Expand the code that is about to be created: the previous string and its first byte.
    ///
    /// Relies on the previous expansion still being in the buffer.
    fn reconstruct_high(&mut self) -> u8 {
        let first = self.bytes[0];
        self.bytes[self.write_mark] = first;
        self.write_mark += 1;
        self.read_mark = 0;
        first
    }

    fn drain_into(&mut self, out: &mut &mut [u8]) {
        let pending = &self.bytes[self.read_mark..self.write_mark];
        let count = pending.len().min(out.len());
        let (target, tail) = core::mem::take(out).split_at_mut(count);
        target.copy_from_slice(&pending[..count]);
        *out = tail;
        self.read_mark += count;
    }
}

impl Table {
    fn new() -> Self {
        Table {
            inner: Vec::with_capacity(MAX_ENTRIES),
            depths: Vec::with_capacity(MAX_ENTRIES),
        }
    }

    fn init(&mut self, min_size: u8) {
        self.inner.clear();
        self.depths.clear();
        for i in 0..(1u16 << min_size) {
            self.inner.push(Link { prev: 0, byte: i as u8 });
            self.depths.push(1);
        }
        // Clear code and end code never expand to anything.
        for _ in 0..2 {
            self.inner.push(Link { prev: 0, byte: 0 });
            self.depths.push(0);
        }
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_full(&self) -> bool {
        self.inner.len() >= MAX_ENTRIES
    }

    fn derive(&mut self, prev: Code, byte: u8) {
        let depth = self.depths[usize::from(prev)] + 1;
        self.inner.push(Link { prev, byte });
        self.depths.push(depth);
    }
}
