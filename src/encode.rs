//! A module for all encoding needs.
use crate::alloc::{boxed::Box, vec::Vec};
use crate::bits::{CodeWriter, Lsb, Msb, Packing};
use crate::error::{BufferResult, LzwError, LzwStatus, VectorResult};
use crate::{assert_code_size, BitOrder, Code, CodeSizeError, MAX_CODESIZE, MAX_ENTRIES};

#[cfg(feature = "std")]
use crate::error::StreamResult;
#[cfg(feature = "std")]
use std::io::{self, BufRead, Write};

use log::{debug, trace};

/// The default size of the intermediate buffer of stream adapters.
#[cfg(feature = "std")]
const STREAM_BUF_SIZE: usize = 1 << 16;

/// How much a vector grows per encoding step in `IntoVec`.
const VEC_CHUNK: usize = 1 << 12;

/// The state for encoding data with an LZW algorithm.
///
/// The same structure can be utilized with streams as well as your own buffers and driver logic.
/// It may even be possible to mix them if you are sufficiently careful not to lose any written
/// data in the process.
pub struct Encoder {
    state: Box<dyn Stateful + Send + 'static>,
}

/// A encoding stream sink.
///
/// See [`Encoder::into_stream`] on how to create this type and more information.
///
/// [`Encoder::into_stream`]: struct.Encoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
    buffer_size: usize,
}

/// An async encoding sink.
///
/// See [`Encoder::into_async`] on how to create this type.
///
/// [`Encoder::into_async`]: struct.Encoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    pub(crate) encoder: &'d mut Encoder,
    pub(crate) writer: W,
    pub(crate) buffer_size: usize,
}

/// An encoding sink into a vector.
///
/// See [`Encoder::into_vec`] on how to create this type.
///
/// [`Encoder::into_vec`]: struct.Encoder.html#method.into_vec
pub struct IntoVec<'d> {
    encoder: &'d mut Encoder,
    vector: &'d mut Vec<u8>,
}

/// Compresses everything written to it into an inner writer.
///
/// The stream is completed by [`finish`], which writes the last pending code, the end code and
/// the final partial byte. Dropping the writer finishes the stream as well but has no way to
/// report errors.
///
/// [`finish`]: #method.finish
#[cfg(feature = "std")]
pub struct Writer<W: Write> {
    encoder: Encoder,
    inner: Option<W>,
    buffer: Vec<u8>,
}

trait Stateful {
    fn advance(&mut self, inp: &[u8], out: &mut [u8]) -> BufferResult;
    fn mark_ended(&mut self);
    fn reset(&mut self);
}

struct EncodeState<P> {
    /// The configured minimal code size.
    min_size: u8,
    /// The current encoding symbol tree.
    tree: Tree,
    /// If the caller has marked the input as complete.
    has_ended: bool,
    /// The code corresponding to the currently read characters.
    ///
    /// The clear code stands for the empty string, the end code for a finished stream.
    current_code: Code,
    /// The clear code for resetting the dictionary.
    clear_code: Code,
    /// Switch code sizes one entry early.
    is_tiff: bool,
    /// The bit buffer for encoding.
    writer: CodeWriter<P>,
}

/// Successors of every code.
///
/// Most codes have only a few successors. Those are kept in a short list that is searched
/// linearly. A node whose list overflows gets a dense map indexed by the next byte instead.
struct Tree {
    nodes: Vec<Node>,
    short: Vec<ShortList>,
    dense: Vec<DenseMap>,
}

#[derive(Clone, Copy)]
enum Node {
    Leaf,
    Short(u16),
    Dense(u16),
}

const SHORT: usize = 16;

/// Marks a byte without successor in a `DenseMap`.
const NO_CODE: Code = Code::MAX;

#[derive(Clone, Copy, Default)]
struct ShortList {
    codes: [Code; SHORT],
    bytes: [u8; SHORT],
    len: u8,
}

#[derive(Clone, Copy)]
struct DenseMap {
    next: [Code; 256],
}

impl Encoder {
    /// Create a new encoder with the specified bit order and literal width.
    ///
    /// The literal width must be within `2..=8`, otherwise an error is returned immediately. All
    /// input bytes must be representable with this many bits.
    pub fn new(order: BitOrder, size: u8) -> Result<Self, CodeSizeError> {
        Encoder::from_parts(order, size, false)
    }

    /// Create a TIFF compatible encoder with the specified bit order and literal width.
    ///
    /// The algorithm for dynamically increasing the code symbol bit width is compatible with the
    /// TIFF specification, which is a misinterpretation of the original algorithm for increasing
    /// the code size. It switches one symbol sooner.
    pub fn with_tiff_size_switch(order: BitOrder, size: u8) -> Result<Self, CodeSizeError> {
        Encoder::from_parts(order, size, true)
    }

    fn from_parts(order: BitOrder, size: u8, tiff: bool) -> Result<Self, CodeSizeError> {
        assert_code_size(size)?;
        type Boxed = Box<dyn Stateful + Send + 'static>;
        let state = match order {
            BitOrder::Lsb => Box::new(EncodeState::<Lsb>::new(size, tiff)) as Boxed,
            BitOrder::Msb => Box::new(EncodeState::<Msb>::new(size, tiff)) as Boxed,
        };

        Ok(Encoder { state })
    }

    /// Encode some bytes from `inp` into `out`.
    ///
    /// See [`into_stream`] for high-level functions (this interface is only available with the
    /// `std` feature) and [`finish`] for marking the input data as complete.
    ///
    /// When some input byte is invalid, i.e. is not smaller than `1 << size`, then that byte and
    /// all following ones will _not_ be consumed and the `status` of the result will signal an
    /// error. The result will also indicate that all bytes up to but not including the offending
    /// byte have been consumed. You may try again with a fixed byte.
    ///
    /// [`into_stream`]: #method.into_stream
    /// [`finish`]: #method.finish
    pub fn encode_bytes(&mut self, inp: &[u8], out: &mut [u8]) -> BufferResult {
        self.state.advance(inp, out)
    }

    /// Construct an encoder into a writer.
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            encoder: self,
            writer,
            buffer_size: STREAM_BUF_SIZE,
        }
    }

    /// Construct an encoder into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::io::AsyncWrite + Unpin>(
        &mut self,
        writer: W,
    ) -> IntoAsync<'_, W> {
        IntoAsync {
            encoder: self,
            writer,
            buffer_size: STREAM_BUF_SIZE,
        }
    }

    /// Construct an encoder into a vector.
    ///
    /// All encoded data is appended and the vector is __not__ cleared.
    pub fn into_vec<'lt>(&'lt mut self, vec: &'lt mut Vec<u8>) -> IntoVec<'lt> {
        IntoVec {
            encoder: self,
            vector: vec,
        }
    }

    /// Mark the encoding as finished.
    ///
    /// In following calls to `encode_bytes` the encoder will try to emit an end code after
    /// encoding all of `inp`. It's not recommended, but also not unsound, to use different byte
    /// slices in different calls from this point forward. Input supplied after the end code has
    /// been written is not consumed.
    pub fn finish(&mut self) {
        self.state.mark_ended();
    }

    /// Reset all internal state.
    ///
    /// This produces an encoder as if just constructed with `new`. Any data that was not yet
    /// written to an output buffer is discarded.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(feature = "std")]
impl<W: Write> IntoStream<'_, W> {
    /// Encode data from a reader.
    ///
    /// This will drain the supplied reader. It will not encode an end marker after all data has
    /// been processed, and some bits of the last codes may still be held back by the encoder.
    pub fn encode(&mut self, read: impl BufRead) -> StreamResult {
        self.encode_part(read, false)
    }

    /// Encode data from a reader and an end marker.
    pub fn encode_all(mut self, read: impl BufRead) -> StreamResult {
        self.encode_part(read, true)
    }

    /// Set the size of the intermediate encode buffer.
    ///
    /// # Panics
    /// This method panics if `size` is `0`.
    pub fn set_buffer_size(&mut self, size: usize) {
        assert_ne!(size, 0, "Attempted to set empty buffer");
        self.buffer_size = size;
    }

    fn encode_part(&mut self, mut read: impl BufRead, finish: bool) -> StreamResult {
        let IntoStream {
            encoder,
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

            if data.is_empty() {
                if finish {
                    encoder.finish();
                } else {
                    break Ok(());
                }
            }

            let result = encoder.encode_bytes(data, &mut outbuf[..]);
            bytes_read += result.consumed_in;
            bytes_written += result.consumed_out;
            read.consume(result.consumed_in);

            if let Err(err) = writer.write_all(&outbuf[..result.consumed_out]) {
                break Err(err);
            }

            match result.status {
                Err(err) => break Err(err.into()),
                Ok(LzwStatus::Done) => break Ok(()),
                Ok(LzwStatus::Ok) | Ok(LzwStatus::NoProgress) => {}
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
    /// Encode data from a slice.
    ///
    /// Does not write an end marker, so the encoder may hold back bits of the last codes.
    pub fn encode(&mut self, read: &[u8]) -> VectorResult {
        self.encode_part(read, false)
    }

    /// Encode data from a slice and an end marker.
    pub fn encode_all(mut self, read: &[u8]) -> VectorResult {
        self.encode_part(read, true)
    }

    fn encode_part(&mut self, mut read: &[u8], finish: bool) -> VectorResult {
        if finish {
            self.encoder.finish();
        }

        let mut consumed_in = 0;
        let mut consumed_out = 0;

        let status = loop {
            let start = self.vector.len();
            self.vector.resize(start + VEC_CHUNK, 0);
            let result = self.encoder.encode_bytes(read, &mut self.vector[start..]);
            self.vector.truncate(start + result.consumed_out);

            read = &read[result.consumed_in..];
            consumed_in += result.consumed_in;
            consumed_out += result.consumed_out;

            match result.status {
                Err(err) => break Err(err),
                Ok(LzwStatus::Done) => break Ok(LzwStatus::Done),
                Ok(status) if read.is_empty() && !finish => break Ok(status),
                Ok(_) => {}
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
impl<W: Write> Writer<W> {
    /// Create a writer compressing into `inner`.
    pub fn new(inner: W, order: BitOrder, size: u8) -> Result<Self, CodeSizeError> {
        Ok(Writer::with_encoder(Encoder::new(order, size)?, inner))
    }

    /// Create a writer from a configured encoder.
    pub fn with_encoder(encoder: Encoder, inner: W) -> Self {
        Writer {
            encoder,
            inner: Some(inner),
            buffer: vec![0; 1 << 12],
        }
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    /// Complete the stream and return the underlying writer.
    ///
    /// Writes the pending code, the end code and pads the last byte with zero bits.
    pub fn finish(mut self) -> io::Result<W> {
        self.write_end()?;
        self.inner.take().ok_or_else(finished)
    }

    fn write_end(&mut self) -> io::Result<()> {
        let inner = match self.inner.as_mut() {
            Some(inner) => inner,
            None => return Ok(()),
        };

        self.encoder.finish();
        loop {
            let result = self.encoder.encode_bytes(&[], &mut self.buffer);
            inner.write_all(&self.buffer[..result.consumed_out])?;
            if let LzwStatus::Done = result.status? {
                break;
            }
        }

        inner.flush()
    }
}

#[cfg(feature = "std")]
impl<W: Write> Write for Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let inner = self.inner.as_mut().ok_or_else(finished)?;
        loop {
            let result = self.encoder.encode_bytes(buf, &mut self.buffer);
            inner.write_all(&self.buffer[..result.consumed_out])?;
            match result.status {
                // The rejected byte stays unconsumed and fails the next call.
                Err(_) if result.consumed_in > 0 => return Ok(result.consumed_in),
                Err(err) => return Err(err.into()),
                Ok(_) if result.consumed_in > 0 => return Ok(result.consumed_in),
                Ok(_) => {}
            }
        }
    }

    /// Flush the inner writer.
    ///
    /// Codes are only byte aligned at the end of the stream, so up to a few bytes of compressed
    /// data stay with the encoder until [`finish`](#method.finish).
    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(feature = "std")]
impl<W: Write> Drop for Writer<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.write_end();
        }
    }
}

#[cfg(feature = "std")]
fn finished() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "the LZW stream was already finished")
}

impl<P: Packing> EncodeState<P> {
    fn new(min_size: u8, is_tiff: bool) -> Self {
        let clear_code = 1 << min_size;
        let mut tree = Tree::new();
        tree.reset(min_size);
        let mut state = EncodeState {
            min_size,
            tree,
            has_ended: false,
            current_code: clear_code,
            clear_code,
            is_tiff,
            writer: CodeWriter::new(min_size),
        };
        state.writer.write_code(clear_code);
        state
    }

    fn end_code(&self) -> Code {
        self.clear_code + 1
    }

    /// The table size at which the decoder will have switched to the next code size.
    fn size_switch(&self) -> usize {
        usize::from(self.writer.max_code()) + 1 - usize::from(self.is_tiff)
    }

    fn grow_code_size(&mut self, entries: usize) {
        if entries > self.size_switch() && self.writer.code_size() < MAX_CODESIZE {
            self.writer.bump_code_size();
            trace!("code size increased to {} bits", self.writer.code_size());
        }
    }

    fn write_end(&mut self) {
        if self.current_code != self.clear_code {
            self.writer.write_code(self.current_code);
            // When reading this code, the decoder will add an extra entry to its table before
            // reading the end code. Thusly, it may increase its code size based on this
            // additional entry.
            self.grow_code_size(self.tree.len() + 1);
        }

        let end = self.end_code();
        self.writer.write_code(end);
        self.writer.pad();
        self.current_code = end;
    }
}

impl<P: Packing> Stateful for EncodeState<P> {
    fn advance(&mut self, mut inp: &[u8], mut out: &mut [u8]) -> BufferResult {
        let c_in = inp.len();
        let c_out = out.len();
        let mut status = Ok(LzwStatus::Ok);

        'encoding: loop {
            if self.writer.push_out(&mut out) {
                break;
            }

            if self.current_code == self.end_code() {
                break;
            }

            if inp.is_empty() {
                if self.has_ended {
                    self.write_end();
                }
                break;
            }

            let mut next_code = None;
            let mut bytes = inp.iter();
            while let Some(&byte) = bytes.next() {
                if self.min_size < 8 && byte >= 1 << self.min_size {
                    status = Err(LzwError::InvalidCode);
                    break 'encoding;
                }

                inp = bytes.as_slice();
                match self.tree.iterate(self.current_code, byte) {
                    Ok(code) => self.current_code = code,
                    Err(_) => {
                        next_code = Some(self.current_code);
                        self.current_code = u16::from(byte);
                        break;
                    }
                }
            }

            let code = match next_code {
                // All input is part of the current match, the end code may still be due.
                None => continue,
                Some(code) => code,
            };

            self.writer.write_code(code);
            self.grow_code_size(self.tree.len());

            if self.tree.len() > MAX_ENTRIES {
                debug!("code table exhausted, emitting a clear code");
                self.writer.write_code(self.clear_code);
                self.tree.reset(self.min_size);
                self.writer.reset(self.min_size);
            }
        }

        if self.current_code == self.end_code() && !self.writer.flush_out(&mut out) {
            status = Ok(LzwStatus::Done);
        }

        let consumed_in = c_in - inp.len();
        let consumed_out = c_out - out.len();

        if status == Ok(LzwStatus::Ok) && !self.has_ended && consumed_in == 0 && consumed_out == 0
        {
            status = Ok(LzwStatus::NoProgress);
        }

        BufferResult {
            consumed_in,
            consumed_out,
            status,
        }
    }

    fn mark_ended(&mut self) {
        self.has_ended = true;
    }

    fn reset(&mut self) {
        self.tree.reset(self.min_size);
        self.writer.clear(self.min_size);
        self.has_ended = false;
        self.current_code = self.clear_code;
        self.writer.write_code(self.clear_code);
    }
}

impl Tree {
    fn new() -> Self {
        Tree {
            nodes: Vec::with_capacity(MAX_ENTRIES + 1),
            short: Vec::new(),
            dense: Vec::new(),
        }
    }

    /// Forget all strings but the literals.
    ///
    /// The clear code stands for the empty string, its successors are exactly the literals.
    fn reset(&mut self, min_size: u8) {
        let clear_code = 1usize << min_size;
        self.short.clear();
        self.nodes.clear();
        self.nodes.resize(clear_code + 2, Node::Leaf);

        if self.dense.is_empty() {
            let mut literals = DenseMap::empty();
            for (code, next) in literals.next.iter_mut().enumerate() {
                *next = code as Code;
            }
            self.dense.push(literals);
        } else {
            self.dense.truncate(1);
        }
        self.nodes[clear_code] = Node::Dense(0);
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn at_key(&self, code: Code, byte: u8) -> Option<Code> {
        match self.nodes[usize::from(code)] {
            Node::Leaf => None,
            Node::Short(idx) => self.short[usize::from(idx)].find(byte),
            Node::Dense(idx) => {
                let next = self.dense[usize::from(idx)].next[usize::from(byte)];
                if next == NO_CODE {
                    None
                } else {
                    Some(next)
                }
            }
        }
    }

    /// Iterate to the next byte.
    ///
    /// Return `Ok` when the extended string was already in the tree. Otherwise create a new entry
    /// for it and return its code as `Err`.
    fn iterate(&mut self, code: Code, byte: u8) -> Result<Code, Code> {
        match self.at_key(code, byte) {
            Some(next) => Ok(next),
            None => Err(self.append(code, byte)),
        }
    }

    fn append(&mut self, code: Code, byte: u8) -> Code {
        let next = self.nodes.len() as Code;
        let node = &mut self.nodes[usize::from(code)];
        match *node {
            Node::Leaf => {
                let mut list = ShortList::default();
                list.push(byte, next);
                *node = Node::Short(self.short.len() as u16);
                self.short.push(list);
            }
            Node::Short(idx) if usize::from(self.short[usize::from(idx)].len) < SHORT => {
                self.short[usize::from(idx)].push(byte, next);
            }
            Node::Short(idx) => {
                let mut map = DenseMap::empty();
                let list = &self.short[usize::from(idx)];
                for (&b, &c) in list.bytes.iter().zip(list.codes.iter()) {
                    map.next[usize::from(b)] = c;
                }
                map.next[usize::from(byte)] = next;
                *node = Node::Dense(self.dense.len() as u16);
                self.dense.push(map);
            }
            Node::Dense(idx) => {
                self.dense[usize::from(idx)].next[usize::from(byte)] = next;
            }
        }

        self.nodes.push(Node::Leaf);
        next
    }
}

impl ShortList {
    fn find(&self, byte: u8) -> Option<Code> {
        let len = usize::from(self.len);
        self.bytes[..len]
            .iter()
            .position(|&b| b == byte)
            .map(|idx| self.codes[idx])
    }

    fn push(&mut self, byte: u8, code: Code) {
        let idx = usize::from(self.len);
        self.bytes[idx] = byte;
        self.codes[idx] = code;
        self.len += 1;
    }
}

impl DenseMap {
    fn empty() -> Self {
        DenseMap {
            next: [NO_CODE; 256],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BitOrder, Encoder, LzwError};
    use crate::decode::Decoder;
    use crate::LzwStatus;

    #[test]
    fn invalid_input_rejected() {
        const BIT_LEN: u8 = 2;
        let input = [0, 1 << BIT_LEN /* invalid */, 0];
        let mut target = [0u8; 128];
        let mut encoder = Encoder::new(BitOrder::Msb, BIT_LEN).unwrap();

        encoder.finish();
        // We require simulation of normality, that is byte-for-byte compression.
        let result = encoder.encode_bytes(&input, &mut target);
        assert_eq!(result.status, Err(LzwError::InvalidCode));
        assert_eq!(result.consumed_in, 1);
    }

    #[test]
    fn rejects_literal_width() {
        assert!(Encoder::new(BitOrder::Msb, 0).is_err());
        assert!(Encoder::new(BitOrder::Lsb, 1).is_err());
        assert!(Encoder::with_tiff_size_switch(BitOrder::Lsb, 9).is_err());
    }

    #[test]
    fn empty_input_is_clear_and_end() {
        let cases: [(BitOrder, &[u8]); 2] = [
            (BitOrder::Lsb, &[0x00, 0x03, 0x02]),
            (BitOrder::Msb, &[0x80, 0x40, 0x40]),
        ];

        for &(order, expected) in &cases {
            let mut encoder = Encoder::new(order, 8).unwrap();
            encoder.finish();
            let mut out = [0u8; 8];
            let result = encoder.encode_bytes(&[], &mut out);
            assert_eq!(result.status, Ok(LzwStatus::Done));
            assert_eq!(&out[..result.consumed_out], expected);
        }
    }

    #[test]
    fn tobe_lsb_8() {
        let expected = [
            0x00, 0xa9, 0x3c, 0x11, 0x52, 0xe4, 0x89, 0x14, 0x27, 0x4f, 0xa8, 0x08, 0x24, 0x68,
            0x70, 0x61, 0xc1, 0x83, 0x09, 0x03, 0x02,
        ];
        let mut encoder = Encoder::new(BitOrder::Lsb, 8).unwrap();
        encoder.finish();
        let mut out = [0u8; 64];
        let result = encoder.encode_bytes(b"TOBEORNOTTOBEORTOBEORNOT", &mut out);
        assert_eq!(result.status, Ok(LzwStatus::Done));
        assert_eq!(result.consumed_in, 24);
        assert_eq!(&out[..result.consumed_out], &expected[..]);
    }

    #[test]
    fn finish_when_input_ends_inside_a_match() {
        for &order in &[BitOrder::Lsb, BitOrder::Msb] {
            // The final "ab" is already in the table when the input runs out.
            let mut encoder = Encoder::new(order, 8).unwrap();
            encoder.finish();
            let mut compressed = [0u8; 64];
            let result = encoder.encode_bytes(b"abab", &mut compressed);
            assert_eq!(result.status, Ok(LzwStatus::Done));
            assert_eq!(result.consumed_in, 4);

            let mut decoder = Decoder::new(order, 8).unwrap();
            let mut decoded = [0u8; 16];
            let back = decoder.decode_bytes(&compressed[..result.consumed_out], &mut decoded);
            assert_eq!(back.status, Ok(LzwStatus::Done));
            assert_eq!(&decoded[..back.consumed_out], b"abab");
        }
    }

    #[test]
    fn many_successors_of_one_string() {
        // The string "a" gets more successors than fit into a short list.
        let mut input = [0u8; 120];
        for (i, pair) in input.chunks_mut(2).enumerate() {
            pair[0] = b'a';
            pair[1] = i as u8;
        }

        let mut encoder = Encoder::new(BitOrder::Lsb, 8).unwrap();
        encoder.finish();
        let mut compressed = [0u8; 256];
        let result = encoder.encode_bytes(&input, &mut compressed);
        assert_eq!(result.status, Ok(LzwStatus::Done));

        let mut decoder = Decoder::new(BitOrder::Lsb, 8).unwrap();
        let mut decoded = [0u8; 256];
        let back = decoder.decode_bytes(&compressed[..result.consumed_out], &mut decoded);
        assert_eq!(back.status, Ok(LzwStatus::Done));
        assert_eq!(&decoded[..back.consumed_out], &input[..]);
    }

    #[test]
    fn reset_starts_a_new_stream() {
        let mut encoder = Encoder::new(BitOrder::Msb, 8).unwrap();
        let mut out = [0u8; 64];
        let _ = encoder.encode_bytes(b"garbage", &mut out);

        encoder.reset();
        encoder.finish();
        let result = encoder.encode_bytes(&[], &mut out);
        assert_eq!(result.status, Ok(LzwStatus::Done));
        assert_eq!(&out[..result.consumed_out], &[0x80, 0x40, 0x40]);
    }

    #[test]
    fn small_output_buffers() {
        let mut encoder = Encoder::new(BitOrder::Lsb, 8).unwrap();
        encoder.finish();
        let mut inp = &b"TOBEORNOTTOBEORTOBEORNOT"[..];
        let mut collected = [0u8; 64];
        let mut written = 0;

        loop {
            let mut out = [0u8; 1];
            let result = encoder.encode_bytes(inp, &mut out);
            inp = &inp[result.consumed_in..];
            collected[written..written + result.consumed_out]
                .copy_from_slice(&out[..result.consumed_out]);
            written += result.consumed_out;
            if let Ok(LzwStatus::Done) = result.status {
                break;
            }
        }

        assert_eq!(written, 21);
        assert_eq!(&collected[..3], &[0x00, 0xa9, 0x3c]);
    }
}
