//! Packing of variable width codes into bytes.
//!
//! Both directions keep up to 64 bits in a `u64`. The bit order is a type parameter so that the
//! decoder and encoder state machines get monomorphized once per order instead of branching on
//! every code.
use core::marker::PhantomData;

use crate::Code;

/// The bit order specific operations on a 64-bit buffer.
pub(crate) trait Packing {
    /// Place `code` of width `size` behind the `filled` bits already in the buffer.
    fn insert(buffer: &mut u64, filled: u8, code: Code, size: u8);
    /// Remove the first complete byte from the buffer.
    fn pop_byte(buffer: &mut u64) -> u8;
    /// Append up to eight bytes behind the `filled` bits already in the buffer.
    fn refill(buffer: &mut u64, filled: u8, bytes: [u8; 8]);
    /// Remove the first code of width `size` from the buffer.
    fn extract(buffer: &mut u64, size: u8) -> Code;
}

/// Most significant bit first, as used by TIFF and PDF.
pub(crate) struct Msb;

/// Least significant bit first, as used by GIF.
pub(crate) struct Lsb;

impl Packing for Msb {
    fn insert(buffer: &mut u64, filled: u8, code: Code, size: u8) {
        let shift = 64 - filled - size;
        *buffer |= u64::from(code) << shift;
    }

    fn pop_byte(buffer: &mut u64) -> u8 {
        let byte = (*buffer >> 56) as u8;
        *buffer <<= 8;
        byte
    }

    fn refill(buffer: &mut u64, filled: u8, bytes: [u8; 8]) {
        *buffer |= u64::from_be_bytes(bytes) >> filled;
    }

    fn extract(buffer: &mut u64, size: u8) -> Code {
        let mask = (1u64 << size) - 1;
        let rotated = buffer.rotate_left(size.into());
        *buffer = rotated & !mask;
        (rotated & mask) as Code
    }
}

impl Packing for Lsb {
    fn insert(buffer: &mut u64, filled: u8, code: Code, _: u8) {
        *buffer |= u64::from(code) << filled;
    }

    fn pop_byte(buffer: &mut u64) -> u8 {
        let byte = (*buffer & 0xff) as u8;
        *buffer >>= 8;
        byte
    }

    fn refill(buffer: &mut u64, filled: u8, bytes: [u8; 8]) {
        *buffer |= u64::from_le_bytes(bytes) << filled;
    }

    fn extract(buffer: &mut u64, size: u8) -> Code {
        let mask = (1u64 << size) - 1;
        let code = *buffer & mask;
        *buffer >>= size;
        code as Code
    }
}

/// Reads codes of the current code size from byte slices.
pub(crate) struct CodeReader<P> {
    code_size: u8,
    buffer: u64,
    bits: u8,
    order: PhantomData<P>,
}

/// Packs codes of the current code size into byte slices.
pub(crate) struct CodeWriter<P> {
    code_size: u8,
    buffer: u64,
    bits: u8,
    order: PhantomData<P>,
}

impl<P: Packing> CodeReader<P> {
    pub(crate) fn new(min_size: u8) -> Self {
        CodeReader {
            code_size: min_size + 1,
            buffer: 0,
            bits: 0,
            order: PhantomData,
        }
    }

    /// Return to the initial code size. Buffered bits are kept, they belong to the stream.
    pub(crate) fn reset(&mut self, min_size: u8) {
        self.code_size = min_size + 1;
    }

    /// Drop all buffered bits and return to the initial code size.
    pub(crate) fn clear(&mut self, min_size: u8) {
        self.reset(min_size);
        self.buffer = 0;
        self.bits = 0;
    }

    pub(crate) fn code_size(&self) -> u8 {
        self.code_size
    }

    pub(crate) fn bump_code_size(&mut self) {
        self.code_size += 1;
    }

    /// Get the next code, consuming input bytes only when the buffer runs short.
    ///
    /// Returns `None` when the remaining bits do not form a complete code. Those bits stay
    /// buffered so a later call with more input continues seamlessly.
    pub(crate) fn next_code(&mut self, inp: &mut &[u8]) -> Option<Code> {
        if self.bits < self.code_size {
            self.refill(inp);
        }

        if self.bits < self.code_size {
            return None;
        }

        let code = P::extract(&mut self.buffer, self.code_size);
        self.bits -= self.code_size;
        Some(code)
    }

    fn refill(&mut self, inp: &mut &[u8]) {
        let wish_count = usize::from((64 - self.bits) / 8);
        let count = wish_count.min(inp.len());
        let mut bytes = [0u8; 8];
        let (head, tail) = inp.split_at(count);
        bytes[..count].copy_from_slice(head);
        *inp = tail;

        P::refill(&mut self.buffer, self.bits, bytes);
        self.bits += (count * 8) as u8;
    }
}

impl<P: Packing> CodeWriter<P> {
    pub(crate) fn new(min_size: u8) -> Self {
        CodeWriter {
            code_size: min_size + 1,
            buffer: 0,
            bits: 0,
            order: PhantomData,
        }
    }

    pub(crate) fn reset(&mut self, min_size: u8) {
        self.code_size = min_size + 1;
    }

    /// Drop all pending bits and return to the initial code size.
    pub(crate) fn clear(&mut self, min_size: u8) {
        self.reset(min_size);
        self.buffer = 0;
        self.bits = 0;
    }

    pub(crate) fn code_size(&self) -> u8 {
        self.code_size
    }

    pub(crate) fn bump_code_size(&mut self) {
        self.code_size += 1;
    }

    /// The largest code representable with the current code size.
    pub(crate) fn max_code(&self) -> Code {
        (1 << self.code_size) - 1
    }

    /// Insert a code into the buffer.
    ///
    /// The caller must have made room with `push_out` beforehand.
    pub(crate) fn write_code(&mut self, code: Code) {
        debug_assert!(self.bits + self.code_size <= 64);
        P::insert(&mut self.buffer, self.bits, code, self.code_size);
        self.bits += self.code_size;
    }

    /// Make room for at least two more codes, returning if the output was too small for that.
    pub(crate) fn push_out(&mut self, out: &mut &mut [u8]) -> bool {
        if self.bits + 2 * self.code_size < 64 {
            return false;
        }

        self.flush_out(out)
    }

    /// Move all complete bytes into `out`, returning if at least one byte remains.
    pub(crate) fn flush_out(&mut self, out: &mut &mut [u8]) -> bool {
        let want = usize::from(self.bits / 8);
        let count = want.min(out.len());
        let (bytes, tail) = core::mem::take(out).split_at_mut(count);
        *out = tail;

        for b in bytes {
            *b = P::pop_byte(&mut self.buffer);
            self.bits -= 8;
        }

        count < want
    }

    /// Pad the buffer with zero bits to a full byte.
    pub(crate) fn pad(&mut self) {
        let to_byte = self.bits.wrapping_neg() & 0x7;
        self.bits += to_byte;
    }
}
