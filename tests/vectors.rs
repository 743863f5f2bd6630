//! Streams produced by other LZW implementations.
use lzwcodec::decode::{Configuration, Decoder, Reader};
use lzwcodec::{BitOrder, LzwError, LzwStatus};
use std::io::{ErrorKind, Read};

const TOBE: &[u8] = b"TOBEORNOTTOBEORTOBEORNOT";

fn decode_all(mut decoder: Decoder, stream: &[u8]) -> (Vec<u8>, Result<LzwStatus, LzwError>) {
    let mut decoded = vec![];
    let result = decoder.into_vec(&mut decoded).decode_all(stream);
    (decoded, result.status)
}

#[test]
fn tobe_lsb_8() {
    let stream = [
        0x54, 0x9e, 0x08, 0x29, 0xf2, 0x44, 0x8a, 0x93, 0x27, 0x54, 0x04, 0x12, 0x34, 0xb8, 0xb0,
        0xe0, 0xc1, 0x84, 0x01, 0x01,
    ];
    let decoder = Decoder::new(BitOrder::Lsb, 8).unwrap();
    assert_eq!(decode_all(decoder, &stream), (TOBE.to_vec(), Ok(LzwStatus::Done)));
}

#[test]
fn tobe_msb_8() {
    let stream = [
        0x2a, 0x13, 0xc8, 0x44, 0x52, 0x79, 0x48, 0x9c, 0x4f, 0x2a, 0x40, 0xa0, 0x90, 0x68, 0x5c,
        0x16, 0x0f, 0x09, 0x80, 0x80,
    ];
    let decoder = Decoder::new(BitOrder::Msb, 8).unwrap();
    assert_eq!(decode_all(decoder, &stream), (TOBE.to_vec(), Ok(LzwStatus::Done)));
}

#[test]
fn tobe_7_bit_literals() {
    // Eight bit codes throughout, so both bit orders agree.
    let stream = [
        0x54, 0x4f, 0x42, 0x45, 0x4f, 0x52, 0x4e, 0x4f, 0x54, 0x82, 0x84, 0x86, 0x8b, 0x85, 0x87,
        0x89, 0x81,
    ];
    for &order in &[BitOrder::Lsb, BitOrder::Msb] {
        let decoder = Decoder::new(order, 7).unwrap();
        assert_eq!(decode_all(decoder, &stream), (TOBE.to_vec(), Ok(LzwStatus::Done)));
    }
}

#[test]
fn missing_clear_code_on_demand() {
    let stream = [0x54, 0x4f, 0x42, 0x45, 0x81];
    let config = Configuration::new(BitOrder::Lsb, 7).unwrap();
    let decoder = config.with_clear_code_required(true).build();
    assert_eq!(decode_all(decoder, &stream), (vec![], Err(LzwError::InvalidCode)));
}

#[test]
fn gif_image_data() {
    let stream = [0x00, 0x51, 0xfc, 0x1b, 0x28, 0x70, 0xa0, 0xc1, 0x83, 0x01, 0x01];
    let expected = [
        0x28, 0xff, 0xff, 0xff, 0x28, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    ];
    let decoder = Decoder::new(BitOrder::Lsb, 8).unwrap();
    assert_eq!(decode_all(decoder, &stream), (expected.to_vec(), Ok(LzwStatus::Done)));
}

#[test]
fn pdf_reference_sample() {
    let stream = [0x80, 0x0b, 0x60, 0x50, 0x22, 0x0c, 0x0c, 0x85, 0x01];
    let decoder = Decoder::with_tiff_size_switch(BitOrder::Msb, 8).unwrap();
    assert_eq!(decode_all(decoder, &stream), (b"-----A---B".to_vec(), Ok(LzwStatus::Done)));
}

#[test]
fn only_an_end_code() {
    for &(order, stream) in &[(BitOrder::Lsb, [0x01, 0x01]), (BitOrder::Msb, [0x80, 0x80])] {
        let decoder = Decoder::new(order, 8).unwrap();
        assert_eq!(decode_all(decoder, &stream), (vec![], Ok(LzwStatus::Done)));
    }
}

#[test]
fn code_of_the_next_entry() {
    // Clear, 'a', then the code that is defined by this very step.
    let stream = [0x00, 0xc3, 0x08, 0x0c, 0x08];
    let decoder = Decoder::new(BitOrder::Lsb, 8).unwrap();
    assert_eq!(decode_all(decoder, &stream), (b"aaa".to_vec(), Ok(LzwStatus::Done)));
}

#[test]
fn code_beyond_the_table() {
    // Clear, 'A', then 300 while only 258 is known.
    let stream = [0x00, 0x83, 0xb0, 0x0c, 0x08];
    let decoder = Decoder::new(BitOrder::Lsb, 8).unwrap();
    assert_eq!(decode_all(decoder, &stream), (b"A".to_vec(), Err(LzwError::InvalidCode)));
}

#[test]
fn first_code_after_clear_is_not_a_literal() {
    let stream = [0x00, 0x05, 0x06, 0x04];
    let decoder = Decoder::new(BitOrder::Lsb, 8).unwrap();
    assert_eq!(decode_all(decoder, &stream), (vec![], Err(LzwError::InvalidCode)));
}

#[test]
fn truncated_stream_yields_prefix() {
    let stream = [0x54, 0x9e, 0x08, 0x29, 0xf2, 0x44, 0x8a, 0x93, 0x27, 0x54, 0x04];
    let mut reader = Reader::new(&stream[..], BitOrder::Lsb, 8).unwrap();
    let mut decoded = vec![];
    let err = reader.read_to_end(&mut decoded).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    assert_eq!(decoded, b"TOBEORNOT");
}

#[test]
fn invalid_code_through_reader() {
    let stream = [0x00, 0x83, 0xb0, 0x0c, 0x08];
    let mut reader = Reader::new(&stream[..], BitOrder::Lsb, 8).unwrap();
    let mut decoded = vec![];
    let err = reader.read_to_end(&mut decoded).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(decoded, b"A");
}

#[test]
fn stream_adapter_writes_before_failing() {
    let stream = [0x00, 0x83, 0xb0, 0x0c, 0x08];
    let mut decoder = Decoder::new(BitOrder::Lsb, 8).unwrap();
    let mut decoded = vec![];
    let result = decoder.into_stream(&mut decoded).decode_all(&stream[..]);
    assert_eq!(result.status.unwrap_err().kind(), ErrorKind::InvalidData);
    assert_eq!(result.bytes_written, 1);
    assert_eq!(decoded, b"A");
}

#[test]
fn literal_width_out_of_range() {
    for &size in &[0, 1, 9, 12] {
        let err = Decoder::new(BitOrder::Msb, size).err().unwrap();
        assert_eq!(err.size(), size);
    }
}
