#![no_main]
use libfuzzer_sys::fuzz_target;
use lzwcodec::{decode::Decoder, BitOrder};

fuzz_target!(|raw_data: &[u8]| {
    // The first byte picks the parameters, the rest is the stream.
    let (&head, stream) = match raw_data.split_first() {
        Some(split) => split,
        None => return,
    };

    let order = if head & 0x80 == 0 { BitOrder::Lsb } else { BitOrder::Msb };
    let size = 2 + (head & 0x7) % 7;
    let mut decoder = if head & 0x40 == 0 {
        Decoder::new(order, size).unwrap()
    } else {
        Decoder::with_tiff_size_switch(order, size).unwrap()
    };

    let _ = decoder.into_stream(std::io::sink()).decode_all(stream);
});
