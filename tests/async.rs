use futures::io::BufReader;
use lzwcodec::{decode::Decoder, encode::Encoder, BitOrder};
use std::io::ErrorKind;
use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};

#[tokio::test]
async fn roundtrip_over_a_pipe() {
    let data: Vec<u8> = (0..100_000u32)
        .map(|i| (i % 251) as u8 ^ (i / 1000) as u8)
        .collect();
    let (client, server) = tokio::io::duplex(1 << 10);

    let input = data.clone();
    let writer = tokio::spawn(async move {
        let mut encoder = Encoder::new(BitOrder::Lsb, 8).unwrap();
        let result = encoder
            .into_async(client.compat_write())
            .encode_all(&input[..])
            .await;
        result.status.unwrap();
        result.bytes_read
    });

    let mut decoder = Decoder::new(BitOrder::Lsb, 8).unwrap();
    let mut decoded = vec![];
    let result = decoder
        .into_async(&mut decoded)
        .decode_all(BufReader::new(server.compat()))
        .await;

    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(writer.await.unwrap(), data.len());
    assert_eq!(decoded, data);
}

#[tokio::test]
async fn truncated_stream() {
    let mut compressed = vec![];
    let mut encoder = Encoder::new(BitOrder::Msb, 8).unwrap();
    let result = encoder
        .into_async(&mut compressed)
        .encode_all(&b"TOBEORNOTTOBEORTOBEORNOT"[..])
        .await;
    assert!(result.status.is_ok());

    let mut decoder = Decoder::new(BitOrder::Msb, 8).unwrap();
    let mut decoded = vec![];
    let result = decoder
        .into_async(&mut decoded)
        .decode_all(&compressed[..compressed.len() - 4])
        .await;
    assert_eq!(result.status.unwrap_err().kind(), ErrorKind::UnexpectedEof);
    assert!(b"TOBEORNOTTOBEORTOBEORNOT".starts_with(&decoded));
}

#[tokio::test]
async fn rejects_wide_bytes() {
    let mut compressed = vec![];
    let mut encoder = Encoder::new(BitOrder::Lsb, 4).unwrap();
    let result = encoder
        .into_async(&mut compressed)
        .encode_all(&[1u8, 2, 3, 0x20][..])
        .await;
    assert_eq!(result.status.unwrap_err().kind(), ErrorKind::InvalidData);
    assert_eq!(result.bytes_read, 3);
}
