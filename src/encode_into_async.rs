use crate::encode::IntoAsync;
use crate::error::{LzwStatus, StreamResult};
use futures::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

impl<'d, W: AsyncWrite + core::marker::Unpin> IntoAsync<'d, W> {
    /// Encode data from a reader.
    ///
    /// This will drain the supplied reader. It will not encode an end marker after all data has
    /// been processed.
    pub async fn encode(&mut self, read: impl AsyncBufRead) -> StreamResult {
        self.encode_part(read, false).await
    }

    /// Encode data from a reader and an end marker.
    pub async fn encode_all(mut self, read: impl AsyncBufRead) -> StreamResult {
        self.encode_part(read, true).await
    }

    /// Set the size of the intermediate encode buffer.
    ///
    /// # Panics
    /// This method panics if `size` is `0`.
    pub fn set_buffer_size(&mut self, size: usize) {
        assert_ne!(size, 0, "Attempted to set empty buffer");
        self.buffer_size = size;
    }

    async fn encode_part(&mut self, read: impl AsyncBufRead, finish: bool) -> StreamResult {
        let IntoAsync {
            encoder,
            writer,
            buffer_size,
        } = self;

        futures::pin_mut!(read);
        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut outbuf = vec![0; *buffer_size];

        let status = loop {
            let data = match read.fill_buf().await {
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
            read.as_mut().consume(result.consumed_in);

            if let Err(err) = writer.write_all(&outbuf[..result.consumed_out]).await {
                break Err(err);
            }

            match result.status {
                Err(err) => break Err(err.into()),
                Ok(LzwStatus::Done) => break writer.flush().await,
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
