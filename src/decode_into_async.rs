use crate::decode::IntoAsync;
use crate::error::{unexpected_end, LzwStatus, StreamResult};
use futures::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

impl<'d, W: AsyncWrite + core::marker::Unpin> IntoAsync<'d, W> {
    /// Decode data from a reader.
    ///
    /// This will read data until the stream is empty or an end marker is reached.
    pub async fn decode(&mut self, read: impl AsyncBufRead) -> StreamResult {
        self.decode_part(read, false).await
    }

    /// Decode data from a reader, requiring an end marker.
    pub async fn decode_all(mut self, read: impl AsyncBufRead) -> StreamResult {
        self.decode_part(read, true).await
    }

    /// Set the size of the intermediate decode buffer.
    ///
    /// # Panics
    /// This method panics if `size` is `0`.
    pub fn set_buffer_size(&mut self, size: usize) {
        assert_ne!(size, 0, "Attempted to set empty buffer");
        self.buffer_size = size;
    }

    async fn decode_part(&mut self, read: impl AsyncBufRead, must_finish: bool) -> StreamResult {
        let IntoAsync {
            decoder,
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

            let at_eof = data.is_empty();
            let result = decoder.decode_bytes(data, &mut outbuf[..]);
            bytes_read += result.consumed_in;
            bytes_written += result.consumed_out;
            read.as_mut().consume(result.consumed_in);

            if let Err(err) = writer.write_all(&outbuf[..result.consumed_out]).await {
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

        if status.is_ok() {
            if let Err(err) = writer.flush().await {
                return StreamResult {
                    bytes_read,
                    bytes_written,
                    status: Err(err),
                };
            }
        }

        StreamResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}
