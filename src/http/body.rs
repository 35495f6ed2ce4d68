//! Response body module
//!
//! Every response carries a boxed body: small in-memory payloads for pages
//! and errors, or a file streamed from disk in fixed-size chunks.

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::{Body, Bytes, Frame, SizeHint};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

/// Body type shared by every response the server builds
pub type ResponseBody = BoxBody<Bytes, io::Error>;

/// Bytes read from disk per frame
const CHUNK_SIZE: usize = 64 * 1024;

/// In-memory body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// Stream the next `len` bytes of an open file
pub fn file(file: File, len: u64) -> ResponseBody {
    FileBody {
        file,
        remaining: len,
    }
    .boxed()
}

/// Streams a file without holding more than one chunk in memory
struct FileBody {
    file: File,
    remaining: u64,
}

impl Body for FileBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        if this.remaining == 0 {
            return Poll::Ready(None);
        }

        let len = usize::try_from(this.remaining).map_or(CHUNK_SIZE, |r| r.min(CHUNK_SIZE));
        let mut chunk = vec![0u8; len];
        let mut buf = ReadBuf::new(&mut chunk);

        match Pin::new(&mut this.file).poll_read(cx, &mut buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Ready(Ok(())) => {
                let filled = buf.filled().len();
                if filled == 0 {
                    // Content-Length was already sent; a short file can't be recovered
                    this.remaining = 0;
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "file shrank while being sent",
                    ))));
                }
                chunk.truncate(filled);
                this.remaining -= filled as u64;
                Poll::Ready(Some(Ok(Frame::data(Bytes::from(chunk)))))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_body_streams_in_chunks() {
        let path = std::env::temp_dir().join(format!("devserve-body-{}", std::process::id()));
        let content: Vec<u8> = (0..CHUNK_SIZE * 2 + 10).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        let file = File::open(&path).await.unwrap();
        let mut body = FileBody {
            file,
            remaining: content.len() as u64,
        };
        assert_eq!(body.size_hint().exact(), Some(content.len() as u64));

        let mut frames = 0;
        let mut received = Vec::new();
        while let Some(frame) = body.frame().await {
            let data = frame.unwrap().into_data().unwrap();
            assert!(data.len() <= CHUNK_SIZE);
            received.extend_from_slice(&data);
            frames += 1;
        }
        assert_eq!(frames, 3);
        assert_eq!(received, content);
        assert!(body.is_end_stream());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_file_body_reports_truncation() {
        let path = std::env::temp_dir().join(format!("devserve-body-short-{}", std::process::id()));
        std::fs::write(&path, b"abc").unwrap();

        let file = File::open(&path).await.unwrap();
        let collected = self::file(file, 10).collect().await;
        assert!(collected.is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_full_and_empty() {
        let bytes = full("hello").collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"hello");
        assert_eq!(empty().size_hint().exact(), Some(0));
    }
}
