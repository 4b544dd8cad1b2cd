use std::io::{self, Read};

use bytes::Bytes;
use futures_util::stream;

use crate::ByteStream;

/// Independent cursor over a buffered body.
///
/// Cheap to create: the bytes are shared, only the position is private.
#[derive(Debug, Clone, Default)]
pub struct BodyReader {
    data: Bytes,
    pos:  usize,
}

impl BodyReader {
    pub fn new(data: Bytes) -> Self { Self { data, pos: 0 } }

    /// Bytes not yet consumed by `read`.
    pub fn remaining(&self) -> &[u8] { &self.data[self.pos..] }

    /// The whole body, regardless of the cursor.
    pub fn to_bytes(&self) -> Bytes { self.data.clone() }

    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Turn the unread remainder into a single-chunk stream.
    pub fn into_stream(self) -> ByteStream {
        let rest = self.data.slice(self.pos..);
        Box::pin(stream::iter((!rest.is_empty()).then_some(Ok::<_, io::Error>(rest))))
    }
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = self.remaining();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}
