use bytes::{Bytes, BytesMut};
use encoding_rs::UTF_8;

use crate::digest::ContentDigest;

/// Accumulates the body chunks of one request under an optional size limit.
pub(crate) struct BodyCollector {
    pub(crate) buf: BytesMut,
    pub(crate) bytes_received: u64,
    pub(crate) limit: Option<u64>,
}

impl BodyCollector {
    pub(crate) fn new(limit: Option<u64>) -> Self {
        BodyCollector {
            buf: BytesMut::new(),
            bytes_received: 0,
            limit,
        }
    }

    pub(crate) fn is_exceeded(&self) -> bool {
        matches!(self.limit, Some(limit) if self.bytes_received > limit)
    }

    /// Counts the chunk and, while still under the limit, keeps it and feeds it
    /// to the digest.
    pub(crate) fn push(&mut self, chunk: &[u8], digest: Option<&mut ContentDigest>) {
        self.bytes_received = self.bytes_received.saturating_add(chunk.len() as u64);

        if self.is_exceeded() {
            // Nothing past this point will be decoded or verified.
            if !self.buf.is_empty() {
                self.buf = BytesMut::new();
            }
            return;
        }

        self.buf.extend_from_slice(chunk);

        if let Some(digest) = digest {
            digest.update(chunk);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub(crate) fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Decodes the body as UTF-8, replacing malformed sequences.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let (text, _, _) = UTF_8.decode(bytes);
    text.into_owned()
}
