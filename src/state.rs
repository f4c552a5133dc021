use crate::buffer::BodyCollector;
use crate::digest::ContentDigest;

/// Exclusively owned by one request while its body is being read.
pub(crate) struct RequestContext {
    pub(crate) collector: BodyCollector,
    pub(crate) digest: Option<ContentDigest>,
}

impl RequestContext {
    pub(crate) fn new(limit: Option<u64>, declared_digest: Option<String>) -> Self {
        RequestContext {
            collector: BodyCollector::new(limit),
            digest: declared_digest.map(ContentDigest::new),
        }
    }

    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.collector.push(chunk, self.digest.as_mut());
    }
}

/// Where a single request's body parsing stands. The context moves along with
/// the stage and is consumed when the outcome is produced.
pub(crate) enum Stage {
    Idle,
    Collecting(RequestContext),
    Finalizing(RequestContext),
    Done,
}
