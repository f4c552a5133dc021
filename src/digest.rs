use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use md5::{Digest, Md5};

/// Incremental `Content-MD5` check over the raw body bytes.
pub(crate) struct ContentDigest {
    declared: String,
    hasher: Md5,
}

impl ContentDigest {
    pub(crate) fn new<D: Into<String>>(declared: D) -> ContentDigest {
        ContentDigest {
            declared: declared.into(),
            hasher: Md5::new(),
        }
    }

    pub(crate) fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Finalizes the hash and compares its base64 form with the declared value.
    pub(crate) fn verify(self) -> crate::Result<()> {
        let computed = STANDARD.encode(self.hasher.finalize());

        if computed == self.declared {
            Ok(())
        } else {
            Err(crate::Error::BadDigest {
                declared: self.declared,
                computed,
            })
        }
    }
}
