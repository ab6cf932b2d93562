use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// Typed access on top of the byte-level [`CacheBucket`].
///
/// Blanket-implemented for every bucket, so [`CacheBucket`] stays
/// object-safe and free of serde.
pub trait CacheBucketExt: CacheBucket {
    /// JSON-decoded entry. A value that no longer decodes counts as a miss.
    fn get_json<T: DeserializeOwned>(&self, key: &str, etag: &str) -> Option<T> {
        let bytes = self.get(key, etag)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, etag: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.set(key, etag, &bytes),
            Err(e) => tracing::warn!(key, error = %e, "Failed to encode cache entry"),
        }
    }

    /// UTF-8 entry. Invalid UTF-8 counts as a miss.
    fn get_string(&self, key: &str, etag: &str) -> Option<String> {
        String::from_utf8(self.get(key, etag)?).ok()
    }

    fn set_string(&self, key: &str, etag: &str, value: &str) {
        self.set(key, etag, value.as_bytes());
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}
