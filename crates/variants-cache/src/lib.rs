//! Etag-validated caches for parsed instructions and rendered pages.
//!
//! Two traits form the API:
//!
//! - [`Cache`]: hands out named buckets, one per kind of artifact
//!   (`"instructions"`, `"xhtml"`, `"text"`)
//! - [`CacheBucket`]: byte store whose entries are only returned for the
//!   etag they were stored under
//!
//! Caching is always optional. Backends never fail a lookup or a store:
//! errors are logged and treated as a miss.
//!
//! # Example
//!
//! ```
//! use variants_cache::{Cache, CacheBucketExt, NullCache};
//!
//! let cache = NullCache;
//! let bucket = cache.bucket("xhtml");
//! bucket.set_string("wiki/start.txt", "1700000000-42", "<p>hi</p>");
//! assert_eq!(bucket.get_string("wiki/start.txt", "1700000000-42"), None);
//! ```

mod ext;
mod file;

pub use ext::CacheBucketExt;
pub use file::FileCache;

/// A named partition within a [`Cache`].
pub trait CacheBucket: Send + Sync {
    /// Stored bytes for `key` if they were stored with `etag`.
    ///
    /// An empty `etag` skips validation and returns whatever is stored.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store `value` for `key` under `etag`, replacing any previous entry.
    fn set(&self, key: &str, etag: &str, value: &[u8]);
}

/// Factory for isolated [`CacheBucket`]s.
pub trait Cache: Send + Sync {
    /// Open the bucket called `name`. Handles for the same name share
    /// storage.
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// Bucket that never stores anything.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}
}

/// [`Cache`] used when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}
