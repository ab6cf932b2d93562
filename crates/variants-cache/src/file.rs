//! File-based cache.
//!
//! Every bucket is a subdirectory of the cache root and every entry is one
//! file laid out as
//!
//! ```text
//! [etag_len: u32 LE][etag bytes][data bytes]
//! ```
//!
//! Lookups read the header first and only read the payload when the etag
//! matches. The root carries a `VERSION` file; a root written by another
//! version is wiped on construction.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use crate::{Cache, CacheBucket};

const VERSION_FILE: &str = "VERSION";

/// [`Cache`] rooted at a directory on disk.
///
/// ```text
/// {root}/
/// +-- VERSION
/// +-- instructions/
/// |   +-- wiki/start.txt
/// +-- xhtml/
///     +-- wiki/start.txt
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open the cache at `root` for `version`, wiping it if it was written
    /// by a different version. Failures are logged, never returned.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    /// Entry path for `key`, or `None` if the key would leave the bucket.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if key.is_empty() || !contained {
            tracing::debug!(key, "Rejecting cache key outside bucket");
            return None;
        }
        Some(self.dir.join(relative))
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let mut file = File::open(self.entry_path(key)?).ok()?;

        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf).ok()?;
        let etag_len = usize::try_from(u32::from_le_bytes(len_buf)).ok()?;

        let mut stored_etag = vec![0u8; etag_len];
        file.read_exact(&mut stored_etag).ok()?;
        if !etag.is_empty() && stored_etag != etag.as_bytes() {
            return None;
        }

        let mut data = Vec::new();
        file.read_to_end(&mut data).ok()?;
        Some(data)
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        let Some(parent) = path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!(key, error = %e, "Failed to create cache bucket directory");
            return;
        }

        let etag_bytes = etag.as_bytes();
        let Ok(etag_len) = u32::try_from(etag_bytes.len()) else {
            return;
        };
        let mut buf = Vec::with_capacity(4 + etag_bytes.len() + value.len());
        buf.extend_from_slice(&etag_len.to_le_bytes());
        buf.extend_from_slice(etag_bytes);
        buf.extend_from_slice(value);

        // Write beside the entry and rename so readers never see a torn file.
        let tmp = path.with_extension("tmp~");
        let written = fs::write(&tmp, &buf).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            tracing::warn!(key, error = %e, "Failed to write cache entry");
            let _ = fs::remove_file(&tmp);
        }
    }
}

fn validate_version(root: &Path, version: &str) {
    let version_file = root.join(VERSION_FILE);

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!(version, "Cache version matches");
            return;
        }
        Ok(stored) => {
            tracing::info!(stored = %stored, current = version, "Cache version changed, wiping cache");
        }
        Err(_) => {
            tracing::info!(root = %root.display(), "Initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!(error = %e, "Failed to remove cache directory");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!(error = %e, "Failed to create cache directory");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!(error = %e, "Failed to write cache VERSION file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache(tmp: &TempDir) -> FileCache {
        FileCache::new(tmp.path().join("cache"), "v1")
    }

    #[test]
    fn test_set_and_get() {
        let tmp = TempDir::new().unwrap();
        let bucket = cache(&tmp).bucket("xhtml");

        bucket.set("start.txt", "etag1", b"<p>hello</p>");
        assert_eq!(bucket.get("start.txt", "etag1"), Some(b"<p>hello</p>".to_vec()));
    }

    #[test]
    fn test_etag_mismatch_misses() {
        let tmp = TempDir::new().unwrap();
        let bucket = cache(&tmp).bucket("xhtml");

        bucket.set("key", "etag1", b"first");
        assert_eq!(bucket.get("key", "etag2"), None);

        bucket.set("key", "etag2", b"second");
        assert_eq!(bucket.get("key", "etag1"), None);
        assert_eq!(bucket.get("key", "etag2"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_empty_etag_skips_validation() {
        let tmp = TempDir::new().unwrap();
        let bucket = cache(&tmp).bucket("xhtml");

        bucket.set("key", "some-etag", b"data");
        assert_eq!(bucket.get("key", ""), Some(b"data".to_vec()));
    }

    #[test]
    fn test_missing_entry() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(cache(&tmp).bucket("text").get("nothing", "e"), None);
    }

    #[test]
    fn test_buckets_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp);
        let xhtml = cache.bucket("xhtml");
        let text = cache.bucket("text");

        xhtml.set("page", "e", b"<p>x</p>");
        text.set("page", "e", b"x");

        assert_eq!(xhtml.get("page", "e"), Some(b"<p>x</p>".to_vec()));
        assert_eq!(text.get("page", "e"), Some(b"x".to_vec()));
    }

    #[test]
    fn test_nested_key_and_binary_data() {
        let tmp = TempDir::new().unwrap();
        let bucket = cache(&tmp).bucket("instructions");

        let data = vec![0x00, 0x0A, 0x0D, 0xFF, 0x80];
        bucket.set("wiki/ns/page.txt", "e", &data);
        assert_eq!(bucket.get("wiki/ns/page.txt", "e"), Some(data));
    }

    #[test]
    fn test_keys_cannot_escape_bucket() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp);
        let bucket = cache.bucket("xhtml");

        bucket.set("../VERSION", "e", b"overwritten");
        bucket.set("/tmp/abs", "e", b"x");
        assert_eq!(bucket.get("../VERSION", ""), None);
        assert_eq!(fs::read_to_string(cache.root().join("VERSION")).unwrap(), "v1");
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let cache = cache(&tmp);
        cache.bucket("text").set("page", "e", b"x");

        let names: Vec<_> = fs::read_dir(cache.root().join("text"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["page"]);
    }

    #[test]
    fn test_same_version_keeps_entries() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        FileCache::new(root.clone(), "v1")
            .bucket("xhtml")
            .set("key", "e", b"kept");

        let reopened = FileCache::new(root, "v1");
        assert_eq!(reopened.bucket("xhtml").get("key", "e"), Some(b"kept".to_vec()));
    }

    #[test]
    fn test_version_change_wipes_entries() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        FileCache::new(root.clone(), "v1")
            .bucket("xhtml")
            .set("key", "e", b"stale");

        let reopened = FileCache::new(root.clone(), "v2");
        assert_eq!(reopened.bucket("xhtml").get("key", "e"), None);
        assert_eq!(fs::read_to_string(root.join("VERSION")).unwrap(), "v2");
    }

    #[test]
    fn test_missing_version_file_wipes_orphans() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");
        fs::create_dir_all(root.join("xhtml")).unwrap();
        fs::write(root.join("xhtml/orphan"), b"stale").unwrap();

        let cache = FileCache::new(root.clone(), "v1");
        assert_eq!(cache.bucket("xhtml").get("orphan", ""), None);
        assert_eq!(fs::read_to_string(root.join("VERSION")).unwrap(), "v1");
    }
}
