//! Page rendering with caching.
//!
//! Cache entries are validated by an etag built from the source file's
//! mtime and size plus the build version.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use variants_cache::{Cache, CacheBucketExt, FileCache, NullCache};
use variants_markup::{Call, MarkupError, OutputMode, Parser, RequestVars};

const INSTRUCTIONS_BUCKET: &str = "instructions";

/// Result of rendering a page.
#[derive(Clone, Debug)]
pub struct PageRenderResult {
    /// Rendered output in the requested mode.
    pub output: String,
    /// Whether the output may be reused for other requests.
    pub cacheable: bool,
    /// Whether the output was served from cache.
    pub from_cache: bool,
}

/// Error returned when page rendering fails.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Source file not found.
    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error reading source file.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
    /// Markup pipeline could not be built.
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

/// Configuration for [`PageRenderer`].
#[derive(Clone, Debug, Default)]
pub struct PageRendererConfig {
    /// Cache directory for instructions and rendered output.
    ///
    /// If `None`, caching is disabled.
    pub cache_dir: Option<PathBuf>,
    /// Application version for cache invalidation.
    pub version: String,
}

/// Page renderer with file-based caching.
pub struct PageRenderer {
    parser: Parser,
    cache: Box<dyn Cache>,
    version: String,
}

impl PageRenderer {
    /// Create a page renderer with the default syntax modes.
    pub fn new(config: PageRendererConfig) -> Result<Self, PageError> {
        let cache: Box<dyn Cache> = match config.cache_dir {
            Some(dir) => Box::new(FileCache::new(dir, &config.version)),
            None => Box::new(NullCache),
        };

        Ok(Self {
            parser: Parser::new()?,
            cache,
            version: config.version,
        })
    }

    /// Render the page at `path` for one request.
    ///
    /// # Errors
    ///
    /// Returns `PageError::NotFound` if the source file doesn't exist.
    /// Returns `PageError::Io` if it cannot be read.
    pub fn render(
        &self,
        path: &Path,
        mode: OutputMode,
        vars: &dyn RequestVars,
    ) -> Result<PageRenderResult, PageError> {
        let source = Source::open(path, &self.version)?;
        let output_bucket = self.cache.bucket(mode.as_str());

        if let Some(output) = output_bucket.get_string(&source.key, &source.etag) {
            tracing::debug!(key = %source.key, %mode, "Output cache hit");
            return Ok(PageRenderResult {
                output,
                cacheable: true,
                from_cache: true,
            });
        }

        let calls = self.load_instructions(&source)?;
        let result = variants_markup::render(&calls, mode, vars);

        if result.cacheable {
            output_bucket.set_string(&source.key, &source.etag, &result.output);
        } else {
            tracing::debug!(key = %source.key, %mode, "Output depends on request, not caching");
        }

        Ok(PageRenderResult {
            output: result.output,
            cacheable: result.cacheable,
            from_cache: false,
        })
    }

    /// Parsed instructions for the page at `path`.
    pub fn instructions(&self, path: &Path) -> Result<Vec<Call>, PageError> {
        let source = Source::open(path, &self.version)?;
        self.load_instructions(&source)
    }

    fn load_instructions(&self, source: &Source) -> Result<Vec<Call>, PageError> {
        let bucket = self.cache.bucket(INSTRUCTIONS_BUCKET);
        if let Some(calls) = bucket.get_json::<Vec<Call>>(&source.key, &source.etag) {
            tracing::debug!(key = %source.key, "Instructions cache hit");
            return Ok(calls);
        }

        let text = fs::read_to_string(&source.path).map_err(|e| io_error(&source.path, e))?;
        let calls = self.parser.parse(&text);
        tracing::debug!(key = %source.key, calls = calls.len(), "Parsed page");

        bucket.set_json(&source.key, &source.etag, &calls);
        Ok(calls)
    }
}

/// A source file resolved to its cache key and etag.
struct Source {
    path: PathBuf,
    key: String,
    etag: String,
}

impl Source {
    fn open(path: &Path, version: &str) -> Result<Self, PageError> {
        let path = fs::canonicalize(path).map_err(|e| io_error(path, e))?;
        let metadata = fs::metadata(&path).map_err(|e| io_error(&path, e))?;
        if !metadata.is_file() {
            return Err(PageError::NotFound(path));
        }

        Ok(Self {
            key: cache_key(&path),
            etag: etag(&metadata, version),
            path,
        })
    }
}

fn io_error(path: &Path, e: io::Error) -> PageError {
    match e.kind() {
        io::ErrorKind::NotFound => PageError::NotFound(path.to_path_buf()),
        _ => PageError::Io(e),
    }
}

/// Bucket-relative key for a canonical path.
fn cache_key(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn etag(metadata: &Metadata, version: &str) -> String {
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |duration| duration.as_nanos());
    format!("{mtime}-{}-{version}", metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use variants_markup::Vars;

    fn cached_renderer(tmp: &TempDir) -> PageRenderer {
        PageRenderer::new(PageRendererConfig {
            cache_dir: Some(tmp.path().join("cache")),
            version: "1.0.0".to_owned(),
        })
        .unwrap()
    }

    fn write_page(tmp: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = tmp.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_render_static_page() {
        let tmp = TempDir::new().unwrap();
        let page = write_page(&tmp, "start.txt", "Hello **world**");
        let renderer = PageRenderer::new(PageRendererConfig::default()).unwrap();

        let result = renderer
            .render(&page, OutputMode::Xhtml, &Vars::new())
            .unwrap();
        assert_eq!(result.output, "\n<p>\nHello <strong>world</strong>\n</p>\n");
        assert!(result.cacheable);
        assert!(!result.from_cache);
    }

    #[test]
    fn test_render_file_not_found() {
        let tmp = TempDir::new().unwrap();
        let renderer = cached_renderer(&tmp);

        let result = renderer.render(&tmp.path().join("missing.txt"), OutputMode::Text, &Vars::new());
        assert!(matches!(result, Err(PageError::NotFound(_))));
    }

    #[test]
    fn test_directory_is_not_a_page() {
        let tmp = TempDir::new().unwrap();
        let renderer = PageRenderer::new(PageRendererConfig::default()).unwrap();

        let result = renderer.render(tmp.path(), OutputMode::Text, &Vars::new());
        assert!(matches!(result, Err(PageError::NotFound(_))));
    }

    #[test]
    fn test_static_page_served_from_cache() {
        let tmp = TempDir::new().unwrap();
        let page = write_page(&tmp, "start.txt", "Plain text");
        let renderer = cached_renderer(&tmp);

        let first = renderer.render(&page, OutputMode::Xhtml, &Vars::new()).unwrap();
        assert!(!first.from_cache);

        let second = renderer.render(&page, OutputMode::Xhtml, &Vars::new()).unwrap();
        assert!(second.from_cache);
        assert_eq!(first.output, second.output);
    }

    #[test]
    fn test_output_cache_is_per_mode() {
        let tmp = TempDir::new().unwrap();
        let page = write_page(&tmp, "start.txt", "Plain text");
        let renderer = cached_renderer(&tmp);

        renderer.render(&page, OutputMode::Xhtml, &Vars::new()).unwrap();
        let text = renderer.render(&page, OutputMode::Text, &Vars::new()).unwrap();
        assert!(!text.from_cache);
        assert_eq!(text.output, "Plain text\n\n");
    }

    #[test]
    fn test_conditional_page_is_never_served_from_cache() {
        let tmp = TempDir::new().unwrap();
        let page = write_page(
            &tmp,
            "start.txt",
            "<ifvar audience=admin>Restart it.<else>Ask an admin.</ifvar>",
        );
        let renderer = cached_renderer(&tmp);
        let admin = Vars::new().with("audience", "admin");

        let first = renderer.render(&page, OutputMode::Text, &admin).unwrap();
        assert_eq!(first.output, "Restart it.\n\n");
        assert!(!first.cacheable);

        let guest = renderer.render(&page, OutputMode::Text, &Vars::new()).unwrap();
        assert!(!guest.from_cache);
        assert_eq!(guest.output, "Ask an admin.\n\n");

        let again = renderer.render(&page, OutputMode::Text, &admin).unwrap();
        assert!(!again.from_cache);
        assert_eq!(again.output, "Restart it.\n\n");
    }

    #[test]
    fn test_instructions_are_cached() {
        let tmp = TempDir::new().unwrap();
        let page = write_page(&tmp, "start.txt", "<ifvar a=1>one</ifvar>");
        let renderer = cached_renderer(&tmp);

        let calls = renderer.instructions(&page).unwrap();
        let bucket = FileCache::new(tmp.path().join("cache"), "1.0.0").bucket(INSTRUCTIONS_BUCKET);
        let source = Source::open(&page, "1.0.0").unwrap();
        let cached: Option<Vec<Call>> = bucket.get_json(&source.key, &source.etag);
        assert_eq!(cached, Some(calls));
    }

    #[test]
    fn test_changed_source_invalidates_cache() {
        let tmp = TempDir::new().unwrap();
        let page = write_page(&tmp, "start.txt", "Original");
        let renderer = cached_renderer(&tmp);

        renderer.render(&page, OutputMode::Text, &Vars::new()).unwrap();
        fs::write(&page, "Changed text").unwrap();

        let result = renderer.render(&page, OutputMode::Text, &Vars::new()).unwrap();
        assert!(!result.from_cache);
        assert_eq!(result.output, "Changed text\n\n");
    }

    #[test]
    fn test_cache_key_drops_root() {
        assert_eq!(cache_key(Path::new("/srv/wiki/start.txt")), "srv/wiki/start.txt");
    }
}
