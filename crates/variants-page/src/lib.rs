//! Page rendering for variants.
//!
//! [`PageRenderer`] reads a wiki source file, parses it into instructions
//! and renders them for one request. Instructions are cached per source
//! version. Rendered output is only cached when it does not depend on the
//! request, so pages with conditional blocks are rendered every time.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::{Path, PathBuf};
//! use variants_markup::{OutputMode, Vars};
//! use variants_page::{PageRenderer, PageRendererConfig};
//!
//! let renderer = PageRenderer::new(PageRendererConfig {
//!     cache_dir: Some(PathBuf::from(".variants/cache")),
//!     version: env!("CARGO_PKG_VERSION").to_owned(),
//! })?;
//!
//! let vars = Vars::new().with("audience", "admin");
//! let page = renderer.render(Path::new("pages/start.txt"), OutputMode::Xhtml, &vars)?;
//! # Ok(())
//! # }
//! ```

mod renderer;

pub use renderer::{PageError, PageRenderResult, PageRenderer, PageRendererConfig};
