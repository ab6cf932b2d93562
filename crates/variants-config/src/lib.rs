//! Configuration management for variants.
//!
//! Parses `variants.toml` with serde and discovers it in the working
//! directory or one of its parents. CLI settings passed to [`Config::load`]
//! take precedence over file values.
//!
//! ```toml
//! [render]
//! mode = "xhtml"            # or "text"
//!
//! [cache]
//! enabled = true
//! dir = ".variants/cache"   # relative to the config file
//!
//! [vars]                    # default request variables
//! lang = "${WIKI_LANG:-en}"
//! audience = "guest"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `[vars]` values and `cache.dir` support `${VAR}` and `${VAR:-default}`.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use variants_markup::{OutputMode, Vars};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "variants.toml";

/// Project data directory, relative to the config file.
const PROJECT_DIR: &str = ".variants";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output mode.
    pub mode: Option<OutputMode>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Request variables merged over `[vars]`.
    pub vars: Vars,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    render: RenderConfigRaw,
    cache: CacheConfigRaw,
    /// Default request variables, after environment expansion.
    pub vars: BTreeMap<String, String>,

    /// Resolved render configuration (set after loading).
    #[serde(skip)]
    pub render_resolved: RenderConfig,
    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RenderConfigRaw {
    mode: Option<String>,
}

/// Resolved render configuration.
#[derive(Debug, Default)]
pub struct RenderConfig {
    pub mode: OutputMode,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Resolved cache configuration with an absolute directory.
#[derive(Debug, Default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `vars.lang`).
        field: String,
        /// Error message (e.g. `${WIKI_LANG} not set`).
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Variable names must be usable on the left of a condition.
fn require_var_name(name: &str) -> Result<(), ConfigError> {
    require_non_empty(name, "vars key")?;
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '=' | '!' | '<' | '>'))
    {
        return Err(ConfigError::Validation(format!(
            "vars key `{name}` contains invalid character {c:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// Loads `config_path` if given, otherwise the first `variants.toml`
    /// found in the working directory or its parents, otherwise defaults.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Request variables: `[vars]` plus CLI overrides.
    #[must_use]
    pub fn request_vars(&self) -> Vars {
        self.vars.clone().into()
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(mode) = settings.mode {
            self.render_resolved.mode = mode;
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(cache_dir) = &settings.cache_dir {
            self.cache_resolved.dir.clone_from(cache_dir);
        }
        self.vars.extend(
            settings
                .vars
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned())),
        );
    }

    fn discover_config() -> Option<PathBuf> {
        discover_from(&std::env::current_dir().ok()?)
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            render: RenderConfigRaw::default(),
            cache: CacheConfigRaw::default(),
            vars: BTreeMap::new(),
            render_resolved: RenderConfig::default(),
            cache_resolved: CacheConfig {
                enabled: true,
                dir: base.join(PROJECT_DIR).join("cache"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values. Called automatically after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_resolved.enabled && self.cache_resolved.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "cache.dir cannot be empty when caching is enabled".to_owned(),
            ));
        }
        for name in self.vars.keys() {
            require_var_name(name)?;
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.cache.dir {
            self.cache.dir = Some(expand::expand_env(dir, "cache.dir")?);
        }
        for (name, value) in &mut self.vars {
            *value = expand::expand_env(value, &format!("vars.{name}"))?;
        }
        Ok(())
    }

    /// Resolve raw sections against the config file's directory.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let mode = match self.render.mode.as_deref() {
            Some(mode) => mode
                .parse()
                .map_err(|e| ConfigError::Validation(format!("render.mode: {e}")))?,
            None => OutputMode::default(),
        };
        self.render_resolved = RenderConfig { mode };

        let dir = match self.cache.dir.as_deref() {
            Some(dir) => config_dir.join(dir),
            None => config_dir.join(PROJECT_DIR).join("cache"),
        };
        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir,
        };
        Ok(())
    }
}

/// First `variants.toml` in `start` or one of its parents.
fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use variants_markup::RequestVars;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/wiki"));
        assert_eq!(config.render_resolved.mode, OutputMode::Xhtml);
        assert!(config.cache_resolved.enabled);
        assert_eq!(
            config.cache_resolved.dir,
            PathBuf::from("/wiki/.variants/cache")
        );
        assert!(config.vars.is_empty());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.vars.is_empty());
        assert!(config.render.mode.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            r#"
[render]
mode = "text"

[cache]
enabled = false
dir = "build/cache"

[vars]
lang = "de"
audience = "admin"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.render_resolved.mode, OutputMode::Text);
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.cache_resolved.dir, tmp.path().join("build/cache"));
        assert_eq!(config.config_path, Some(path));

        let vars = config.request_vars();
        assert_eq!(vars.get("lang"), Some("de"));
        assert_eq!(vars.get("audience"), Some("admin"));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = Config::load(Some(&missing), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_invalid_mode_is_a_validation_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "[render]\nmode = \"pdf\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
        assert!(err.to_string().contains("render.mode"));
    }

    #[test]
    fn test_invalid_var_name() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "[vars]\n\"a b\" = \"1\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_malformed_toml() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "[vars\n");
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_vars_are_expanded() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("VARIANTS_CONFIG_TEST_LANG", "fr");
        }
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            "[vars]\nlang = \"${VARIANTS_CONFIG_TEST_LANG}\"\nrole = \"${VARIANTS_CONFIG_TEST_ROLE:-guest}\"\n",
        );
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.vars.get("lang").map(String::as_str), Some("fr"));
        assert_eq!(config.vars.get("role").map(String::as_str), Some("guest"));
        unsafe {
            std::env::remove_var("VARIANTS_CONFIG_TEST_LANG");
        }
    }

    #[test]
    fn test_cli_settings_override_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            tmp.path(),
            "[render]\nmode = \"text\"\n\n[vars]\nlang = \"de\"\nrole = \"guest\"\n",
        );
        let settings = CliSettings {
            mode: Some(OutputMode::Xhtml),
            cache_enabled: Some(false),
            cache_dir: Some(PathBuf::from("/tmp/elsewhere")),
            vars: Vars::from_iter([("lang", "en")]),
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.render_resolved.mode, OutputMode::Xhtml);
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.cache_resolved.dir, PathBuf::from("/tmp/elsewhere"));

        let vars = config.request_vars();
        assert_eq!(vars.get("lang"), Some("en"));
        assert_eq!(vars.get("role"), Some("guest"));
    }

    #[test]
    fn test_discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "");
        let nested = tmp.path().join("pages/ns");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_from(&nested), Some(path));
    }

    #[test]
    fn test_require_var_name() {
        assert!(require_var_name("lang").is_ok());
        assert!(require_var_name("user.role").is_ok());
        assert!(require_var_name("").is_err());
        assert!(require_var_name("a=b").is_err());
        assert!(require_var_name("a!").is_err());
    }
}
