//! Runtime knobs for stack capture and rendering.
//!
//! A [`Config`] is handed to [`ErrorBuilder`](crate::ErrorBuilder) explicitly, so
//! two builders in the same process can capture with different depths or roots
//! without touching shared state. [`Config::from_env`] reads the process
//! environment every time it is called.
//!
//! # Examples
//!
//! ```
//! use error_strata::{Config, ErrorBuilder};
//!
//! let config = Config::default()
//!     .with_max_depth(4)
//!     .with_workspace_root("/srv/app")
//!     .show_sources(true);
//!
//! let err = ErrorBuilder::new().with_config(config).build("disk full");
//! assert!(err.stack_frames().len() <= 4);
//! ```
use std::path::{Path, PathBuf};

/// Default number of frames kept per captured stack trace.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Environment variable holding the maximum frame depth.
pub const ENV_MAX_DEPTH: &str = "ERROR_STRATA_MAX_DEPTH";
/// Environment variable holding an OS path list of workspace roots.
pub const ENV_WORKSPACE_ROOTS: &str = "ERROR_STRATA_WORKSPACE_ROOTS";
/// Environment variable toggling source fragments in rendered output.
pub const ENV_SHOW_SOURCES: &str = "ERROR_STRATA_SHOW_SOURCES";

/// Capture and rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on frames accepted per capture.
    pub max_depth: usize,
    /// Directories that frame paths are made relative to.
    pub workspace_roots: Vec<PathBuf>,
    /// Whether structured and verbose output include source fragments.
    pub show_sources: bool,
}

/// No workspace roots: frame paths render as resolved. Use
/// [`Config::from_env`] to get the current directory and registry fallbacks.
impl Default for Config {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, workspace_roots: Vec::new(), show_sources: false }
    }
}

impl Config {
    /// Builds a configuration from the process environment.
    ///
    /// Unset or unparsable variables fall back to the defaults. When no roots
    /// are configured, the current directory and the cargo registry sources
    /// are used so that dependency frames render as `crate-x.y.z/src/...`.
    /// Nothing is cached: the fallback roots are looked up on every call.
    pub fn from_env() -> Self {
        let max_depth = match std::env::var(ENV_MAX_DEPTH) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(depth) => depth,
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value = %raw, "ignoring invalid {}", ENV_MAX_DEPTH);
                    DEFAULT_MAX_DEPTH
                },
            },
            Err(_) => DEFAULT_MAX_DEPTH,
        };

        let mut workspace_roots: Vec<PathBuf> = std::env::var_os(ENV_WORKSPACE_ROOTS)
            .map(|raw| std::env::split_paths(&raw).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default();
        if workspace_roots.is_empty() {
            workspace_roots = default_roots();
        }

        let show_sources = std::env::var(ENV_SHOW_SOURCES)
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self { max_depth, workspace_roots, show_sources }
    }

    /// Sets the maximum number of frames per capture.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Adds a workspace root.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_roots.push(root.into());
        self
    }

    /// Replaces the workspace roots.
    #[must_use]
    pub fn with_workspace_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.workspace_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Toggles source fragments in structured and verbose output.
    #[must_use]
    pub fn show_sources(mut self, show: bool) -> Self {
        self.show_sources = show;
        self
    }

    /// Normalizes `path` against the configured roots.
    pub fn normalize_path(&self, path: &Path) -> String {
        crate::stack::path::normalize(path, &self.workspace_roots)
    }
}

fn default_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    let cargo_home = std::env::var_os("CARGO_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cargo")));
    if let Some(registry) = cargo_home.map(|home| home.join("registry").join("src")) {
        if let Ok(entries) = std::fs::read_dir(&registry) {
            roots.extend(entries.filter_map(Result::ok).map(|entry| entry.path()));
        }
    }
    roots
}
