//! Stack capture, path cleaning and source fragments.
//!
//! - [`walker::capture`] walks the live call stack when an error is finalized.
//! - [`path::normalize`] turns absolute paths into workspace-relative ones.
//! - [`source::SourceCache`] reads source files once and renders windows of
//!   lines around a frame.
//!
//! [`Frame`] and [`StackTrace`] are plain immutable values; they are safe to
//! share between threads once captured.
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use serde::Serialize;

pub mod path;
pub mod source;
pub mod walker;

pub use source::SourceCache;
pub use walker::capture;

/// A single call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    file: String,
    #[serde(skip)]
    path: PathBuf,
    line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    function: Option<String>,
}

impl Frame {
    /// Creates a frame whose display path and on-disk path are the same.
    pub fn new(file: impl Into<String>, line: u32, function: Option<String>) -> Self {
        let file = file.into();
        Self { path: PathBuf::from(&file), file, line, function }
    }

    /// Creates a frame with a normalized display path and the raw path it came from.
    pub fn with_path(
        file: impl Into<String>,
        path: impl Into<PathBuf>,
        line: u32,
        function: Option<String>,
    ) -> Self {
        Self { file: file.into(), path: path.into(), line, function }
    }

    /// Normalized, display-friendly path.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Path as resolved from debug info; used to read source fragments.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based line number.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Function path without the crate prefix, if known.
    #[inline]
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Some(function) => write!(f, "{}:{} {}()", self.file, self.line, function),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

/// Frames captured by one construction step, nearest call first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StackTrace {
    span: String,
    frames: Vec<Frame>,
}

impl StackTrace {
    /// Wraps already captured frames.
    pub fn new(span: impl Into<String>, frames: Vec<Frame>) -> Self {
        Self { span: span.into(), frames }
    }

    /// Correlation token of the unit of work that captured this trace.
    #[inline]
    pub fn span(&self) -> &str {
        &self.span
    }

    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Renders frames as `  --- at file:line function()` lines.
    ///
    /// Rendering stops before the first frame equal to `stop_at`. An outer
    /// trace passes the last (outermost) frame of the trace below it, so only
    /// that convergence point and what follows it are dropped. Frames before
    /// it are printed even when the trace below also contains them, e.g. a
    /// handler that both built the inner error and wrapped it.
    pub fn render(&self, stop_at: Option<&Frame>) -> String {
        let stop = stop_at.map(ToString::to_string);
        let mut out = String::new();

        for frame in &self.frames {
            let current = frame.to_string();
            if stop.as_deref() == Some(current.as_str()) {
                break;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("  --- at ");
            out.push_str(&current);
        }

        out
    }

    /// Header and source window for the nearest frame.
    pub fn source(&self, cache: &SourceCache) -> Option<(String, Vec<String>)> {
        let first = self.frames.first()?;
        let body = cache.window_around(
            first,
            source::DEFAULT_LINES_BEFORE,
            source::DEFAULT_LINES_AFTER,
        );
        Some((first.to_string(), body))
    }
}

impl Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}
