//! Source fragment extraction with a process-wide file cache.
//!
//! Files are read at most once (modulo benign races) and kept for the lifetime
//! of the cache. There is no eviction: the cache is meant for source files of
//! the running program, which form a small, fixed set.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use super::Frame;

/// Lines shown before the target line.
pub const DEFAULT_LINES_BEFORE: usize = 5;
/// Lines shown after the target line.
pub const DEFAULT_LINES_AFTER: usize = 5;
/// Columns a tab occupies when aligning the indicator line.
pub const TAB_WIDTH: usize = 8;

static GLOBAL: Lazy<SourceCache> = Lazy::new(SourceCache::new);

/// Cache of source files split into lines.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: RwLock<HashMap<PathBuf, Arc<Vec<String>>>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache used when rendering [`ErrorRecord::sources`](crate::ErrorRecord::sources).
    pub fn global() -> &'static SourceCache {
        &GLOBAL
    }

    /// Returns the lines of `path`, reading the file on first access.
    ///
    /// Only `.rs` files are considered; other paths and unreadable files
    /// return `None` without an error.
    pub fn lines_for(&self, path: &Path) -> Option<Arc<Vec<String>>> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            return None;
        }

        if let Some(lines) = self.read_files().get(path) {
            return Some(Arc::clone(lines));
        }

        // Read outside the lock; two threads racing here store identical content.
        let content = std::fs::read_to_string(path).ok()?;
        let lines: Arc<Vec<String>> = Arc::new(content.lines().map(str::to_owned).collect());

        self.write_files().insert(path.to_path_buf(), Arc::clone(&lines));
        Some(lines)
    }

    /// Numbered lines around `frame`, with a `^^^` indicator under its line.
    ///
    /// The window is clamped to the file. A missing file or a line past the
    /// end of the file produces an empty window.
    pub fn window_around(&self, frame: &Frame, before: usize, after: usize) -> Vec<String> {
        let Some(lines) = self.lines_for(frame.path()) else {
            return Vec::new();
        };

        let target = frame.line() as usize;
        if target == 0 || target > lines.len() {
            return Vec::new();
        }

        let current = target - 1;
        let start = current.saturating_sub(before);
        let end = current.saturating_add(after).min(lines.len() - 1);

        let mut output = Vec::with_capacity(end - start + 2);
        for (index, line) in lines.iter().enumerate().take(end + 1).skip(start) {
            output.push(format!("{}\t{}", index + 1, line));
            if index == current {
                output.push(indicator(line));
            }
        }
        output
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.read_files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `path` is already cached.
    pub fn contains(&self, path: &Path) -> bool {
        self.read_files().contains_key(path)
    }

    fn read_files(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, Arc<Vec<String>>>> {
        self.files.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_files(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, Arc<Vec<String>>>> {
        self.files.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn indicator(line: &str) -> String {
    let code = line.trim_start_matches([' ', '\t']);
    let leading = &line[..line.len() - code.len()];
    let tabs = leading.matches('\t').count();
    let first_column = leading.len() + (TAB_WIDTH - 1) * tabs;

    format!("\t{}{}", " ".repeat(first_column), "^".repeat(code.chars().count()))
}
