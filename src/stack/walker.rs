//! Call-stack capture at error construction time.
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use super::{Frame, StackTrace};
use crate::config::Config;

const CRATE_NAME: &str = env!("CARGO_CRATE_NAME");

static CRATE_SRC: Lazy<PathBuf> = Lazy::new(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("src"));

/// Captures the current call stack.
///
/// Frames belonging to the unwinder are dropped, then `skip` frames starting at
/// this function itself: `skip = 1` drops `capture`, `skip = 2` also drops its
/// caller. The remaining frames are filtered:
///
/// 1. standard library frames are dropped;
/// 2. frames from this crate's `src/` are dropped, unless they belong to a
///    `tests` module;
/// 3. the walk stops after `config.max_depth` accepted frames.
///
/// The walk also stops at the first frame without file and line information.
/// This never fails: an empty trace is a valid answer, e.g. for binaries
/// built without debug info.
#[inline(never)]
pub fn capture(config: &Config, skip: usize, span: String) -> StackTrace {
    let max_depth = config.max_depth;
    let mut frames: Vec<Frame> = Vec::with_capacity(max_depth.min(16));
    if max_depth == 0 {
        return StackTrace::new(span, frames);
    }

    let mut started = false;
    let mut skipped = 0usize;
    let mut done = false;

    backtrace::trace(|raw| {
        let mut resolved = false;

        backtrace::resolve_frame(raw, |symbol| {
            if done {
                return;
            }
            let (Some(path), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                return;
            };
            resolved = true;

            let full_name = symbol.name().map(|name| format!("{name:#}"));
            let own = is_own_frame(path, full_name.as_deref());
            if !started {
                if !own {
                    return;
                }
                started = true;
            }
            if skipped < skip {
                skipped += 1;
                return;
            }

            if is_std_source(path) {
                return;
            }
            if own && !full_name.as_deref().is_some_and(is_unit_test) {
                return;
            }

            frames.push(Frame::with_path(
                config.normalize_path(path),
                path,
                line,
                full_name.as_deref().map(short_name),
            ));
            if frames.len() >= max_depth {
                done = true;
            }
        });

        if started && !resolved {
            done = true;
        }
        !done
    });

    StackTrace::new(span, frames)
}

/// Frames of this crate: by source location, or by symbol for generics
/// instantiated in the caller's crate.
fn is_own_frame(path: &Path, function: Option<&str>) -> bool {
    if path.starts_with(CRATE_SRC.as_path()) {
        return true;
    }
    function.is_some_and(|name| {
        let name = name.strip_prefix('<').unwrap_or(name);
        name.strip_prefix(CRATE_NAME).is_some_and(|rest| rest.starts_with("::"))
    })
}

fn is_std_source(path: &Path) -> bool {
    if path.starts_with("/rustc") {
        return true;
    }
    let text = path.to_string_lossy();
    text.starts_with("\\rustc\\")
        || text.contains("rustlib/src/rust/library")
        || text.contains("rustlib\\src\\rust\\library")
}

fn is_unit_test(function: &str) -> bool {
    function.contains("::tests::")
}

/// Drops the leading crate segment: `app::db::query` becomes `db::query`.
fn short_name(full: &str) -> String {
    if full.starts_with('<') {
        return full.to_owned();
    }
    match full.split_once("::") {
        Some((_, rest)) if !rest.is_empty() => rest.to_owned(),
        _ => full.to_owned(),
    }
}
