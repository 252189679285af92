//! Workspace-relative path cleaning for captured frames.
use std::path::{Component, Path, PathBuf};

/// Rewrites `path` relative to the most specific root that contains it.
///
/// Roots are tried longest first, so the output does not depend on the order
/// they were configured in. A result never climbs out of its root; when no
/// root contains `path`, the path is returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use error_strata::stack::path::normalize;
///
/// let roots = vec![PathBuf::from("/work"), PathBuf::from("/work/app")];
/// assert_eq!(normalize(Path::new("/work/app/src/main.rs"), &roots), "src/main.rs");
/// assert_eq!(normalize(Path::new("/etc/hosts"), &roots), "/etc/hosts");
/// ```
pub fn normalize(path: &Path, roots: &[PathBuf]) -> String {
    let mut ordered: Vec<&PathBuf> = roots.iter().filter(|r| !r.as_os_str().is_empty()).collect();
    ordered.sort_by(|a, b| b.as_os_str().len().cmp(&a.as_os_str().len()));

    for root in ordered {
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        if relative.components().any(|c| matches!(c, Component::ParentDir)) {
            continue;
        }
        return relative.to_string_lossy().into_owned();
    }

    path.to_string_lossy().into_owned()
}
