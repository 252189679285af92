use std::path::PathBuf;

use error_strata::config::DEFAULT_MAX_DEPTH;
use error_strata::Config;

#[test]
fn defaults() {
    let config = Config::default();

    assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(DEFAULT_MAX_DEPTH, 10);
    assert!(config.workspace_roots.is_empty());
    assert!(!config.show_sources);
}

#[test]
fn setters_chain() {
    let config = Config::default()
        .with_max_depth(3)
        .with_workspace_root("/a")
        .with_workspace_root("/b")
        .show_sources(true);

    assert_eq!(config.max_depth, 3);
    assert_eq!(config.workspace_roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    assert!(config.show_sources);

    let replaced = config.with_workspace_roots(["/c"]);
    assert_eq!(replaced.workspace_roots, vec![PathBuf::from("/c")]);
}
