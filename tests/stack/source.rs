use std::io::Write;

use error_strata::stack::source::SourceCache;
use error_strata::{Config, ErrorBuilder, Frame};
use tempfile::NamedTempFile;

fn source_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".rs").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn frame_at(file: &NamedTempFile, line: u32) -> Frame {
    Frame::with_path("fixture.rs", file.path(), line, None)
}

#[test]
fn window_is_numbered_and_marks_the_target_line() {
    let file = source_file("fn a() {}\nfn b() {}\n    let x = 1;\nfn d() {}\nfn e() {}\n");
    let cache = SourceCache::new();

    let window = cache.window_around(&frame_at(&file, 3), 1, 1);
    assert_eq!(
        window,
        vec![
            "2\tfn b() {}".to_owned(),
            "3\t    let x = 1;".to_owned(),
            "\t    ^^^^^^^^^^".to_owned(),
            "4\tfn d() {}".to_owned(),
        ]
    );
}

#[test]
fn window_is_clamped_to_the_file() {
    let file = source_file("only line\n");
    let cache = SourceCache::new();

    let window = cache.window_around(&frame_at(&file, 1), 5, 5);
    assert_eq!(window, vec!["1\tonly line".to_owned(), "\t^^^^^^^^^".to_owned()]);
}

#[test]
fn tabs_widen_the_indicator_offset() {
    let file = source_file("\tcall();\n");
    let cache = SourceCache::new();

    let window = cache.window_around(&frame_at(&file, 1), 0, 0);
    assert_eq!(window[1], format!("\t{}{}", " ".repeat(8), "^".repeat(7)));
}

#[test]
fn out_of_range_line_gives_empty_window() {
    let file = source_file("a\nb\n");
    let cache = SourceCache::new();

    assert!(cache.window_around(&frame_at(&file, 3), 5, 5).is_empty());
    assert!(cache.window_around(&frame_at(&file, 0), 5, 5).is_empty());
}

#[test]
fn non_rust_and_missing_files_are_skipped() {
    let cache = SourceCache::new();
    let text = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();

    assert!(cache.lines_for(text.path()).is_none());
    assert!(cache.lines_for(std::path::Path::new("/definitely/not/here.rs")).is_none());
    assert!(cache.is_empty());
}

#[test]
fn files_are_read_once() {
    let file = source_file("first\n");
    let cache = SourceCache::new();

    let before = cache.lines_for(file.path()).unwrap();
    std::fs::write(file.path(), "changed\n").unwrap();
    let after = cache.lines_for(file.path()).unwrap();

    assert_eq!(before, after);
    assert_eq!(after[0], "first");
    assert!(cache.contains(file.path()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn record_sources_show_the_construction_site() {
    let cache = SourceCache::new();
    let err = ErrorBuilder::new().with_config(Config::default()).build("located");

    let sources = err.sources_with(&cache);
    assert!(sources.starts_with("Oops: located\n  --- at "), "{}", sources);
    assert!(sources.contains("record_sources_show_the_construction_site"));
    assert!(sources.contains("^^^"));
}

#[test]
fn concurrent_first_reads_agree() {
    let file = source_file("fn main() {\n    run();\n}\n");
    let cache = SourceCache::new();
    let frame = frame_at(&file, 2);
    let barrier = std::sync::Barrier::new(8);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    let lines = cache.lines_for(file.path()).unwrap();
                    (lines, cache.window_around(&frame, 1, 1))
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    let (lines, window) = &results[0];
    assert_eq!(lines.len(), 3);
    assert_eq!(window.len(), 4);
    for (other_lines, other_window) in &results[1..] {
        assert_eq!(other_lines, lines);
        assert_eq!(other_window, window);
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn shared_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<error_strata::ErrorRecord>();
    assert_send_sync::<error_strata::StackTrace>();
    assert_send_sync::<SourceCache>();
}
