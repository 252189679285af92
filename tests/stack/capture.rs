use std::hint::black_box;
use std::io;
use std::path::Path;

use error_strata::stack::capture;
use error_strata::{Config, ErrorBuilder, ErrorRecord};

fn crate_src() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

#[test]
fn first_frame_is_the_caller() {
    let err = ErrorBuilder::new().with_config(Config::default()).build("here");
    let first = &err.stack_frames()[0];

    assert!(first.file().ends_with("capture.rs"), "unexpected file {}", first.file());
    assert!(first.line() > 0);
    let function = first.function().unwrap();
    assert!(function.ends_with("first_frame_is_the_caller"), "unexpected function {}", function);
    assert!(!function.starts_with("mod::"));
}

#[test]
fn library_and_std_frames_are_filtered() {
    let err = ErrorBuilder::new().with_config(Config::default()).build("filtered");

    assert!(!err.stack_frames().is_empty());
    for frame in err.stack_frames() {
        assert!(!frame.path().starts_with(crate_src()), "library frame {}", frame);
        assert!(!frame.file().starts_with("/rustc"), "std frame {}", frame);
        assert!(!frame.file().contains("rustlib"), "std frame {}", frame);
    }
}

#[inline(never)]
fn recurse(depth: usize, config: &Config) -> ErrorRecord {
    if depth == 0 {
        return ErrorBuilder::new().with_config(config.clone()).build("bottom");
    }
    black_box(recurse(black_box(depth - 1), config))
}

#[test]
fn capture_stops_at_max_depth() {
    let config = Config::default().with_max_depth(3);
    let err = recurse(20, &config);

    assert_eq!(err.stack_frames().len(), 3);
    assert!(err.stack_frames().iter().all(|frame| frame.function().is_some_and(|f| f.ends_with("recurse"))));
}

#[test]
fn zero_depth_captures_nothing() {
    let err = ErrorBuilder::new().with_config(Config::default().with_max_depth(0)).build("blind");

    assert!(err.stack_frames().is_empty());
    assert_eq!(err.stacktrace(), "");
}

#[test]
fn direct_capture_uses_the_given_span() {
    let trace = capture(&Config::default(), 0, "span-1".to_owned());

    assert_eq!(trace.span(), "span-1");
    assert!(!trace.is_empty());
    assert!(trace.len() <= error_strata::config::DEFAULT_MAX_DEPTH);
}

#[test]
fn frames_are_relative_to_workspace_roots() {
    let config = Config::default().with_workspace_root(env!("CARGO_MANIFEST_DIR"));
    let err = ErrorBuilder::new().with_config(config).build("relative");
    let first = &err.stack_frames()[0];

    assert!(!Path::new(first.file()).is_absolute(), "absolute file {}", first.file());
    assert!(Path::new(first.file()).ends_with("tests/stack/capture.rs"));
}

#[inline(never)]
fn failing_query(config: &Config) -> ErrorRecord {
    ErrorBuilder::new().with_config(config.clone()).build("query failed")
}

#[inline(never)]
fn failing_handler(config: &Config) -> ErrorRecord {
    let err = failing_query(config);
    ErrorBuilder::new().with_config(config.clone()).wrap_with(err, "handler failed")
}

#[test]
fn stacktrace_renders_deepest_block_first() {
    let config = Config::default();
    let err = failing_handler(&config);
    let trace = err.stacktrace();

    assert!(trace.starts_with("Oops: query failed\n  --- at "), "{}", trace);
    let (inner_block, outer_block) = trace.split_once("\nThrown: ").unwrap();
    assert!(outer_block.starts_with("handler failed\n  --- at "), "{}", trace);
    assert!(inner_block.contains("failing_query()"));
    assert!(outer_block.contains("failing_handler()"));
    assert!(!outer_block.contains("failing_query()"));
}

#[test]
fn outer_block_stops_at_frames_shared_with_the_inner_block() {
    let config = Config::default();
    let err = failing_handler(&config);
    let inner = err.layers().last().unwrap();
    let shared = inner.stack_frames().last().unwrap().to_string();

    let trace = err.stacktrace();
    let (_, outer_block) = trace.split_once("\nThrown: ").unwrap();
    assert!(!outer_block.contains(&shared), "{}", trace);
}

#[test]
fn block_without_message_is_headed_by_the_opaque_error() {
    let io = io::Error::new(io::ErrorKind::Other, "connection reset");
    let err = ErrorBuilder::new().with_config(Config::default()).wrap(io);

    assert!(err.stacktrace().starts_with("Oops: connection reset\n"));
}

#[test]
fn frame_display_includes_function_when_known() {
    let frame = error_strata::Frame::new("src/db.rs", 12, Some("db::query".to_owned()));
    assert_eq!(frame.to_string(), "src/db.rs:12 db::query()");

    let bare = error_strata::Frame::new("src/db.rs", 12, None);
    assert_eq!(bare.to_string(), "src/db.rs:12");
}

#[test]
fn render_stops_before_the_marker_frame() {
    use error_strata::{Frame, StackTrace};

    let frames = vec![
        Frame::new("a.rs", 1, Some("a".to_owned())),
        Frame::new("b.rs", 2, Some("b".to_owned())),
        Frame::new("c.rs", 3, Some("c".to_owned())),
    ];
    let trace = StackTrace::new("s", frames);

    assert_eq!(trace.render(None), "  --- at a.rs:1 a()\n  --- at b.rs:2 b()\n  --- at c.rs:3 c()");
    let marker = Frame::new("b.rs", 2, Some("b".to_owned()));
    assert_eq!(trace.render(Some(&marker)), "  --- at a.rs:1 a()");
}

#[inline(never)]
fn chain_level3(config: &Config) -> ErrorRecord {
    ErrorBuilder::new().with_config(config.clone()).build("level 3")
}

#[inline(never)]
fn chain_level2(config: &Config) -> ErrorRecord {
    black_box(chain_level3(config))
}

#[inline(never)]
fn chain_level1(config: &Config) -> ErrorRecord {
    black_box(chain_level2(config))
}

#[test]
fn shallow_stack_is_captured_completely() {
    let config = Config::default().with_max_depth(50);
    let err = chain_level1(&config);
    let functions: Vec<&str> = err.stack_frames().iter().filter_map(|frame| frame.function()).collect();

    assert!(err.stack_frames().len() < 50, "{:?}", functions);
    assert!(functions.len() >= 4, "{:?}", functions);
    assert!(functions[0].ends_with("chain_level3"), "{:?}", functions);
    assert!(functions[1].ends_with("chain_level2"), "{:?}", functions);
    assert!(functions[2].ends_with("chain_level1"), "{:?}", functions);
    assert!(functions[3].ends_with("shallow_stack_is_captured_completely"), "{:?}", functions);
    assert_eq!(functions.iter().filter(|name| name.contains("chain_level")).count(), 3);
}

#[test]
fn depth_limit_keeps_the_nearest_frames() {
    let full = chain_level1(&Config::default().with_max_depth(50));
    let cut = chain_level1(&Config::default().with_max_depth(4));

    assert_eq!(cut.stack_frames().len(), 4);
    assert_eq!(cut.stack_frames()[..3], full.stack_frames()[..3]);
}

#[inline(never)]
fn capture_here(skip: usize) -> error_strata::StackTrace {
    black_box(capture(&Config::default(), skip, "skip".to_owned()))
}

#[test]
fn skip_counts_from_the_capture_routine() {
    let one = capture_here(1);
    let two = capture_here(2);

    let first = one.frames()[0].function().unwrap();
    assert!(first.ends_with("capture_here"), "unexpected function {}", first);

    let first = two.frames()[0].function().unwrap();
    assert!(first.ends_with("skip_counts_from_the_capture_routine"), "unexpected function {}", first);
}

#[test]
fn builder_trace_starts_outside_the_library() {
    let err = chain_level3(&Config::default());
    let first = err.stack_frames()[0].function().unwrap();

    assert!(first.ends_with("chain_level3"), "unexpected function {}", first);
}

#[test]
fn outer_block_repeats_frames_above_the_convergence_point() {
    use error_strata::{Frame, StackTrace};

    let handler = Frame::new("app.rs", 20, Some("handler".to_owned()));
    let main = Frame::new("main.rs", 3, Some("main".to_owned()));
    let inner = StackTrace::new(
        "inner",
        vec![Frame::new("db.rs", 7, Some("query".to_owned())), handler.clone(), main.clone()],
    );
    let outer = StackTrace::new("outer", vec![handler.clone(), main.clone()]);

    let stop = inner.frames().last();
    assert_eq!(outer.render(stop), "  --- at app.rs:20 handler()");
    assert!(inner.render(None).contains("app.rs:20 handler()"));
}
