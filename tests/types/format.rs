use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use error_strata::{deferred, Config, ErrorBuilder, RequestInfo, ResponseInfo};
use serde_json::json;

#[test]
fn display_uses_message_and_cause() {
    let only_message = ErrorBuilder::new().build("boom");
    assert_eq!(only_message.to_string(), "boom");

    let io = io::Error::new(io::ErrorKind::Other, "socket closed");
    let only_cause = ErrorBuilder::new().wrap(io);
    assert_eq!(only_cause.to_string(), "socket closed");

    let both = ErrorBuilder::new().wrap_with(only_cause, "fetch failed");
    assert_eq!(both.to_string(), "fetch failed: socket closed");
}

#[test]
fn empty_message_is_treated_as_absent() {
    let io = io::Error::new(io::ErrorKind::Other, "eof");
    let err = ErrorBuilder::new().wrap_with(io, "");

    assert_eq!(err.message(), None);
    assert_eq!(err.to_string(), "eof");
}

#[test]
fn alternate_display_is_the_verbose_report() {
    let err = ErrorBuilder::new()
        .code("E_LIMIT")
        .in_domain("quota")
        .tags(["billing", "limits"])
        .with("limit", 100)
        .owner("billing-team")
        .build("quota exceeded");

    let report = format!("{:#}", err);
    assert!(report.starts_with("Oops: quota exceeded\n"));
    assert!(report.contains("Code: E_LIMIT\n"));
    assert!(report.contains("Domain: quota\n"));
    assert!(report.contains("Tags: billing, limits\n"));
    assert!(report.contains("Owner: billing-team\n"));
    assert!(report.contains("Context:\n  * limit: 100\n"));
    assert!(!report.contains("Hint:"));
}

#[test]
fn verbose_report_lists_user_and_request() {
    let err = ErrorBuilder::new()
        .user("u-9", [("role", "admin")])
        .request(RequestInfo::new("DELETE", "/users/9").header("X-Request-Id", "abc"), false)
        .build("forbidden");

    let report = err.formatter().verbose().to_string();
    assert!(report.contains("User:\n"));
    assert!(report.contains("  * id: u-9\n"));
    assert!(report.contains("  * role: admin\n"));
    assert!(report.contains("Request:\n  * DELETE /users/9 HTTP/1.1\n  * X-Request-Id: abc\n"));
}

#[test]
fn structured_map_contains_only_set_attributes() {
    let err = ErrorBuilder::new()
        .code("E1")
        .in_domain("auth")
        .tags(["login"])
        .with("attempt", 3)
        .hint("reset the password")
        .build("login failed");

    let map = err.to_structured_map();
    assert_eq!(map["error"], "login failed");
    assert_eq!(map["code"], "E1");
    assert_eq!(map["domain"], "auth");
    assert_eq!(map["tags"], json!(["login"]));
    assert_eq!(map["context"], json!({ "attempt": 3 }));
    assert_eq!(map["hint"], "reset the password");
    assert!(map.contains_key("time"));

    for absent in ["trace", "public", "owner", "user", "tenant", "request", "response", "duration"] {
        assert!(!map.contains_key(absent), "unexpected key {}", absent);
    }
}

#[test]
fn structured_map_resolves_through_the_chain() {
    let inner = ErrorBuilder::new()
        .code("db")
        .tenant("acme", [("plan", "enterprise")])
        .with("query", "SELECT 1")
        .build("query failed");
    let outer = ErrorBuilder::new().public("Try again").wrap_with(inner, "handler failed");

    let map = outer.to_structured_map();
    assert_eq!(map["error"], "handler failed: query failed");
    assert_eq!(map["code"], "db");
    assert_eq!(map["public"], "Try again");
    assert_eq!(map["tenant"], json!({ "id": "acme", "plan": "enterprise" }));
    assert_eq!(map["context"]["query"], "SELECT 1");
}

#[test]
fn duration_uses_debug_format() {
    let err = ErrorBuilder::new().duration(Duration::from_millis(1500)).build("slow");
    assert_eq!(err.to_structured_map()["duration"], "1.5s");
}

#[test]
fn deferred_values_are_evaluated_on_every_read() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let err = ErrorBuilder::new()
        .with("calls", deferred!(counter.fetch_add(1, Ordering::SeqCst) + 1))
        .build("lazy");

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(err.to_structured_map()["context"]["calls"], 1);
    assert_eq!(err.to_structured_map()["context"]["calls"], 2);
}

#[test]
fn overridden_deferred_value_is_not_evaluated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let inner = ErrorBuilder::new()
        .with("state", deferred!({
            counter.fetch_add(1, Ordering::SeqCst);
            "inner"
        }))
        .build("inner");
    let outer = ErrorBuilder::new().with("state", "outer").wrap(inner);

    assert_eq!(outer.context()["state"], "outer");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn serialize_matches_structured_map() {
    let err = ErrorBuilder::new().code("E2").with("k", "v").build("serialized");

    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value["error"], "serialized");
    assert_eq!(value["code"], "E2");
    assert_eq!(value["context"]["k"], "v");
}

#[test]
fn request_and_response_dumps_respect_the_body_flag() {
    let request = RequestInfo::new("POST", "/orders").header("Content-Type", "application/json").body("{\"id\":1}");
    let response = ResponseInfo::new(502).reason("Bad Gateway").body("upstream down");

    let err = ErrorBuilder::new().request(request, false).response(response, true).build("proxy failed");
    let map = err.to_structured_map();

    let dumped_request = map["request"].as_str().unwrap();
    assert!(dumped_request.starts_with("POST /orders HTTP/1.1\r\n"));
    assert!(dumped_request.contains("Content-Type: application/json\r\n"));
    assert!(!dumped_request.contains("\"id\""));

    let dumped_response = map["response"].as_str().unwrap();
    assert!(dumped_response.starts_with("HTTP/1.1 502 Bad Gateway\r\n"));
    assert!(dumped_response.ends_with("\r\n\r\nupstream down"));
}

#[test]
fn sources_follow_the_configuration() {
    let hidden = ErrorBuilder::new().with_config(Config::default()).build("quiet");
    assert!(!hidden.to_structured_map().contains_key("sources"));

    let shown = ErrorBuilder::new().with_config(Config::default().show_sources(true)).build("loud");
    let map = shown.to_structured_map();
    let sources = map["sources"].as_str().unwrap();
    assert!(sources.starts_with("Oops: loud\n  --- at "));
    assert!(sources.contains("^^^"));
}

#[test]
fn stacktrace_is_part_of_structured_output() {
    let err = ErrorBuilder::new().with_config(Config::default()).build("traced");
    let map = err.to_structured_map();

    let trace = map["stacktrace"].as_str().unwrap();
    assert!(trace.starts_with("Oops: traced\n  --- at "));
    assert!(trace.contains("stacktrace_is_part_of_structured_output"));
}
