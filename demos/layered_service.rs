//! A repository, a service and a handler each add their own layer.
use error_strata::prelude::*;
use error_strata::{RequestInfo, ResponseInfo};

#[derive(Debug)]
struct Timeout;

impl std::fmt::Display for Timeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("statement timeout after 5s")
    }
}

impl std::error::Error for Timeout {}

fn repository_find(user_id: u64) -> RecordResult<String> {
    let builder = ErrorBuilder::new()
        .code("db_timeout")
        .in_domain("storage")
        .tags(["database"])
        .with("query", "SELECT * FROM users WHERE id = $1")
        .with("user_id", user_id);
    Err(builder.wrap_with(Timeout, "user lookup failed"))
}

fn service_profile(user_id: u64) -> RecordResult<String> {
    let builder = ErrorBuilder::new()
        .in_domain("profiles")
        .tags(["service"])
        .owner("profiles-team")
        .user(user_id.to_string(), [("plan", "pro")]);
    repository_find(user_id).wrap_err_with(&builder, || "loading profile")
}

fn handle(user_id: u64) -> Result<ResponseInfo, ErrorRecord> {
    let request = RequestInfo::new("GET", format!("/users/{}", user_id)).header("Accept", "application/json");
    let builder = ErrorBuilder::new()
        .tags(["http"])
        .public("The profile is temporarily unavailable")
        .request(request, false)
        .response(ResponseInfo::new(503).reason("Service Unavailable"), false);
    let body = service_profile(user_id).wrap_err_with(&builder, || "GET /users failed")?;
    Ok(ResponseInfo::new(200).body(body))
}

fn main() {
    let err = match handle(7) {
        Ok(_) => return,
        Err(err) => err,
    };

    println!("summary: {}", err);
    println!("code (deepest wins): {:?}", err.code());
    println!("domain (deepest wins): {:?}", err.domain());
    println!("tags (union): {:?}", err.tags());
    println!("public: {:?}", err.public());
    println!("context (merged): {}", serde_json::Value::Object(err.context()));
    println!("root cause: {}", err.root_cause());
    println!();
    println!("{}", err.stacktrace());
}
