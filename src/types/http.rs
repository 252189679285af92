//! HTTP request/response snapshots attached to an error.
//!
//! These are plain data, independent of any HTTP framework. `dump` renders an
//! HTTP/1.x style text block; the body is only included when the layer that
//! attached the snapshot asked for it.
use serde::Serialize;

/// Snapshot of an outgoing or incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    method: String,
    uri: String,
    version: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            version: "HTTP/1.1".into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Renders the request line, headers and optionally the body.
    pub fn dump(&self, with_body: bool) -> String {
        let mut out = format!("{} {} {}\r\n", self.method, self.uri, self.version);
        dump_tail(&mut out, &self.headers, self.body.as_deref().filter(|_| with_body));
        out
    }
}

/// Snapshot of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseInfo {
    status: u16,
    reason: Option<String>,
    version: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl ResponseInfo {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: None,
            version: "HTTP/1.1".into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Renders the status line, headers and optionally the body.
    pub fn dump(&self, with_body: bool) -> String {
        let mut out = match &self.reason {
            Some(reason) => format!("{} {} {}\r\n", self.version, self.status, reason),
            None => format!("{} {}\r\n", self.version, self.status),
        };
        dump_tail(&mut out, &self.headers, self.body.as_deref().filter(|_| with_body));
        out
    }
}

fn dump_tail(out: &mut String, headers: &[(String, String)], body: Option<&str>) {
    for (name, value) in headers {
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    if let Some(body) = body {
        out.push_str(body);
    }
}
