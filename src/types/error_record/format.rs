//! Structured and verbose renderings of a record.
//!
//! [`ErrorRecord::to_structured_map`] feeds JSON logs and serializers;
//! [`RecordFormatter`] produces the multi-line human report. Both resolve
//! every attribute through the chain first and evaluate deferred values.
use std::fmt::{self, Display};

use serde_json::Value as JsonValue;

use super::ErrorRecord;
use crate::types::value::display_json;
use crate::types::JsonMap;

impl ErrorRecord {
    /// Resolved attributes as a flat JSON object.
    ///
    /// Only non-empty entries are present. Keys: `error`, `code`, `time`,
    /// `duration`, `domain`, `tags`, `context`, `trace`, `hint`, `public`,
    /// `owner`, `user`, `tenant`, `request`, `response`, `stacktrace` and,
    /// when the configuration enables it, `sources`.
    pub fn to_structured_map(&self) -> JsonMap {
        let mut payload = JsonMap::new();

        put(&mut payload, "error", Some(self.to_string()));
        put(&mut payload, "code", self.code());
        put(&mut payload, "time", self.time().map(|time| time.to_rfc3339()));
        put(&mut payload, "duration", self.duration().map(|duration| format!("{:?}", duration)));
        put(&mut payload, "domain", self.domain());

        let tags = self.tags();
        if !tags.is_empty() {
            payload.insert("tags".into(), JsonValue::from(tags));
        }
        let context = self.context();
        if !context.is_empty() {
            payload.insert("context".into(), JsonValue::Object(context));
        }

        put(&mut payload, "trace", self.trace());
        put(&mut payload, "hint", self.hint());
        put(&mut payload, "public", self.public());
        put(&mut payload, "owner", self.owner());

        if let Some(user) = identity(self.user()) {
            payload.insert("user".into(), JsonValue::Object(user));
        }
        if let Some(tenant) = identity(self.tenant()) {
            payload.insert("tenant".into(), JsonValue::Object(tenant));
        }

        put(&mut payload, "request", self.request_attachment().map(|(req, body)| req.dump(body)));
        put(&mut payload, "response", self.response_attachment().map(|(res, body)| res.dump(body)));
        put(&mut payload, "stacktrace", Some(self.stacktrace()));

        if self.config.show_sources {
            put(&mut payload, "sources", Some(self.sources()));
        }

        payload
    }

    /// Display adapter for this record.
    #[inline]
    pub fn formatter(&self) -> RecordFormatter<'_> {
        RecordFormatter { record: self, verbose: false, sources: self.config.show_sources }
    }
}

fn put<S: AsRef<str>>(payload: &mut JsonMap, key: &str, value: Option<S>) {
    if let Some(value) = value {
        let value = value.as_ref();
        if !value.is_empty() {
            payload.insert(key.to_owned(), JsonValue::String(value.to_owned()));
        }
    }
}

fn identity((id, mut data): (Option<&str>, JsonMap)) -> Option<JsonMap> {
    if let Some(id) = id {
        data.insert("id".into(), JsonValue::String(id.to_owned()));
    }
    (!data.is_empty()).then_some(data)
}

/// Formats a record either as its one-line summary or as a full report.
///
/// # Examples
///
/// ```
/// use error_strata::ErrorBuilder;
///
/// let err = ErrorBuilder::new().code("E42").hint("retry later").build("quota exceeded");
/// let report = err.formatter().verbose().to_string();
///
/// assert!(report.starts_with("Oops: quota exceeded\n"));
/// assert!(report.contains("Code: E42\n"));
/// assert!(report.contains("Hint: retry later\n"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecordFormatter<'a> {
    record: &'a ErrorRecord,
    verbose: bool,
    sources: bool,
}

impl RecordFormatter<'_> {
    /// Renders every resolved attribute, the trace and optionally sources.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Overrides whether source fragments are included in verbose output.
    #[must_use]
    pub fn with_sources(mut self, sources: bool) -> Self {
        self.sources = sources;
        self
    }

    fn write_report(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        writeln!(f, "Oops: {}", record.summary())?;

        line(f, "Code", record.code())?;
        line(f, "Time", record.time().map(|time| time.to_rfc3339()))?;
        line(f, "Duration", record.duration().map(|duration| format!("{:?}", duration)))?;
        line(f, "Domain", record.domain())?;
        let tags = record.tags();
        if !tags.is_empty() {
            writeln!(f, "Tags: {}", tags.join(", "))?;
        }
        line(f, "Trace", record.trace())?;
        line(f, "Hint", record.hint())?;
        line(f, "Public", record.public())?;
        line(f, "Owner", record.owner())?;

        section(f, "Context", &record.context())?;
        if let Some(user) = identity(record.user()) {
            section(f, "User", &user)?;
        }
        if let Some(tenant) = identity(record.tenant()) {
            section(f, "Tenant", &tenant)?;
        }

        if let Some((request, with_body)) = record.request_attachment() {
            dump(f, "Request", &request.dump(with_body))?;
        }
        if let Some((response, with_body)) = record.response_attachment() {
            dump(f, "Response", &response.dump(with_body))?;
        }

        let stacktrace = record.stacktrace();
        if !stacktrace.is_empty() {
            writeln!(f, "Stacktrace:")?;
            for text in stacktrace.lines() {
                writeln!(f, "  {}", text)?;
            }
        }

        if self.sources {
            let sources = record.sources();
            if !sources.is_empty() {
                writeln!(f, "Sources:")?;
                writeln!(f, "{}", sources)?;
            }
        }
        Ok(())
    }
}

impl Display for RecordFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.verbose {
            self.write_report(f)
        } else {
            f.write_str(&self.record.summary())
        }
    }
}

fn line<S: AsRef<str>>(f: &mut fmt::Formatter<'_>, label: &str, value: Option<S>) -> fmt::Result {
    match value {
        Some(value) if !value.as_ref().is_empty() => writeln!(f, "{}: {}", label, value.as_ref()),
        _ => Ok(()),
    }
}

fn section(f: &mut fmt::Formatter<'_>, label: &str, entries: &JsonMap) -> fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(f, "{}:", label)?;
    for (key, value) in entries {
        writeln!(f, "  * {}: {}", key, display_json(value))?;
    }
    Ok(())
}

fn dump(f: &mut fmt::Formatter<'_>, label: &str, text: &str) -> fmt::Result {
    writeln!(f, "{}:", label)?;
    for text in text.lines().filter(|text| !text.is_empty()) {
        writeln!(f, "  * {}", text)?;
    }
    Ok(())
}
