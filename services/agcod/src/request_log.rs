use serde::Serialize;
use serde_json::Value;

use crate::payload::unique_suffix;

/// Debug entries collected while a single request is built, signed and sent.
///
/// Every entry is forwarded to `log::debug!`. Entries are only kept when the
/// log is enabled, in which case they are attached to the response or error
/// of that request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestLog {
    id: Option<String>,
    entries: Vec<Value>,
}

impl RequestLog {
    /// Create a log, enabled when `debug` is set.
    pub fn new(debug: bool) -> Self {
        if debug {
            Self {
                id: Some(unique_suffix()),
                entries: Vec::new(),
            }
        } else {
            Self::disabled()
        }
    }

    /// A log that keeps nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether entries are kept.
    pub fn is_enabled(&self) -> bool {
        self.id.is_some()
    }

    /// Id shared by the entries of this request, if enabled.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Kept entries, each shaped `{"<key>": <value>}`.
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Record an entry.
    pub fn write(&mut self, key: &str, value: Value) {
        log::debug!("[{}] {key}: {value}", self.id.as_deref().unwrap_or("-"));

        if self.is_enabled() {
            let mut entry = serde_json::Map::with_capacity(1);
            entry.insert(key.to_string(), value);
            self.entries.push(Value::Object(entry));
        }
    }
}
