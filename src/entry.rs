//! The log-entry data model handed to hooks by a logging pipeline.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Severity of a log entry, in ascending urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Verbose diagnostic output.
    Debug,
    /// Routine operational messages.
    Info,
    /// Something unexpected, not yet an error.
    Warn,
    /// An operation failed.
    Error,
    /// The application cannot continue.
    Fatal,
    /// An unrecoverable programming error.
    Panic,
}

impl Level {
    /// All six severities, in ascending urgency.
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    /// The wire name of the level as it appears in rendered messages.
    ///
    /// `Warn` renders as `"warning"`; downstream Logstash-style consumers
    /// key on these exact spellings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured log event.
///
/// Produced by whatever logging pipeline the caller runs and handed to
/// [`Hook::fire`](crate::Hook::fire). The field map is open-ended; values
/// are arbitrary JSON.
#[derive(Debug, Clone)]
pub struct Entry {
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
    /// Severity of the event.
    pub level: Level,
    /// Free-text message.
    pub message: String,
    /// Structured fields attached to the event.
    pub fields: Map<String, Value>,
}

impl Entry {
    /// Creates an entry stamped with the current time and no fields.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields: Map::new(),
        }
    }

    /// Replaces the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attaches one structured field. Later values win on duplicate keys.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_levels() {
        assert_eq!(Level::ALL.len(), 6);
        assert_eq!(Level::ALL.first(), Some(&Level::Debug));
        assert_eq!(Level::ALL.last(), Some(&Level::Panic));
    }

    #[test]
    fn test_warn_wire_name() {
        assert_eq!(Level::Warn.as_str(), "warning");
        assert_eq!(format!("{}", Level::Warn), "warning");
    }

    #[test]
    fn test_with_field() {
        let entry = Entry::new(Level::Info, "hello")
            .with_field("animal", "walrus")
            .with_field("animal", "narwhal");

        assert_eq!(entry.fields.len(), 1);
        assert_eq!(entry.fields["animal"], "narwhal");
    }

    #[test]
    fn test_levels_ordered_by_urgency() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Error < Level::Panic);
    }
}
