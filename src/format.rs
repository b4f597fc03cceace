//! The two wire formats a hook can render entries into.
//!
//! Both shapes are flat JSON objects whose field names are a compatibility
//! contract with downstream consumers (for example a Logstash-style
//! shipping pipeline). Timestamps are RFC 3339 in UTC with up to
//! nanosecond precision.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::entry::Entry;
use crate::error::Error;

/// Output format selector, parsed from the configuration's format tag.
///
/// Parsing happens once, at hook construction; an unrecognized tag is
/// rejected there with [`Error::UnknownFormat`]. Dispatch therefore never
/// sees an invalid format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Logstash-style v0: metadata at the top level under `@`-prefixed
    /// keys, entry fields nested under `@fields`.
    V0,
    /// Flat v1: metadata and entry fields merged into one top-level map.
    V1,
}

impl MessageFormat {
    /// The configuration tag naming this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFormat::V0 => "v0",
            MessageFormat::V1 => "v1",
        }
    }

    /// Renders an entry into this format's JSON shape.
    ///
    /// Pure; does not touch the network. Entry fields are merged last, so a
    /// field named like a built-in key (`host`, `message`, `level`,
    /// `application`, `@timestamp`) silently overwrites it. That hazard is
    /// part of the wire contract and applies to v0's nested `@fields` map
    /// symmetrically.
    pub fn render(&self, entry: &Entry, app: &str, hostname: &str) -> Map<String, Value> {
        match self {
            MessageFormat::V0 => v0_message(entry, app, hostname),
            MessageFormat::V1 => v1_message(entry, app, hostname),
        }
    }
}

impl FromStr for MessageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v0" => Ok(MessageFormat::V0),
            "v1" => Ok(MessageFormat::V1),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn rfc3339(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn v0_message(entry: &Entry, app: &str, hostname: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("level".to_owned(), entry.level.as_str().into());
    fields.insert("application".to_owned(), app.into());
    for (key, value) in &entry.fields {
        fields.insert(key.clone(), value.clone());
    }

    let mut message = Map::new();
    message.insert("@timestamp".to_owned(), rfc3339(&entry.timestamp).into());
    message.insert("@source_host".to_owned(), hostname.into());
    message.insert("@message".to_owned(), entry.message.clone().into());
    message.insert("@fields".to_owned(), Value::Object(fields));
    message
}

fn v1_message(entry: &Entry, app: &str, hostname: &str) -> Map<String, Value> {
    let mut message = Map::new();
    message.insert("@timestamp".to_owned(), rfc3339(&entry.timestamp).into());
    message.insert("host".to_owned(), hostname.into());
    message.insert("message".to_owned(), entry.message.clone().into());
    message.insert("level".to_owned(), entry.level.as_str().into());
    message.insert("application".to_owned(), app.into());
    for (key, value) in &entry.fields {
        message.insert(key.clone(), value.clone());
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Level;
    use chrono::{TimeZone, Timelike};

    fn sample_entry() -> Entry {
        Entry::new(Level::Warn, "disk almost full")
            .with_timestamp(Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap())
            .with_field("animal", "walrus")
            .with_field("free_bytes", 1024)
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("v0".parse::<MessageFormat>().unwrap(), MessageFormat::V0);
        assert_eq!("v1".parse::<MessageFormat>().unwrap(), MessageFormat::V1);
    }

    #[test]
    fn test_parse_unknown_tag() {
        let err = "v2".parse::<MessageFormat>().unwrap_err();
        assert!(matches!(err, Error::UnknownFormat(_)));
        assert!(err.to_string().contains("unknown message format"));
    }

    #[test]
    fn test_v0_shape() {
        let message = MessageFormat::V0.render(&sample_entry(), "billing", "app-01");

        assert_eq!(message["@timestamp"], "2024-05-17T08:30:00Z");
        assert_eq!(message["@source_host"], "app-01");
        assert_eq!(message["@message"], "disk almost full");

        let fields = message["@fields"].as_object().unwrap();
        assert_eq!(fields["level"], "warning");
        assert_eq!(fields["application"], "billing");
        assert_eq!(fields["animal"], "walrus");
        assert_eq!(fields["free_bytes"], 1024);
        assert_eq!(message.len(), 4);
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_v1_shape() {
        let message = MessageFormat::V1.render(&sample_entry(), "billing", "app-01");

        assert_eq!(message["@timestamp"], "2024-05-17T08:30:00Z");
        assert_eq!(message["host"], "app-01");
        assert_eq!(message["message"], "disk almost full");
        assert_eq!(message["level"], "warning");
        assert_eq!(message["application"], "billing");
        assert_eq!(message["animal"], "walrus");
        assert_eq!(message["free_bytes"], 1024);
        assert_eq!(message.len(), 7);
    }

    #[test]
    fn test_v1_entry_field_overwrites_builtin() {
        let entry = sample_entry().with_field("host", "impostor");
        let message = MessageFormat::V1.render(&entry, "billing", "app-01");

        assert_eq!(message["host"], "impostor");
        assert_eq!(message.len(), 8);
    }

    #[test]
    fn test_v0_entry_field_overwrites_builtin() {
        let entry = sample_entry().with_field("level", "shouting");
        let message = MessageFormat::V0.render(&entry, "billing", "app-01");

        assert_eq!(message["@fields"]["level"], "shouting");
    }

    #[test]
    fn test_nanosecond_timestamp() {
        let entry = sample_entry().with_timestamp(
            Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0)
                .unwrap()
                .with_nanosecond(123_456_789)
                .unwrap(),
        );
        let message = MessageFormat::V1.render(&entry, "billing", "app-01");

        assert_eq!(message["@timestamp"], "2024-05-17T08:30:00.123456789Z");
    }

    #[test]
    fn test_serialize_round_trip() {
        let message = MessageFormat::V0.render(&sample_entry(), "billing", "app-01");
        let bytes = serde_json::to_vec(&message).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed, Value::Object(message));
    }
}
