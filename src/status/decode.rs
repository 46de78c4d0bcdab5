use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use super::{null_as_default, unescape_unicode, Description, Players, ServerStatus, Version};
use crate::{error::QueryError, logging::StatusLogger};

/// Shape of the status JSON as servers send it.
#[derive(Deserialize)]
struct WireStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    version: Version,
    #[serde(default, deserialize_with = "null_as_default")]
    players: Players,
    #[serde(default)]
    description: Option<WireDescription>,
    #[serde(default)]
    favicon: Option<String>,
}

/// `description` is either a bare string or a text component.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireDescription {
    Plain(String),
    Component(Description),
}

impl From<WireDescription> for Description {
    fn from(value: WireDescription) -> Self {
        match value {
            WireDescription::Plain(text) => Description::plain(text),
            WireDescription::Component(component) => component,
        }
    }
}

impl From<WireStatus> for ServerStatus {
    fn from(wire: WireStatus) -> Self {
        ServerStatus {
            version: wire.version,
            players: wire.players,
            description: wire.description.map(Description::from).unwrap_or_default(),
            favicon: wire.favicon,
        }
    }
}

/// Decodes the JSON payload of a status response.
///
/// Payloads that do not fit the expected shape are decoded field by field;
/// only input that is not a JSON object at all is an error.
pub fn decode_status(raw: &[u8]) -> Result<ServerStatus, QueryError> {
    let mut status = match serde_json::from_slice::<WireStatus>(raw) {
        Ok(wire) => ServerStatus::from(wire),
        Err(err) => {
            StatusLogger::decode_fallback(&err);
            decode_lenient(raw).map_err(QueryError::decode)?
        }
    };

    status.description.text = unescape_unicode(&status.description.text).into_owned();
    for extra in &mut status.description.extra {
        extra.text = unescape_unicode(&extra.text).into_owned();
    }

    Ok(status)
}

fn decode_lenient(raw: &[u8]) -> Result<ServerStatus, serde_json::Error> {
    let value: Value = serde_json::from_slice(raw)?;
    let Value::Object(fields) = value else {
        return Err(serde::de::Error::custom("status payload is not a JSON object"));
    };

    Ok(ServerStatus {
        version: field_or_default(fields.get("version")),
        players: field_or_default(fields.get("players")),
        description: normalize_description(fields.get("description")),
        favicon: fields
            .get("favicon")
            .and_then(Value::as_str)
            .map(str::to_owned),
    })
}

fn field_or_default<T: DeserializeOwned + Default>(value: Option<&Value>) -> T {
    value
        .and_then(|value| T::deserialize(value).ok())
        .unwrap_or_default()
}

fn normalize_description(value: Option<&Value>) -> Description {
    match value {
        Some(Value::String(text)) => Description::plain(text.as_str()),
        Some(Value::Object(component)) => component
            .get("text")
            .and_then(Value::as_str)
            .map(Description::plain)
            .unwrap_or_default(),
        _ => Description::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::status::DescriptionExtra;

    #[test]
    fn full_payload() {
        let raw = br#"{
            "version": {"name": "1.19.2", "protocol": 760},
            "players": {"max": 100, "online": 5, "sample": [
                {"name": "alice", "id": "4566e69f-c907-48ee-8d71-d7ba5aa00d20"},
                {"name": "bob", "id": "00000000-0000-0000-0000-000000000000"}
            ]},
            "description": {"text": "Hi"},
            "favicon": "data:image/png;base64,AAAA"
        }"#;
        let status = decode_status(raw).unwrap();
        assert_eq!(status.version.name, "1.19.2");
        assert_eq!(status.version.protocol, 760);
        assert_eq!(status.players.max, 100);
        assert_eq!(status.players.online, 5);
        let names: Vec<_> = status.players.sample.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["alice", "bob"]);
        assert_eq!(status.description, Description::plain("Hi"));
        assert_eq!(status.favicon.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn plain_string_description() {
        let status = decode_status(br#"{"description":"Hello"}"#).unwrap();
        assert_eq!(status.description, Description::plain("Hello"));
    }

    #[test]
    fn component_description_keeps_extra() {
        let raw = br#"{"description":{"text":"Hi","extra":[{"text":"!"},{"text":"?","color":"gold"}]}}"#;
        let status = decode_status(raw).unwrap();
        assert_eq!(status.description.text, "Hi");
        assert_eq!(
            status.description.extra,
            vec![
                DescriptionExtra {
                    text: "!".into(),
                    color: None
                },
                DescriptionExtra {
                    text: "?".into(),
                    color: Some("gold".into())
                },
            ]
        );
    }

    #[test]
    fn numeric_description_is_empty() {
        let raw = br#"{"version":{"name":"1.20.1","protocol":763},"description":42}"#;
        let status = decode_status(raw).unwrap();
        assert_eq!(status.description, Description::default());
        // the rest of the payload survives the fallback
        assert_eq!(status.version.protocol, 763);
    }

    #[test]
    fn fallback_keeps_component_text_only() {
        // extra entries given as bare strings do not fit the component shape
        let raw = br#"{"players":{"max":20,"online":1},"description":{"text":"Lobby","extra":["a","b"]}}"#;
        let status = decode_status(raw).unwrap();
        assert_eq!(status.description, Description::plain("Lobby"));
        assert_eq!(status.players.max, 20);
    }

    #[test]
    fn fallback_drops_only_broken_fields() {
        let raw = br#"{"version":"weird","players":{"max":8,"online":2},"description":null}"#;
        let status = decode_status(raw).unwrap();
        assert_eq!(status.version, Version::default());
        assert_eq!(status.players.online, 2);
        assert_eq!(status.description, Description::default());
    }

    #[test]
    fn missing_description_is_empty() {
        let status = decode_status(br#"{"players":{"max":1,"online":0}}"#).unwrap();
        assert_eq!(status.description.text, "");
        assert!(status.favicon.is_none());
    }

    #[test]
    fn escapes_are_resolved_in_all_text() {
        let raw = br#"{"description":{"text":"Caf\\u00e9","extra":[{"text":"\\u2764 me"}]}}"#;
        let status = decode_status(raw).unwrap();
        assert_eq!(status.description.text, "Café");
        assert_eq!(status.description.extra[0].text, "❤ me");
    }

    #[test]
    fn null_fields_keep_their_siblings() {
        let raw = br#"{
            "version": {"name": null, "protocol": 760},
            "players": {"max": 100, "online": 5, "sample": null},
            "description": {"text": "Hi", "extra": null}
        }"#;
        let status = decode_status(raw).unwrap();
        assert_eq!(status.version.name, "");
        assert_eq!(status.version.protocol, 760);
        assert_eq!(status.players.max, 100);
        assert_eq!(status.players.online, 5);
        assert!(status.players.sample.is_empty());
        assert_eq!(status.description, Description::plain("Hi"));
    }

    #[test]
    fn null_inside_sample_entry() {
        let raw = br#"{"players":{"max":10,"online":1,"sample":[{"name":"alice","id":null}]}}"#;
        let status = decode_status(raw).unwrap();
        assert_eq!(status.players.max, 10);
        assert_eq!(status.players.sample.len(), 1);
        assert_eq!(status.players.sample[0].name, "alice");
        assert_eq!(status.players.sample[0].id, "");
    }

    #[test]
    fn lone_surrogate_leaves_no_escape_behind() {
        let status = decode_status(br#"{"description":"a \ud83d b"}"#).unwrap();
        assert_eq!(status.description.text, "a \u{fffd} b");
        assert!(!status.description.text.contains("\\u"));
    }

    #[test]
    fn not_json_is_a_decode_error() {
        let err = decode_status(b"not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = decode_status(b"[1,2,3]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
