//! Server list status model and the decoder that produces it.

mod decode;
mod unescape;

pub use decode::decode_status;
pub use unescape::unescape_unicode;

use serde::{Deserialize, Deserializer, Serialize};

/// Status reported by a server in reply to a server list ping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: Version,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Players,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Description,
    /// `data:image/png;base64,...` icon, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    #[serde(default, deserialize_with = "null_as_default")]
    pub max: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub online: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sample: Vec<PlayerSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSample {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
}

/// Message of the day in its normalized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub extra: Vec<DescriptionExtra>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionExtra {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Description {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Vec::new(),
        }
    }
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
