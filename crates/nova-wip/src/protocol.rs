//! Wire-level records consumed by the value model.
//!
//! These mirror the `Runtime.RemoteObject` / `Runtime.getProperties` shapes of
//! the WebKit inspector protocol. Parsing is done upstream; the types derive
//! `serde` so the transport layer (and tests) can decode them straight from
//! JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle identifying a remote object for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Protocol type tag of a remote value.
///
/// Tags the model does not know about are kept verbatim in [`RemoteType::Unknown`]
/// so they can be reported; they never fail decoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RemoteType {
    String,
    Boolean,
    Number,
    Null,
    Undefined,
    Object,
    Array,
    Function,
    Unknown(String),
}

impl RemoteType {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "object" => Self::Object,
            "array" => Self::Array,
            "function" => Self::Function,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Object => "object",
            Self::Array => "array",
            Self::Function => "function",
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<String> for RemoteType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<RemoteType> for String {
    fn from(tag: RemoteType) -> Self {
        match tag {
            RemoteType::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RemoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `RemoteObject` descriptor. Produced once per protocol message and
/// never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteValueRecord {
    #[serde(rename = "type")]
    pub remote_type: RemoteType,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_children: Option<bool>,
}

impl RemoteValueRecord {
    pub fn primitive(remote_type: RemoteType, description: impl Into<String>) -> Self {
        Self {
            remote_type,
            description: description.into(),
            object_id: None,
            has_children: None,
        }
    }

    pub fn object(
        remote_type: RemoteType,
        description: impl Into<String>,
        object_id: impl Into<ObjectId>,
        has_children: bool,
    ) -> Self {
        Self {
            remote_type,
            description: description.into(),
            object_id: Some(object_id.into()),
            has_children: Some(has_children),
        }
    }

    /// Whether the remote side may report properties for this value.
    ///
    /// The protocol omits `hasChildren` for some objects; an absent flag is
    /// treated as "maybe", which means the properties get fetched on demand.
    pub fn has_children(&self) -> bool {
        self.has_children.unwrap_or(true)
    }
}

/// A single named property as returned by the property source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    pub value: RemoteValueRecord,
}

impl PropertyRecord {
    pub fn new(name: impl Into<String>, value: RemoteValueRecord) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Raw property list of one remote object (`Runtime.getProperties` result).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProperties {
    #[serde(rename = "result", default)]
    pub properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub internal_properties: Vec<PropertyRecord>,
}
