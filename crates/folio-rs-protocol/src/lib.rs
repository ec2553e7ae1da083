//! Wire types shared between edit sessions and persistence endpoints.

mod endpoint;
mod error;

pub use endpoint::RecordEndpoint;
pub use error::EndpointError;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier assigned to a stored record by the endpoint.
pub type RecordId = String;

/// Record classification sent with every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentKind {
    /// Record type, e.g. `layout` or `home`.
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record subtype, e.g. `header` or `footer`.
    pub subtype: String,
}

impl ContentKind {
    /// Build a kind from its type and subtype.
    pub fn new(record_type: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            subtype: subtype.into(),
        }
    }
}

/// Binary payload staged for upload alongside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFile {
    /// File name reported to the endpoint.
    pub file_name: String,
    /// MIME type of the payload.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl BinaryFile {
    /// Build a binary payload.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// A single multipart entry derived from a pending attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPart {
    /// Multipart field name.
    pub name: String,
    /// Dot path of the document field the attachment belongs to.
    pub path: String,
    /// File to upload, or `None` to ask the endpoint to remove the stored binary.
    pub file: Option<BinaryFile>,
}

/// Create or update request for a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    /// Record classification.
    pub kind: ContentKind,
    /// Existing record id; `None` creates a new record.
    pub id: Option<RecordId>,
    /// Documents to persist. Editors always send exactly one.
    pub values: Vec<Value>,
    /// Pending attachments.
    pub parts: Vec<AttachmentPart>,
}

impl SaveRequest {
    /// Encode `values` the way the endpoint expects it inside form bodies.
    pub fn values_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.values)
    }

    /// Text fields shared by JSON and multipart encodings.
    pub fn text_fields(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let mut fields = vec![
            ("type".to_string(), self.kind.record_type.clone()),
            ("subtype".to_string(), self.kind.subtype.clone()),
            ("values".to_string(), self.values_json()?),
        ];
        if let Some(id) = &self.id {
            fields.push(("id".to_string(), id.clone()));
        }
        Ok(fields)
    }

    /// Whether the request needs a multipart body.
    pub fn has_parts(&self) -> bool {
        !self.parts.is_empty()
    }
}

/// Record shape returned by fetch, create, and update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordEnvelope {
    /// Record id when the record exists.
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Stored documents.
    #[serde(default, deserialize_with = "deserialize_values")]
    pub values: Vec<Value>,
}

impl RecordEnvelope {
    /// Build an envelope holding a single document.
    pub fn single(id: Option<RecordId>, value: Value) -> Self {
        Self {
            id,
            values: vec![value],
        }
    }

    /// First stored document, if any.
    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Take the first stored document, if any.
    pub fn into_first(self) -> Option<Value> {
        self.values.into_iter().next()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValues {
    List(Vec<Value>),
    Encoded(String),
    Single(Value),
}

/// Accept ids encoded as strings or integers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WireId>::deserialize(deserializer)? {
        Some(WireId::Text(id)) if !id.is_empty() => Some(id),
        Some(WireId::Text(_)) | None => None,
        Some(WireId::Number(id)) => Some(id.to_string()),
    })
}

/// Accept `values` as an array, a JSON-encoded string, or a bare document.
fn deserialize_values<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = match Option::<WireValues>::deserialize(deserializer)? {
        Some(wire) => wire,
        None => return Ok(Vec::new()),
    };
    match wire {
        WireValues::List(values) => Ok(values),
        WireValues::Encoded(raw) => {
            if raw.trim().is_empty() {
                return Ok(Vec::new());
            }
            let decoded: Value = serde_json::from_str(&raw).map_err(serde::de::Error::custom)?;
            Ok(match decoded {
                Value::Array(values) => values,
                Value::Null => Vec::new(),
                value => vec![value],
            })
        }
        WireValues::Single(value) => Ok(vec![value]),
    }
}
