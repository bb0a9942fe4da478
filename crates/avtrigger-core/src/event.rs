//! Inbound event envelope.
//!
//! The trigger is subscribed to two sources: object notifications from the
//! upload buckets and outcome notifications from the pipeline topic. Both
//! arrive as a `Records` list; only the first record is inspected, and its
//! origin is decided by which sub-shape (`s3` or `Sns`) it carries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TriggerError, TriggerResult};

/// Event name for a single-part object upload.
pub const EVENT_OBJECT_CREATED_PUT: &str = "ObjectCreated:Put";

/// Event name for a completed multipart object upload.
pub const EVENT_OBJECT_CREATED_MULTIPART: &str = "ObjectCreated:CompleteMultipartUpload";

// ── Wire shapes ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawEvent {
    /// Left untyped so that records after the first are never validated.
    #[serde(rename = "Records", default)]
    pub records: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(rename = "eventName", skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Entity>,
    #[serde(rename = "Sns", skip_serializing_if = "Option::is_none")]
    pub sns: Option<SnsMessage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Object {
    pub key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnsMessage {
    /// Raw attribute bodies; a `Value` is only read when asked for.
    #[serde(rename = "MessageAttributes", default)]
    pub message_attributes: BTreeMap<String, serde_json::Value>,
}

impl SnsMessage {
    /// String `Value` of an attribute, if present.
    pub fn attribute_value(&self, key: &str) -> Option<&str> {
        self.message_attributes
            .get(key)?
            .get("Value")?
            .as_str()
    }
}

// ── Classified envelope ────────────────────────────────────────────

/// An inbound event reduced to the one sub-shape the trigger acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Storage(StorageNotification),
    Topic(TopicNotification),
}

/// Object notification from an upload bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageNotification {
    pub bucket_name: String,
    /// Object key exactly as delivered (still URL-encoded).
    pub object_key: String,
    pub event_name: StorageEventKind,
}

/// The storage event names the trigger distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEventKind {
    Created,
    CreatedMultipart,
    Other(String),
}

impl StorageEventKind {
    pub fn parse(name: &str) -> Self {
        match name {
            EVENT_OBJECT_CREATED_PUT => Self::Created,
            EVENT_OBJECT_CREATED_MULTIPART => Self::CreatedMultipart,
            other => Self::Other(other.to_string()),
        }
    }

    /// The event name as delivered.
    pub fn name(&self) -> &str {
        match self {
            Self::Created => EVENT_OBJECT_CREATED_PUT,
            Self::CreatedMultipart => EVENT_OBJECT_CREATED_MULTIPART,
            Self::Other(name) => name,
        }
    }

    /// Whether this event means a new object landed in the bucket.
    pub fn is_object_created(&self) -> bool {
        matches!(self, Self::Created | Self::CreatedMultipart)
    }
}

/// Outcome notification from the pipeline topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicNotification {
    pub attributes: BTreeMap<String, String>,
}

impl TopicNotification {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Look up an attribute the current action cannot proceed without.
    pub fn require(&self, key: &str) -> TriggerResult<&str> {
        self.attribute(key)
            .ok_or_else(|| TriggerError::MissingAttribute(key.to_string()))
    }
}

impl InboundEvent {
    /// Parse and classify a raw JSON payload.
    ///
    /// Anything that is not a `Records` list whose first entry carries
    /// either an `s3` or an `Sns` body is a [`TriggerError::MalformedEvent`].
    pub fn from_value(value: &serde_json::Value) -> TriggerResult<Self> {
        let raw = RawEvent::deserialize(value)
            .map_err(|e| TriggerError::MalformedEvent(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawEvent) -> TriggerResult<Self> {
        let first = raw
            .records
            .into_iter()
            .next()
            .ok_or_else(|| TriggerError::MalformedEvent("event has no records".to_string()))?;
        let record = RawRecord::deserialize(first)
            .map_err(|e| TriggerError::MalformedEvent(e.to_string()))?;

        if let Some(s3) = record.s3 {
            let event_name = record.event_name.ok_or_else(|| {
                TriggerError::MalformedEvent("storage record has no eventName".to_string())
            })?;
            return Ok(Self::Storage(StorageNotification {
                bucket_name: s3.bucket.name,
                object_key: s3.object.key,
                event_name: StorageEventKind::parse(&event_name),
            }));
        }

        if let Some(sns) = record.sns {
            let attributes = sns
                .message_attributes
                .keys()
                .filter_map(|k| Some((k.clone(), sns.attribute_value(k)?.to_string())))
                .collect();
            return Ok(Self::Topic(TopicNotification { attributes }));
        }

        Err(TriggerError::MalformedEvent(
            "record is neither a storage nor a topic notification".to_string(),
        ))
    }

    /// Short label for the event source, used in log lines and replies.
    pub fn source_label(&self) -> &'static str {
        match self {
            Self::Storage(_) => "S3",
            Self::Topic(_) => "SNS",
        }
    }
}
