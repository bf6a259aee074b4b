//! Email model as returned by the messages API

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{AttachmentId, MessageId, ServerId};

/// An email address with display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name (e.g., "John Doe"), empty when the sender gave none
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Email address (e.g., "john@example.com")
    pub address: String,
}

impl EmailAddress {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Format as it appears in a From/To header
    pub fn display(&self) -> String {
        if self.name.is_empty() {
            self.address.clone()
        } else {
            format!("{} <{}>", self.name, self.address)
        }
    }
}

/// A header value; repeated headers (e.g. Received) carry several values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderValue {
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(v) => Some(v),
            Self::Multiple(vs) => vs.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(v) => vec![v.as_str()],
            Self::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

/// A hyperlink extracted from a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    /// Link text; absent for image-only anchors
    #[serde(default)]
    pub text: Option<String>,
}

/// An image extracted from the HTML body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image source; inline images use a `cid:` reference
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

impl Image {
    pub fn is_inline(&self) -> bool {
        self.src.starts_with("cid:")
    }
}

/// HTML part of an email with extracted links and images
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HtmlContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
}

/// Plain-text part of an email with extracted links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
}

/// Attachment metadata; the payload is fetched separately by id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: AttachmentId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: String,
    /// Payload size in bytes
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// An email held by the service.
///
/// Summaries returned by list and search carry metadata and attachment
/// metadata only; `html` and `text` are populated by `get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: MessageId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: Vec<EmailAddress>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: Vec<EmailAddress>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cc: Vec<EmailAddress>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bcc: Vec<EmailAddress>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    /// Host that delivered the email to the service
    #[serde(default, deserialize_with = "null_as_default")]
    pub senderhost: String,
    #[serde(default)]
    pub server: Option<ServerId>,
    pub received: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, HeaderValue>,
    #[serde(default)]
    pub html: Option<HtmlContent>,
    #[serde(default)]
    pub text: Option<TextContent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

impl Email {
    /// Look up a header value, ignoring the casing chosen by the sending server
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.first())
    }

    /// True when this is a list/search summary without bodies
    pub fn is_summary(&self) -> bool {
        self.html.is_none() && self.text.is_none()
    }

    pub fn attachment(&self, id: &AttachmentId) -> Option<&Attachment> {
        self.attachments.iter().find(|a| &a.id == id)
    }

    /// Whether any To recipient has the given address (case-insensitive)
    pub fn sent_to(&self, address: &str) -> bool {
        self.to
            .iter()
            .any(|a| a.address.eq_ignore_ascii_case(address))
    }
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
