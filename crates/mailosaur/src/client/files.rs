//! Raw email and attachment downloads

use super::{MailosaurClient, segment};
use crate::error::{Error, Result};
use crate::models::{Attachment, AttachmentId, MessageId};

/// Operations on `api/files`
pub struct Files<'a> {
    client: &'a MailosaurClient,
}

impl<'a> Files<'a> {
    pub(super) fn new(client: &'a MailosaurClient) -> Self {
        Self { client }
    }

    /// Download the raw source (.eml) of an email
    pub fn get_email(&self, id: &MessageId) -> Result<Vec<u8>> {
        let path = format!("api/files/email/{}", segment(id.as_str()));
        self.client.http.get_bytes(&path)
    }

    /// Download the raw source of an email as text
    pub fn get_email_text(&self, id: &MessageId) -> Result<String> {
        let bytes = self.get_email(id)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Download an attachment payload
    pub fn get_attachment(&self, id: &AttachmentId) -> Result<Vec<u8>> {
        let path = format!("api/files/attachments/{}", segment(id.as_str()));
        self.client.http.get_bytes(&path)
    }

    /// Download an attachment and check it against its metadata length
    pub fn get_attachment_for(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        let bytes = self.get_attachment(&attachment.id)?;
        if bytes.len() as u64 != attachment.length {
            return Err(Error::Transport {
                message: format!(
                    "attachment {} is {} bytes, metadata says {}",
                    attachment.id,
                    bytes.len(),
                    attachment.length
                ),
            });
        }
        Ok(bytes)
    }
}
