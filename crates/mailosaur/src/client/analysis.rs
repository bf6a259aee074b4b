//! Spam analysis operations

use super::{MailosaurClient, segment};
use crate::error::Result;
use crate::models::{MessageId, SpamAnalysisResult};

/// Operations on `api/analysis`
pub struct Analysis<'a> {
    client: &'a MailosaurClient,
}

impl<'a> Analysis<'a> {
    pub(super) fn new(client: &'a MailosaurClient) -> Self {
        Self { client }
    }

    /// Run the service's spam filters against an email
    pub fn spam(&self, id: &MessageId) -> Result<SpamAnalysisResult> {
        let path = format!("api/analysis/spam/{}", segment(id.as_str()));
        self.client.http.get_json(&path, &[])
    }
}
