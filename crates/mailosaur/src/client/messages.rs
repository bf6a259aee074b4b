//! Message operations: list, get, search, wait and delete

use chrono::{DateTime, Utc};
use log::info;

use super::{MailosaurClient, segment};
use crate::error::Result;
use crate::models::{Email, MessageId, SearchCriteria, ServerId};
use crate::wait::{WaitOptions, poll_until};

/// Operations on `api/messages`
pub struct Messages<'a> {
    client: &'a MailosaurClient,
}

impl<'a> Messages<'a> {
    pub(super) fn new(client: &'a MailosaurClient) -> Self {
        Self { client }
    }

    /// List email summaries held by a server
    pub fn list(&self, server: &ServerId) -> Result<Vec<Email>> {
        self.client
            .http
            .get_json("api/messages", &[("server", server.as_str())])
    }

    /// Get a full email including bodies, links and images
    pub fn get(&self, id: &MessageId) -> Result<Email> {
        let path = format!("api/messages/{}", segment(id.as_str()));
        self.client.http.get_json(&path, &[])
    }

    /// Find email summaries on a server matching `criteria`.
    ///
    /// Criteria are validated before any request is sent.
    pub fn search(&self, server: &ServerId, criteria: &SearchCriteria) -> Result<Vec<Email>> {
        criteria.validate()?;
        self.client.http.post_json(
            "api/messages/search",
            &[("server", server.as_str())],
            criteria,
        )
    }

    /// Wait for an email matching `criteria` using the client's default
    /// wait options, and return it in full.
    ///
    /// Only emails received after this call starts, less the configured
    /// `lookback`, are considered.
    pub fn wait_for(&self, server: &ServerId, criteria: &SearchCriteria) -> Result<Email> {
        self.wait_for_with(server, criteria, self.client.wait_options())
    }

    /// Wait for an email matching `criteria` with explicit options.
    ///
    /// Polls `search` until a summary received at or after the baseline
    /// appears, then fetches the earliest such email. Fails with
    /// `Error::Timeout` at the deadline and `Error::Cancelled` when the
    /// token fires; any other error ends the wait immediately.
    pub fn wait_for_with(
        &self,
        server: &ServerId,
        criteria: &SearchCriteria,
        options: &WaitOptions,
    ) -> Result<Email> {
        criteria.validate()?;
        let baseline = options.baseline(Utc::now());

        let id = poll_until(options, || {
            let results = self.search(server, criteria)?;
            Ok(earliest_since(&results, baseline).map(|email| email.id.clone()))
        })?;

        info!("Matching email {} arrived on server {}", id, server);
        self.get(&id)
    }

    /// Delete every email on a server. Safe to repeat.
    pub fn delete_all(&self, server: &ServerId) -> Result<()> {
        self.client
            .http
            .delete("api/messages", &[("server", server.as_str())])?;
        info!("Deleted all emails on server {}", server);
        Ok(())
    }

    /// Delete one email. Deleting it again fails with `Error::NotFound`.
    pub fn delete(&self, id: &MessageId) -> Result<()> {
        let path = format!("api/messages/{}", segment(id.as_str()));
        self.client.http.delete(&path, &[])?;
        info!("Deleted email {}", id);
        Ok(())
    }
}

/// The earliest email received at or after `baseline`
fn earliest_since(emails: &[Email], baseline: DateTime<Utc>) -> Option<&Email> {
    emails
        .iter()
        .filter(|email| email.received >= baseline)
        .min_by_key(|email| email.received)
}
