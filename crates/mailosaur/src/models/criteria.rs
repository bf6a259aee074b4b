//! Search criteria for finding emails on a server

use serde::Serialize;

use crate::error::{Error, Result};

/// Predicates for `search` and `wait_for`.
///
/// At least one field must be set. Matching semantics are decided by the
/// service.
///
/// Blank fields count as unset: they are neither validated nor sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "is_blank")]
    pub sent_to: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub body: Option<String>,
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(|value| value.trim().is_empty())
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_to(mut self, address: impl Into<String>) -> Self {
        self.sent_to = Some(address.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        [&self.sent_to, &self.subject, &self.body]
            .into_iter()
            .all(is_blank)
    }

    /// Reject criteria the service would refuse
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::validation(
                "search criteria must set at least one of sentTo, subject or body",
            ));
        }

        if let Some(address) = &self.sent_to
            && !is_blank(&self.sent_to)
            && !is_valid_address(address)
        {
            return Err(Error::validation(format!(
                "sentTo is not a valid email address: {}",
                address
            )));
        }

        Ok(())
    }
}

/// Check that a string looks like a deliverable `local@domain` address
pub fn is_valid_address(address: &str) -> bool {
    let Some((local, domain)) = address.rsplit_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && !local.contains('@');

    let domain_ok = !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');

    local_ok && domain_ok && !address.chars().any(char::is_whitespace)
}
