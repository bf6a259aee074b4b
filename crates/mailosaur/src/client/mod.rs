//! Mailosaur API client
//!
//! `MailosaurClient` owns the HTTP transport and hands out borrowed
//! operation groups, one per REST resource:
//! - `messages()` - list, get, search, wait for and delete emails
//! - `files()` - raw email sources and attachment payloads
//! - `analysis()` - spam analysis
//! - `servers()` - disposable address generation

mod analysis;
mod files;
mod http;
mod messages;
mod servers;

pub use analysis::Analysis;
pub use files::Files;
pub use messages::Messages;
pub use servers::Servers;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::wait::WaitOptions;
use http::HttpTransport;

/// Client for the Mailosaur API.
///
/// Holds no mutable state; share it across threads freely.
pub struct MailosaurClient {
    http: HttpTransport,
    smtp_host: String,
    wait: WaitOptions,
}

impl MailosaurClient {
    /// Create a new client from an explicit configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::validation("API key must not be empty"));
        }

        Ok(Self {
            http: HttpTransport::new(&config),
            smtp_host: config.smtp_host,
            wait: config.wait,
        })
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    pub fn files(&self) -> Files<'_> {
        Files::new(self)
    }

    pub fn analysis(&self) -> Analysis<'_> {
        Analysis::new(self)
    }

    pub fn servers(&self) -> Servers<'_> {
        Servers::new(self)
    }

    /// Default options used by `Messages::wait_for`
    pub fn wait_options(&self) -> &WaitOptions {
        &self.wait
    }
}

/// Encode an id for use as a single path segment
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
