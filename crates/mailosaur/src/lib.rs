//! Mailosaur crate - Typed client for the Mailosaur email-testing API
//!
//! This crate provides:
//! - Domain models (Email, Attachment, SpamAnalysisResult)
//! - An authenticated HTTP client for the messages, files, analysis and
//!   servers resources
//! - Bounded, cancellable waiting for emails to arrive
//! - Configuration loading from a config file or the environment
//!
//! Email parsing, spam scoring and storage all happen in the service; this
//! crate only calls it. All operations are synchronous and return
//! [`Result`], so the client can be used from any executor.
//!
//! ```no_run
//! use mailosaur::{ClientConfig, MailosaurClient, SearchCriteria, ServerId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MailosaurClient::new(ClientConfig::load()?)?;
//! let server = ServerId::new("abc123");
//!
//! let address = client.servers().generate_email_address(&server);
//! // ... send an email to `address` ...
//! let email = client
//!     .messages()
//!     .wait_for(&server, &SearchCriteria::new().sent_to(&address))?;
//! println!("{}", email.subject);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod wait;

pub use client::{Analysis, Files, MailosaurClient, Messages, Servers};
pub use crate::config::ClientConfig;
pub use error::{Error, Result};
pub use models::{
    Attachment, AttachmentId, Email, EmailAddress, HeaderValue, HtmlContent, Image, Link,
    MessageId, SearchCriteria, ServerId, SpamAnalysisResult, SpamAssassinRule, TextContent,
    is_valid_address,
};
pub use wait::{CancellationToken, WaitOptions};
