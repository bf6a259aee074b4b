//! Domain models returned by the Mailosaur API

mod analysis;
mod criteria;
mod email;
mod ids;

pub use analysis::{SpamAnalysisResult, SpamAssassinRule};
pub use criteria::{SearchCriteria, is_valid_address};
pub use email::{Attachment, Email, EmailAddress, HeaderValue, HtmlContent, Image, Link, TextContent};
pub use ids::{AttachmentId, MessageId, ServerId};
