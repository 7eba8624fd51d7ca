mod digest;
pub mod domain;
mod hr;
mod message;
mod notifier;
mod parser;

pub use digest::{ArtifactWriteError, DailyDigestWorkflow, DigestRunReport, StageStatus};
pub use hr::{HrGateway, HrGatewayError, HttpHrClient};
pub use message::format_digest_message;
pub use notifier::{ChatNotifier, HttpChatNotifier, NotifyError};
pub use parser::FeedParseError;
