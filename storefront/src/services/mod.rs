// storefront/src/services/mod.rs

pub mod mailer;

pub use mailer::{MailNotifier, MailTransport, MockMailTransport, OutgoingMail, SentEmailInfo};
