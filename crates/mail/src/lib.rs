//! Outgoing email for the barangay portal.
//!
//! - [`delivery`] -- SMTP configuration, the [`Mailer`] seam and its `lettre`
//!   implementation.
//! - [`templates`] -- HTML notification bodies rendered with `handlebars`.

pub mod delivery;
pub mod templates;

pub use delivery::{EmailConfig, EmailError, Mailer, OutgoingEmail, SmtpMailer};
pub use templates::{NotificationEmail, NotificationKind, NotificationTemplates};
