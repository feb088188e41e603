//! Emailed report delivery: the mail seam and the per-user schedule.

mod endpoints;
mod mailer;
mod scheduler;

pub use endpoints::send_report_endpoint;
pub use mailer::{EmailMessage, Mailer, TracingMailer};
pub use scheduler::send_scheduled_emails;
