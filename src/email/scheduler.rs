//! The email scheduler: delivers each user's report on their chosen cadence.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    email::{EmailMessage, Mailer},
    report::{ReportRenderer, build_report},
    user::{User, get_users_due_for_email, set_email_schedule_start_date},
};

const REPORT_SUBJECT: &str = "Your Financial Report";
const REPORT_BODY: &str =
    "Hi, attached is your financial report. Thank you for using our service!";

/// Render and email one user's report.
pub fn deliver_report(
    user: &User,
    mailer: &dyn Mailer,
    renderer: &dyn ReportRenderer,
    connection: &Connection,
) -> Result<(), Error> {
    let report = build_report(user, connection)?;
    let rendered = renderer.render(&report)?;

    mailer.send(EmailMessage {
        to: user.email.to_string(),
        subject: REPORT_SUBJECT.to_string(),
        body: REPORT_BODY.to_string(),
        attachment_name: rendered.file_name,
        attachment_type: rendered.content_type,
        attachment: rendered.bytes,
    })
}

/// Email a report to every user whose next send date is on or before
/// `today`, then advance each schedule by one frequency unit.
///
/// The advance happens whether or not the send succeeded: delivery is
/// at-most-once per cycle, and a failure is logged rather than retried. A
/// send date far in the past catches up one unit per pass. A failure for one
/// user never stops the remaining users from being processed.
///
/// Returns the number of users whose schedule advanced.
pub fn send_scheduled_emails(
    today: Date,
    mailer: &dyn Mailer,
    renderer: &dyn ReportRenderer,
    connection: &Connection,
) -> Result<usize, Error> {
    let due_users = get_users_due_for_email(today, connection)?;
    let mut advanced = 0;

    for user in due_users {
        match deliver_report(&user, mailer, renderer, connection) {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "emailed scheduled report");
            }
            Err(error) => {
                tracing::warn!(user_id = %user.id, "could not email scheduled report: {error}");
            }
        }

        let next_date = user
            .email_schedule_frequency
            .advance(user.email_schedule_start_date);
        match set_email_schedule_start_date(user.id, next_date, connection) {
            Ok(()) => advanced += 1,
            Err(error) => {
                tracing::error!(user_id = %user.id, "could not advance email schedule: {error}");
            }
        }
    }

    Ok(advanced)
}
