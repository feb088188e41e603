//! Periodic background jobs: the schedule advancer and the email scheduler.
//!
//! Both jobs run forever on a fixed tick. Each tick takes the database lock,
//! does its work and logs the outcome. A failed tick is logged and the job
//! carries on at the next tick.

use std::time::Duration;

use time::OffsetDateTime;

use crate::{
    AppState, email::send_scheduled_emails, schedule::process_scheduled_transactions,
};

/// Materialize due scheduled transactions every `interval`.
pub async fn run_schedule_advancer(state: AppState, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let today = OffsetDateTime::now_utc().date();
        let result = state
            .connection()
            .and_then(|connection| process_scheduled_transactions(today, &connection));

        match result {
            Ok(0) => {}
            Ok(count) => tracing::info!(count, "materialized due scheduled transactions"),
            Err(error) => tracing::error!("could not advance scheduled transactions: {error}"),
        }
    }
}

/// Deliver due report emails every `interval`.
pub async fn run_email_scheduler(state: AppState, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let today = OffsetDateTime::now_utc().date();
        let result = state.connection().and_then(|connection| {
            send_scheduled_emails(
                today,
                state.mailer.as_ref(),
                state.report_renderer.as_ref(),
                &connection,
            )
        });

        match result {
            Ok(0) => {}
            Ok(count) => tracing::info!(count, "delivered scheduled report emails"),
            Err(error) => tracing::error!("could not deliver scheduled report emails: {error}"),
        }
    }
}
