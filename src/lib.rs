//! BudgetMate is a personal finance tracker backend.
//!
//! Users record income and expense transactions, schedule recurring
//! transactions, track debts with simple interest, and receive periodic
//! emailed financial reports.
//!
//! This library provides a JSON REST API plus two periodic background jobs:
//! the schedule advancer, which materializes due scheduled transactions into
//! concrete transactions, and the email scheduler, which delivers each user's
//! financial report on their chosen cadence.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod category;
mod dates;
mod db;
mod debt;
mod email;
mod endpoints;
mod jobs;
mod password;
mod report;
mod routing;
mod schedule;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use email::{Mailer, TracingMailer};
pub use jobs::{run_email_scheduler, run_schedule_advancer};
pub use password::PasswordHash;
pub use report::{ReportRenderer, TextRenderer};
pub use routing::build_router;
pub use user::{User, UserId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// A JSON body extractor whose rejections use the same `{"error": message}`
/// shape as every other failure, instead of axum's plain-text default.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(Error))]
pub struct AppJson<T>(pub T);

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email/password combination that does not match a
    /// registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email address is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The string could not be parsed as an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The password did not meet the minimum length requirement.
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// not returned to the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A user tried to rename or delete a universal category.
    ///
    /// Universal categories are attached to every user and can never be
    /// modified through user-facing operations.
    #[error("universal categories cannot be modified")]
    UniversalCategoryImmutable,

    /// A user tried to rename a category that is not associated with them.
    #[error("the category is not associated with this user")]
    CategoryNotAssociated,

    /// A string could not be parsed as a schedule repeat or email frequency.
    #[error("\"{0}\" is not a valid frequency")]
    InvalidFrequency(String),

    /// A string could not be parsed as a debt status.
    #[error("\"{0}\" is not a valid debt status")]
    InvalidStatus(String),

    /// A string could not be parsed as a transaction type.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// The request body was not the expected JSON payload.
    #[error("{0}")]
    InvalidBody(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The mail collaborator reported a delivery failure.
    ///
    /// This error is non-fatal for the email scheduler: the schedule still
    /// advances and the failure is logged rather than retried.
    #[error("mail delivery failed: {0}")]
    MailDelivery(String),

    /// The report renderer could not produce the report bytes.
    #[error("could not render report: {0}")]
    ReportRender(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidBody(rejection.body_text())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code this error maps to.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::DuplicateEmail
            | Error::InvalidEmail(_)
            | Error::PasswordTooShort(_)
            | Error::EmptyCategoryName
            | Error::InvalidFrequency(_)
            | Error::InvalidStatus(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Error::UniversalCategoryImmutable | Error::CategoryNotAssociated => {
                StatusCode::FORBIDDEN
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MailDelivery(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Internal error details are for the server logs, not the client.
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {self}");
            "an internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
