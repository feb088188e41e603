//! Helpers shared by endpoint and scheduler tests.

use std::sync::{Arc, Mutex};

use axum::response::Response;
use rusqlite::Connection;
use serde_json::Value;
use time::macros::date;

use crate::{
    AppState, Error,
    email::{EmailMessage, Mailer},
    password::PasswordHash,
    report::TextRenderer,
    user::{NewUser, User, create_user},
};

/// An [AppState] backed by a fresh in-memory database, the logging mailer
/// and the plain-text renderer.
pub fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(
        connection,
        Arc::new(crate::email::TracingMailer),
        Arc::new(TextRenderer),
    )
    .expect("Could not create app state")
}

/// Insert a user directly, skipping the registration endpoint's bcrypt work.
pub fn register_test_user(email: &str, state: &AppState) -> User {
    let connection = state.connection().expect("Could not lock database");

    create_user(
        NewUser {
            email: email.parse().expect("Invalid test email"),
            password_hash: PasswordHash::new_unchecked("hunter2hash"),
            first_name: None,
            last_name: None,
        },
        date!(2024 - 01 - 01),
        &connection,
    )
    .expect("Could not create test user")
}

/// Read a response body back as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}

/// A [Mailer] that records messages instead of sending them, optionally
/// failing every delivery.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    messages: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose every delivery fails with [Error::MailDelivery].
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// The messages delivered so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.messages.lock().expect("mailer lock poisoned").clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: EmailMessage) -> Result<(), Error> {
        if self.fail {
            return Err(Error::MailDelivery("transport rejected the message".to_string()));
        }

        self.messages
            .lock()
            .expect("mailer lock poisoned")
            .push(message);

        Ok(())
    }
}
