//! Endpoint for emailing a user's report on demand.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    email::scheduler::deliver_report,
    user::{UserId, get_user},
};

/// Handle a request to render and email a user's report immediately.
///
/// On-demand sends do not touch the user's email schedule.
pub async fn send_report_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Value>, Error> {
    let connection = state.connection()?;
    let user = get_user(user_id, &connection)?;

    deliver_report(
        &user,
        state.mailer.as_ref(),
        state.report_renderer.as_ref(),
        &connection,
    )?;

    Ok(Json(json!({ "message": "Email sent successfully!" })))
}
