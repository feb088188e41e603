//! Endpoints for registration, login, profiles and email schedules.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use time::OffsetDateTime;

use crate::{
    AppJson, AppState, Error,
    password::PasswordHash,
    user::{
        NewUser, UserId, UserProfile,
        db::{create_user, get_user, get_user_by_email, set_email_schedule, update_user_profile},
        domain::{EmailScheduleData, LogInData, RegistrationData, UserUpdateData},
    },
};

/// Handle a request to register a new user.
///
/// The password is stored as a salted bcrypt hash and every universal
/// category is attached to the new account.
pub async fn register_user_endpoint(
    State(state): State<AppState>,
    AppJson(data): AppJson<RegistrationData>,
) -> Result<Response, Error> {
    let email: EmailAddress = data
        .email
        .parse()
        .map_err(|_| Error::InvalidEmail(data.email.clone()))?;
    let password_hash = PasswordHash::from_raw_password(&data.password, PasswordHash::DEFAULT_COST)?;

    let connection = state.connection()?;
    let user = create_user(
        NewUser {
            email,
            password_hash,
            first_name: data.first_name,
            last_name: data.last_name,
        },
        OffsetDateTime::now_utc().date(),
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))).into_response())
}

/// Handle a request to verify an email and password pair.
///
/// Responds with the user's profile on success and 401 otherwise. The same
/// error is returned whether the email is unknown or the password is wrong.
pub async fn log_in_endpoint(
    State(state): State<AppState>,
    AppJson(data): AppJson<LogInData>,
) -> Result<Json<UserProfile>, Error> {
    let connection = state.connection()?;

    let user = get_user_by_email(&data.email, &connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidCredentials,
        error => error,
    })?;

    let is_valid = user
        .password_hash
        .verify(&data.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_valid {
        return Err(Error::InvalidCredentials);
    }

    Ok(Json(UserProfile::from(&user)))
}

/// Handle a request to fetch a user's profile.
pub async fn get_user_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserProfile>, Error> {
    let connection = state.connection()?;
    let user = get_user(user_id, &connection)?;

    Ok(Json(UserProfile::from(&user)))
}

/// Handle a request to update a user's profile names.
pub async fn update_user_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    AppJson(data): AppJson<UserUpdateData>,
) -> Result<Json<UserProfile>, Error> {
    let connection = state.connection()?;
    let user = update_user_profile(user_id, data.first_name, data.last_name, &connection)?;

    Ok(Json(UserProfile::from(&user)))
}

/// Handle a request to update a user's email report schedule.
///
/// The frequency defaults to monthly and the start date to today, matching
/// the defaults applied at registration.
pub async fn update_email_schedule_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    AppJson(data): AppJson<EmailScheduleData>,
) -> Result<Json<UserProfile>, Error> {
    let start_date = data
        .start_date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    let connection = state.connection()?;
    set_email_schedule(user_id, data.frequency, start_date, &connection)?;
    let user = get_user(user_id, &connection)?;

    Ok(Json(UserProfile::from(&user)))
}
