//! Database operations for users and their email report schedules.

use rusqlite::{Connection, Row, types::Type};
use time::Date;

use crate::{
    Error,
    category::{associate_category, get_universal_categories},
    password::PasswordHash,
    user::{EmailFrequency, NewUser, User, UserId},
};

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                first_name TEXT,
                last_name TEXT,
                email_schedule_frequency TEXT NOT NULL DEFAULT 'monthly',
                email_schedule_start_date TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database, attaching every universal
/// category to them.
///
/// The user's email schedule defaults to monthly starting from `today`.
///
/// The insert and the category associations run in a single SQL transaction.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email address is already
/// registered, or [Error::SqlError] if another SQL related error occurred.
pub fn create_user(new_user: NewUser, today: Date, connection: &Connection) -> Result<User, Error> {
    let transaction = connection.unchecked_transaction()?;

    let frequency = EmailFrequency::default();
    transaction.execute(
        "INSERT INTO user (email, password, first_name, last_name, email_schedule_frequency, email_schedule_start_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            new_user.email.as_str(),
            new_user.password_hash.as_ref(),
            &new_user.first_name,
            &new_user.last_name,
            frequency.as_str(),
            today,
        ),
    )?;

    let id = UserId::new(transaction.last_insert_rowid());

    for category in get_universal_categories(&transaction)? {
        associate_category(id, category.id, &transaction)?;
    }

    transaction.commit()?;

    Ok(User {
        id,
        email: new_user.email,
        password_hash: new_user.password_hash,
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        email_schedule_frequency: frequency,
        email_schedule_start_date: today,
    })
}

const USER_COLUMNS: &str = "id, email, password, first_name, last_name, \
     email_schedule_frequency, email_schedule_start_date";

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user is registered with the email address.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = :email"))?
        .query_row(&[(":email", &email)], map_row)
        .map_err(|error| error.into())
}

/// Update a user's profile names.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered
/// user.
pub fn update_user_profile(
    user_id: UserId,
    first_name: Option<String>,
    last_name: Option<String>,
    connection: &Connection,
) -> Result<User, Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET first_name = ?1, last_name = ?2 WHERE id = ?3",
        (&first_name, &last_name, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_user(user_id, connection)
}

/// Set a user's email report schedule.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered
/// user.
pub fn set_email_schedule(
    user_id: UserId,
    frequency: EmailFrequency,
    start_date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET email_schedule_frequency = ?1, email_schedule_start_date = ?2 WHERE id = ?3",
        (frequency.as_str(), start_date, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Move a user's next send date forward, e.g. after their report has been
/// emailed.
pub fn set_email_schedule_start_date(
    user_id: UserId,
    start_date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE user SET email_schedule_start_date = ?1 WHERE id = ?2",
        (start_date, user_id.as_i64()),
    )?;

    Ok(())
}

/// Get the users whose next send date is on or before `today`, i.e. those
/// due to receive their emailed report.
pub fn get_users_due_for_email(today: Date, connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare(&format!(
            "SELECT {USER_COLUMNS} FROM user WHERE email_schedule_start_date <= :today ORDER BY id ASC"
        ))?
        .query_map(&[(":today", &today)], map_row)?
        .map(|maybe_user| maybe_user.map_err(|error| error.into()))
        .collect()
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = UserId::new(row.get(0)?);
    let raw_email: String = row.get(1)?;
    let email = raw_email.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
    })?;
    let raw_password_hash: String = row.get(2)?;
    let password_hash = PasswordHash::new_unchecked(&raw_password_hash);
    let first_name = row.get(3)?;
    let last_name = row.get(4)?;
    let raw_frequency: String = row.get(5)?;
    let email_schedule_frequency = raw_frequency.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(error))
    })?;
    let email_schedule_start_date = row.get(6)?;

    Ok(User {
        id,
        email,
        password_hash,
        first_name,
        last_name,
        email_schedule_frequency,
        email_schedule_start_date,
    })
}
