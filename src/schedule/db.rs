//! Database operations for scheduled transactions.
//!
//! As elsewhere, these functions do not open SQL transactions; the advancer
//! and the endpoints provide atomicity around them.

use rusqlite::{Connection, Row, types::Type};
use time::Date;

use crate::{
    Error,
    category::CategoryId,
    schedule::{NewScheduledTransaction, ScheduledTransaction, ScheduledTransactionId},
    user::UserId,
};

/// Create a scheduled transaction and attach its categories.
pub fn create_scheduled_transaction(
    new_schedule: NewScheduledTransaction,
    connection: &Connection,
) -> Result<ScheduledTransaction, Error> {
    connection.execute(
        "INSERT INTO scheduled_transaction (user_id, amount, description, type, schedule_date, repeat)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            new_schedule.user_id.as_i64(),
            new_schedule.amount,
            &new_schedule.description,
            new_schedule.transaction_type.as_str(),
            new_schedule.schedule_date,
            new_schedule.repeat.as_str(),
        ),
    )?;

    let id = connection.last_insert_rowid();
    set_schedule_categories(id, &new_schedule.categories, connection)?;

    get_scheduled_transaction(id, connection)
}

/// Retrieve a single scheduled transaction with its category IDs.
pub fn get_scheduled_transaction(
    schedule_id: ScheduledTransactionId,
    connection: &Connection,
) -> Result<ScheduledTransaction, Error> {
    let mut schedule = connection
        .prepare(
            "SELECT id, user_id, amount, description, type, schedule_date, repeat
             FROM scheduled_transaction WHERE id = :id",
        )?
        .query_row(&[(":id", &schedule_id)], map_row)
        .map_err(Error::from)?;

    schedule.categories = get_schedule_categories(schedule_id, connection)?;

    Ok(schedule)
}

/// Retrieve all of a user's scheduled transactions, soonest due first.
pub fn get_scheduled_transactions_for_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<ScheduledTransaction>, Error> {
    let mut schedules: Vec<ScheduledTransaction> = connection
        .prepare(
            "SELECT id, user_id, amount, description, type, schedule_date, repeat
             FROM scheduled_transaction WHERE user_id = :user_id
             ORDER BY schedule_date ASC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .collect::<Result<_, _>>()?;

    for schedule in &mut schedules {
        schedule.categories = get_schedule_categories(schedule.id, connection)?;
    }

    Ok(schedules)
}

/// Retrieve every scheduled transaction due on or before `today`, across all
/// users, soonest due first.
pub fn get_due_scheduled_transactions(
    today: Date,
    connection: &Connection,
) -> Result<Vec<ScheduledTransaction>, Error> {
    let mut schedules: Vec<ScheduledTransaction> = connection
        .prepare(
            "SELECT id, user_id, amount, description, type, schedule_date, repeat
             FROM scheduled_transaction WHERE schedule_date <= :today
             ORDER BY schedule_date ASC, id ASC",
        )?
        .query_map(&[(":today", &today)], map_row)?
        .collect::<Result<_, _>>()?;

    for schedule in &mut schedules {
        schedule.categories = get_schedule_categories(schedule.id, connection)?;
    }

    Ok(schedules)
}

/// Overwrite a scheduled transaction's content and replace its category
/// links.
///
/// # Errors
///
/// Returns [Error::NotFound] if no scheduled transaction has the given ID.
pub fn update_scheduled_transaction(
    schedule: &ScheduledTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE scheduled_transaction
         SET amount = ?1, description = ?2, type = ?3, schedule_date = ?4, repeat = ?5
         WHERE id = ?6",
        (
            schedule.amount,
            &schedule.description,
            schedule.transaction_type.as_str(),
            schedule.schedule_date,
            schedule.repeat.as_str(),
            schedule.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    connection.execute(
        "DELETE FROM scheduled_transaction_category WHERE scheduled_transaction_id = ?1",
        [schedule.id],
    )?;
    set_schedule_categories(schedule.id, &schedule.categories, connection)?;

    Ok(())
}

/// Move a scheduled transaction's due date forward after it fires.
pub fn set_schedule_date(
    schedule_id: ScheduledTransactionId,
    schedule_date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE scheduled_transaction SET schedule_date = ?1 WHERE id = ?2",
        (schedule_date, schedule_id),
    )?;

    Ok(())
}

/// Delete a scheduled transaction. Category links cascade.
///
/// # Errors
///
/// Returns [Error::NotFound] if no scheduled transaction has the given ID.
pub fn delete_scheduled_transaction(
    schedule_id: ScheduledTransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM scheduled_transaction WHERE id = ?1",
        [schedule_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn set_schedule_categories(
    schedule_id: ScheduledTransactionId,
    categories: &[CategoryId],
    connection: &Connection,
) -> Result<(), Error> {
    let mut statement = connection.prepare(
        "INSERT OR IGNORE INTO scheduled_transaction_category (scheduled_transaction_id, category_id)
         VALUES (?1, ?2)",
    )?;

    for category_id in categories {
        statement.execute((schedule_id, category_id))?;
    }

    Ok(())
}

fn get_schedule_categories(
    schedule_id: ScheduledTransactionId,
    connection: &Connection,
) -> Result<Vec<CategoryId>, Error> {
    connection
        .prepare(
            "SELECT category_id FROM scheduled_transaction_category
             WHERE scheduled_transaction_id = :id ORDER BY category_id ASC",
        )?
        .query_map(&[(":id", &schedule_id)], |row| row.get(0))?
        .map(|maybe_id| maybe_id.map_err(|error| error.into()))
        .collect()
}

/// Initialize the scheduled transaction table and its category join table.
pub fn create_scheduled_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS scheduled_transaction (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL DEFAULT 'income',
            schedule_date TEXT NOT NULL,
            repeat TEXT NOT NULL DEFAULT 'none',
            FOREIGN KEY (user_id) REFERENCES user(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_scheduled_transaction_date
            ON scheduled_transaction(schedule_date);

        CREATE TABLE IF NOT EXISTS scheduled_transaction_category (
            scheduled_transaction_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            PRIMARY KEY (scheduled_transaction_id, category_id),
            FOREIGN KEY (scheduled_transaction_id)
                REFERENCES scheduled_transaction(id) ON DELETE CASCADE,
            FOREIGN KEY (category_id) REFERENCES category(id) ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<ScheduledTransaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new(row.get(1)?);
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let raw_type: String = row.get(4)?;
    let transaction_type = raw_type.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error))
    })?;
    let schedule_date = row.get(5)?;
    let raw_repeat: String = row.get(6)?;
    let repeat = raw_repeat.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(error))
    })?;

    Ok(ScheduledTransaction {
        id,
        user_id,
        amount,
        description,
        transaction_type,
        schedule_date,
        repeat,
        categories: Vec::new(),
    })
}
