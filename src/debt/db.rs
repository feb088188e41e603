//! Database operations for debts.
//!
//! These functions do not open SQL transactions; the ledger wraps every
//! multi-step debt operation in one.

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    debt::{Debt, DebtId, DebtStatus},
    transaction::TransactionId,
    user::UserId,
};

const DEBT_COLUMNS: &str = "id, user_id, description, lender, amount, has_interest, \
     interest_rate, interest, total_amount, init_date, due_date, status, payment_transaction_id";

/// Insert a debt row. Derived amounts are computed by the caller; the payment
/// link starts out empty.
pub fn insert_debt(debt: &Debt, connection: &Connection) -> Result<DebtId, Error> {
    connection.execute(
        "INSERT INTO debt (user_id, description, lender, amount, has_interest, interest_rate,
                           interest, total_amount, init_date, due_date, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        (
            debt.user_id.as_i64(),
            &debt.description,
            &debt.lender,
            debt.amount,
            debt.has_interest,
            debt.interest_rate,
            debt.interest,
            debt.total_amount,
            debt.init_date,
            debt.due_date,
            debt.status.as_str(),
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Retrieve a single debt by ID.
pub fn get_debt(debt_id: DebtId, connection: &Connection) -> Result<Debt, Error> {
    connection
        .prepare(&format!("SELECT {DEBT_COLUMNS} FROM debt WHERE id = :id"))?
        .query_row(&[(":id", &debt_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all of a user's debts, most recently due first.
pub fn get_debts_for_user(user_id: UserId, connection: &Connection) -> Result<Vec<Debt>, Error> {
    connection
        .prepare(&format!(
            "SELECT {DEBT_COLUMNS} FROM debt WHERE user_id = :user_id
             ORDER BY due_date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_debt| maybe_debt.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a debt's content. The payment link is managed separately via
/// [set_payment_transaction].
///
/// # Errors
///
/// Returns [Error::NotFound] if no debt has the given ID.
pub fn update_debt_row(debt: &Debt, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE debt SET description = ?1, lender = ?2, amount = ?3, has_interest = ?4,
                         interest_rate = ?5, interest = ?6, total_amount = ?7,
                         init_date = ?8, due_date = ?9, status = ?10
         WHERE id = ?11",
        (
            &debt.description,
            &debt.lender,
            debt.amount,
            debt.has_interest,
            debt.interest_rate,
            debt.interest,
            debt.total_amount,
            debt.init_date,
            debt.due_date,
            debt.status.as_str(),
            debt.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Point a debt at its settling payment transaction, or clear the link.
pub fn set_payment_transaction(
    debt_id: DebtId,
    payment_transaction_id: Option<TransactionId>,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE debt SET payment_transaction_id = ?1 WHERE id = ?2",
        (payment_transaction_id, debt_id),
    )?;

    Ok(())
}

/// Delete a debt row.
///
/// # Errors
///
/// Returns [Error::NotFound] if no debt has the given ID.
pub fn delete_debt_row(debt_id: DebtId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM debt WHERE id = ?1", [debt_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// The sum of a user's debt totals for one status.
pub fn sum_debts_by_status(
    user_id: UserId,
    status: DebtStatus,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(total_amount), 0.0) FROM debt
             WHERE user_id = :user_id AND status = :status",
        )?
        .query_row(
            &[
                (":user_id", &user_id.as_i64() as &dyn rusqlite::ToSql),
                (":status", &status.as_str()),
            ],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Initialize the debt table.
///
/// The payment link clears itself if its transaction is deleted directly.
pub fn create_debt_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS debt (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            lender TEXT,
            amount REAL NOT NULL,
            has_interest INTEGER NOT NULL DEFAULT 0,
            interest_rate REAL NOT NULL DEFAULT 0,
            interest REAL NOT NULL DEFAULT 0,
            total_amount REAL NOT NULL,
            init_date TEXT NOT NULL,
            due_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            payment_transaction_id INTEGER,
            FOREIGN KEY (user_id) REFERENCES user(id) ON DELETE CASCADE,
            FOREIGN KEY (payment_transaction_id)
                REFERENCES \"transaction\"(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_debt_user_status ON debt(user_id, status);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Debt, rusqlite::Error> {
    let raw_status: String = row.get(11)?;
    let status = raw_status.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(error))
    })?;

    Ok(Debt {
        id: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        description: row.get(2)?,
        lender: row.get(3)?,
        amount: row.get(4)?,
        has_interest: row.get(5)?,
        interest_rate: row.get(6)?,
        interest: row.get(7)?,
        total_amount: row.get(8)?,
        init_date: row.get(9)?,
        due_date: row.get(10)?,
        status,
        payment_transaction_id: row.get(12)?,
    })
}
