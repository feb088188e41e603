//! Database operations for transactions and their category links.
//!
//! None of these functions open their own SQL transaction: callers that need
//! multi-step atomicity (the HTTP endpoints, the debt ledger, the schedule
//! advancer) wrap them in one.

use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    category::CategoryId,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionType},
    user::UserId,
};

/// Record a new transaction and attach its categories.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (user_id, amount, description, type, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            new_transaction.user_id.as_i64(),
            new_transaction.amount,
            &new_transaction.description,
            new_transaction.transaction_type.as_str(),
            new_transaction.date,
        ),
    )?;

    let id = connection.last_insert_rowid();
    set_transaction_categories(id, &new_transaction.categories, connection)?;

    get_transaction(id, connection)
}

/// Retrieve a single transaction with its category IDs.
pub fn get_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut transaction = connection
        .prepare(
            "SELECT id, user_id, amount, description, type, date
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &transaction_id)], map_row)
        .map_err(Error::from)?;

    transaction.categories = get_transaction_categories(transaction_id, connection)?;

    Ok(transaction)
}

/// Retrieve all of a user's transactions, most recent first.
pub fn get_transactions_for_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut transactions: Vec<Transaction> = connection
        .prepare(
            "SELECT id, user_id, amount, description, type, date
             FROM \"transaction\" WHERE user_id = :user_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .collect::<Result<_, _>>()?;

    for transaction in &mut transactions {
        transaction.categories = get_transaction_categories(transaction.id, connection)?;
    }

    Ok(transactions)
}

/// Overwrite a transaction's content and replace its category links.
///
/// # Errors
///
/// Returns [Error::NotFound] if no transaction has the given ID.
pub fn update_transaction(transaction: &Transaction, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET amount = ?1, description = ?2, type = ?3, date = ?4
         WHERE id = ?5",
        (
            transaction.amount,
            &transaction.description,
            transaction.transaction_type.as_str(),
            transaction.date,
            transaction.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    connection.execute(
        "DELETE FROM transaction_category WHERE transaction_id = ?1",
        [transaction.id],
    )?;
    set_transaction_categories(transaction.id, &transaction.categories, connection)?;

    Ok(())
}

/// Delete a transaction. Category links cascade.
///
/// # Errors
///
/// Returns [Error::NotFound] if no transaction has the given ID.
pub fn delete_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1",
        [transaction_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// The sum of a user's transaction amounts for one transaction type.
pub fn sum_transactions(
    user_id: UserId,
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\"
             WHERE user_id = :user_id AND type = :type",
        )?
        .query_row(
            &[
                (":user_id", &user_id.as_i64() as &dyn rusqlite::ToSql),
                (":type", &transaction_type.as_str()),
            ],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn set_transaction_categories(
    transaction_id: TransactionId,
    categories: &[CategoryId],
    connection: &Connection,
) -> Result<(), Error> {
    let mut statement = connection.prepare(
        "INSERT OR IGNORE INTO transaction_category (transaction_id, category_id) VALUES (?1, ?2)",
    )?;

    for category_id in categories {
        statement.execute((transaction_id, category_id))?;
    }

    Ok(())
}

fn get_transaction_categories(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Vec<CategoryId>, Error> {
    connection
        .prepare(
            "SELECT category_id FROM transaction_category
             WHERE transaction_id = :transaction_id ORDER BY category_id ASC",
        )?
        .query_map(&[(":transaction_id", &transaction_id)], |row| row.get(0))?
        .map(|maybe_id| maybe_id.map_err(|error| error.into()))
        .collect()
}

/// Initialize the transaction table and its category join table.
pub fn create_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL DEFAULT 'income',
            date TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES user(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);

        CREATE TABLE IF NOT EXISTS transaction_category (
            transaction_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            PRIMARY KEY (transaction_id, category_id),
            FOREIGN KEY (transaction_id) REFERENCES \"transaction\"(id) ON DELETE CASCADE,
            FOREIGN KEY (category_id) REFERENCES category(id) ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new(row.get(1)?);
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let raw_type: String = row.get(4)?;
    let transaction_type = raw_type.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error))
    })?;
    let date: OffsetDateTime = row.get(5)?;

    Ok(Transaction {
        id,
        user_id,
        amount,
        description,
        transaction_type,
        date,
        categories: Vec::new(),
    })
}
