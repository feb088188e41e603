//! Endpoints for recording, listing, updating and deleting transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    AppJson, AppState, Error,
    transaction::{
        NewTransaction, Transaction, TransactionId,
        db::{
            create_transaction, delete_transaction, get_transaction, get_transactions_for_user,
            update_transaction,
        },
        domain::{TransactionData, TransactionQuery},
    },
    user::{UserId, get_user},
};

/// Handle a request to record a new transaction for a user.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    AppJson(data): AppJson<TransactionData>,
) -> Result<Response, Error> {
    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let sql_transaction = connection.unchecked_transaction()?;
    let transaction = create_transaction(
        NewTransaction {
            user_id,
            amount: data.amount,
            description: data.description,
            transaction_type: data.transaction_type,
            date: data.date.unwrap_or_else(OffsetDateTime::now_utc),
            categories: data.categories,
        },
        &sql_transaction,
    )?;
    sql_transaction.commit()?;

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}

/// Handle a request to list a user's transactions, optionally filtered by
/// type, date range, amount range or category.
pub async fn get_transactions_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let transactions = get_transactions_for_user(user_id, &connection)?
        .into_iter()
        .filter(|transaction| query.matches(transaction))
        .collect();

    Ok(Json(transactions))
}

/// Handle a request to fetch a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.connection()?;
    let transaction = get_transaction(transaction_id, &connection)?;

    Ok(Json(transaction))
}

/// Handle a request to overwrite a transaction's content and categories.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
    AppJson(data): AppJson<TransactionData>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.connection()?;
    let existing = get_transaction(transaction_id, &connection)?;

    let updated = Transaction {
        id: existing.id,
        user_id: existing.user_id,
        amount: data.amount,
        description: data.description,
        transaction_type: data.transaction_type,
        date: data.date.unwrap_or(existing.date),
        categories: data.categories,
    };

    let sql_transaction = connection.unchecked_transaction()?;
    update_transaction(&updated, &sql_transaction)?;
    sql_transaction.commit()?;

    let transaction = get_transaction(transaction_id, &connection)?;
    Ok(Json(transaction))
}

/// Handle a request to delete a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state.connection()?;
    delete_transaction(transaction_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
