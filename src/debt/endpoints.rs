//! Endpoints for managing debts.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppJson, AppState, Error,
    debt::{
        Debt, DebtId,
        db::{get_debt, get_debts_for_user},
        domain::{DebtData, DebtUpdateData, NewDebt},
        ledger::{create_debt, delete_debt, update_debt},
    },
    user::{UserId, get_user},
};

/// Handle a request to record a new debt for a user.
pub async fn create_debt_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    AppJson(data): AppJson<DebtData>,
) -> Result<Response, Error> {
    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let debt = create_debt(
        NewDebt {
            user_id,
            description: data.description,
            lender: data.lender,
            amount: data.amount,
            has_interest: data.has_interest,
            interest_rate: data.interest_rate,
            init_date: data.init_date,
            due_date: data.due_date,
            status: data.status,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(debt)).into_response())
}

/// Handle a request to list a user's debts.
pub async fn get_debts_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Debt>>, Error> {
    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let debts = get_debts_for_user(user_id, &connection)?;

    Ok(Json(debts))
}

/// Handle a request to fetch a single debt.
pub async fn get_debt_endpoint(
    State(state): State<AppState>,
    Path(debt_id): Path<DebtId>,
) -> Result<Json<Debt>, Error> {
    let connection = state.connection()?;
    let debt = get_debt(debt_id, &connection)?;

    Ok(Json(debt))
}

/// Handle a request to apply a partial update to a debt. Omitted fields keep
/// their stored values.
pub async fn update_debt_endpoint(
    State(state): State<AppState>,
    Path(debt_id): Path<DebtId>,
    AppJson(data): AppJson<DebtUpdateData>,
) -> Result<Json<Debt>, Error> {
    let connection = state.connection()?;
    let debt = update_debt(debt_id, data, &connection)?;

    Ok(Json(debt))
}

/// Handle a request to delete a debt and its payment transaction.
pub async fn delete_debt_endpoint(
    State(state): State<AppState>,
    Path(debt_id): Path<DebtId>,
) -> Result<StatusCode, Error> {
    let connection = state.connection()?;
    delete_debt(debt_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
