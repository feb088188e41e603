//! Endpoints for managing scheduled transactions.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppJson, AppState, Error,
    schedule::{
        NewScheduledTransaction, ScheduledTransaction, ScheduledTransactionId,
        db::{
            create_scheduled_transaction, delete_scheduled_transaction, get_scheduled_transaction,
            get_scheduled_transactions_for_user, update_scheduled_transaction,
        },
        domain::ScheduledTransactionData,
    },
    user::{UserId, get_user},
};

/// Handle a request to create a scheduled transaction for a user.
pub async fn create_scheduled_transaction_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    AppJson(data): AppJson<ScheduledTransactionData>,
) -> Result<Response, Error> {
    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let sql_transaction = connection.unchecked_transaction()?;
    let schedule = create_scheduled_transaction(
        NewScheduledTransaction {
            user_id,
            amount: data.amount,
            description: data.description,
            transaction_type: data.transaction_type,
            schedule_date: data.schedule_date,
            repeat: data.repeat,
            categories: data.categories,
        },
        &sql_transaction,
    )?;
    sql_transaction.commit()?;

    Ok((StatusCode::CREATED, Json(schedule)).into_response())
}

/// Handle a request to list a user's scheduled transactions.
pub async fn get_scheduled_transactions_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<ScheduledTransaction>>, Error> {
    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let schedules = get_scheduled_transactions_for_user(user_id, &connection)?;

    Ok(Json(schedules))
}

/// Handle a request to overwrite a scheduled transaction.
pub async fn update_scheduled_transaction_endpoint(
    State(state): State<AppState>,
    Path(schedule_id): Path<ScheduledTransactionId>,
    AppJson(data): AppJson<ScheduledTransactionData>,
) -> Result<Json<ScheduledTransaction>, Error> {
    let connection = state.connection()?;
    let existing = get_scheduled_transaction(schedule_id, &connection)?;

    let updated = ScheduledTransaction {
        id: existing.id,
        user_id: existing.user_id,
        amount: data.amount,
        description: data.description,
        transaction_type: data.transaction_type,
        schedule_date: data.schedule_date,
        repeat: data.repeat,
        categories: data.categories,
    };

    let sql_transaction = connection.unchecked_transaction()?;
    update_scheduled_transaction(&updated, &sql_transaction)?;
    sql_transaction.commit()?;

    let schedule = get_scheduled_transaction(schedule_id, &connection)?;
    Ok(Json(schedule))
}

/// Handle a request to delete a scheduled transaction.
pub async fn delete_scheduled_transaction_endpoint(
    State(state): State<AppState>,
    Path(schedule_id): Path<ScheduledTransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state.connection()?;
    delete_scheduled_transaction(schedule_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod schedule_endpoint_tests {
    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        AppJson,
        schedule::{Repeat, domain::ScheduledTransactionData},
        test_utils::{get_test_app_state, register_test_user, response_json},
        transaction::TransactionType,
    };

    use super::{
        create_scheduled_transaction_endpoint, delete_scheduled_transaction_endpoint,
        get_scheduled_transactions_endpoint, update_scheduled_transaction_endpoint,
    };

    fn schedule_data(repeat: Repeat) -> ScheduledTransactionData {
        ScheduledTransactionData {
            amount: 1200.0,
            description: "Rent".to_string(),
            transaction_type: TransactionType::Expense,
            schedule_date: date!(2024 - 02 - 01),
            repeat,
            categories: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_scheduled_transaction_responds_with_created() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);

        let response = create_scheduled_transaction_endpoint(
            State(state),
            Path(user.id),
            AppJson(schedule_data(Repeat::Monthly)),
        )
        .await
        .expect("Could not create scheduled transaction");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["repeat"], "monthly");
        assert_eq!(body["type"], "expense");
        assert_eq!(body["schedule_date"], "2024-02-01");
    }

    #[tokio::test]
    async fn update_scheduled_transaction_replaces_content() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);
        let response = create_scheduled_transaction_endpoint(
            State(state.clone()),
            Path(user.id),
            AppJson(schedule_data(Repeat::Monthly)),
        )
        .await
        .unwrap();
        let schedule_id = response_json(response).await["id"].as_i64().unwrap();

        let Json(updated) = update_scheduled_transaction_endpoint(
            State(state),
            Path(schedule_id),
            AppJson(ScheduledTransactionData {
                amount: 1300.0,
                repeat: Repeat::Weekly,
                ..schedule_data(Repeat::Monthly)
            }),
        )
        .await
        .expect("Could not update scheduled transaction");

        assert_eq!(updated.amount, 1300.0);
        assert_eq!(updated.repeat, Repeat::Weekly);
    }

    #[tokio::test]
    async fn delete_scheduled_transaction_removes_it() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);
        let response = create_scheduled_transaction_endpoint(
            State(state.clone()),
            Path(user.id),
            AppJson(schedule_data(Repeat::None)),
        )
        .await
        .unwrap();
        let schedule_id = response_json(response).await["id"].as_i64().unwrap();

        let status =
            delete_scheduled_transaction_endpoint(State(state.clone()), Path(schedule_id))
                .await
                .expect("Could not delete scheduled transaction");
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(schedules) = get_scheduled_transactions_endpoint(State(state), Path(user.id))
            .await
            .unwrap();
        assert!(schedules.is_empty());
    }

    #[tokio::test]
    async fn list_scheduled_transactions_fails_for_unknown_user() {
        let state = get_test_app_state();

        let response =
            get_scheduled_transactions_endpoint(State(state), Path(crate::user::UserId::new(42)))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
