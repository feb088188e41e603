//! Application router configuration mapping endpoint paths to handlers.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    category::{create_category_endpoint, get_categories_endpoint, rename_category_endpoint},
    debt::{
        create_debt_endpoint, delete_debt_endpoint, get_debt_endpoint, get_debts_endpoint,
        update_debt_endpoint,
    },
    email::send_report_endpoint,
    endpoints,
    report::get_report_endpoint,
    schedule::{
        create_scheduled_transaction_endpoint, delete_scheduled_transaction_endpoint,
        get_scheduled_transactions_endpoint, update_scheduled_transaction_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
    user::{
        get_user_endpoint, log_in_endpoint, register_user_endpoint,
        update_email_schedule_endpoint, update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::POST_USER, post(register_user_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(
            endpoints::USER,
            get(get_user_endpoint).put(update_user_endpoint),
        )
        .route(
            endpoints::USER_EMAIL_SCHEDULE,
            put(update_email_schedule_endpoint),
        )
        .route(
            endpoints::USER_CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(endpoints::USER_CATEGORY, put(rename_category_endpoint))
        .route(
            endpoints::USER_TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::USER_SCHEDULED_TRANSACTIONS,
            get(get_scheduled_transactions_endpoint).post(create_scheduled_transaction_endpoint),
        )
        .route(
            endpoints::SCHEDULED_TRANSACTION,
            put(update_scheduled_transaction_endpoint)
                .delete(delete_scheduled_transaction_endpoint),
        )
        .route(
            endpoints::USER_DEBTS,
            get(get_debts_endpoint).post(create_debt_endpoint),
        )
        .route(
            endpoints::DEBT,
            get(get_debt_endpoint)
                .put(update_debt_endpoint)
                .delete(delete_debt_endpoint),
        )
        .route(endpoints::USER_REPORT, get(get_report_endpoint))
        .route(endpoints::USER_SEND_REPORT, post(send_report_endpoint))
        .fallback(get_unknown_route)
        .with_state(state)
}

/// Unmatched paths get the same JSON error shape as handler failures.
async fn get_unknown_route() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use tower::ServiceExt;

    use crate::test_utils::{get_test_app_state, register_test_user, response_json};

    use super::build_router;

    #[tokio::test]
    async fn unknown_route_returns_json_404() {
        let router = build_router(get_test_app_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/does_not_exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn registration_route_creates_a_user() {
        let router = build_router(get_test_app_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/users")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email": "foo@bar.baz", "password": "averysecretpassword"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["email"], "foo@bar.baz");
    }

    #[tokio::test]
    async fn malformed_body_returns_json_400() {
        let router = build_router(get_test_app_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/users")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email": }"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn categories_route_lists_universal_categories() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);
        let router = build_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/api/users/{}/categories", user.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|category| category["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Food", "Housing", "Transportation"]);
    }
}
