//! Endpoint serving a user's rendered financial report.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    report::build_report,
    user::{UserId, get_user},
};

/// Handle a request to download a user's rendered report.
pub async fn get_report_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Response, Error> {
    let rendered = {
        let connection = state.connection()?;
        let user = get_user(user_id, &connection)?;
        let report = build_report(&user, &connection)?;

        state.report_renderer.render(&report)?
    };

    let disposition = format!("attachment; filename=\"{}\"", rendered.file_name);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(rendered.content_type),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .map_err(|error| Error::ReportRender(error.to_string()))?,
            ),
        ],
        rendered.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod report_endpoint_tests {
    use axum::{
        extract::{Path, State},
        http::{StatusCode, header},
        response::IntoResponse,
    };

    use crate::test_utils::{get_test_app_state, register_test_user};

    use super::get_report_endpoint;

    #[tokio::test]
    async fn report_downloads_as_attachment() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);

        let response = get_report_endpoint(State(state), Path(user.id))
            .await
            .expect("Could not fetch report");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"report_"));
    }

    #[tokio::test]
    async fn report_fails_for_unknown_user() {
        let state = get_test_app_state();

        let response = get_report_endpoint(State(state), Path(crate::user::UserId::new(42)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
