//! Endpoints for listing, creating and renaming categories.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppJson, AppState, Error,
    category::{
        Category, CategoryId, CategoryName,
        db::get_categories_for_user,
        domain::CategoryData,
        resolver::{ensure_category, rename_category},
    },
    user::{UserId, get_user},
};

/// Handle a request to list the categories visible to a user, i.e. the
/// universal categories plus the user's own.
pub async fn get_categories_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let categories = get_categories_for_user(user_id, &connection)?;

    Ok(Json(categories))
}

/// Handle a request to get-or-create a category by name for a user.
///
/// Responds with 201 when the category was newly created and 200 when an
/// existing category was reused.
pub async fn create_category_endpoint(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    AppJson(data): AppJson<CategoryData>,
) -> Result<Response, Error> {
    let name = CategoryName::new(&data.name)?;

    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let transaction = connection.unchecked_transaction()?;
    let (category, created) = ensure_category(name, user_id, &transaction)?;
    transaction.commit()?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(category)).into_response())
}

/// Handle a request to rename a category on behalf of a user.
///
/// Depending on ownership this renames in place, merges into an existing
/// category, or forks the user off a shared category; the response carries
/// the category the user ends up with.
pub async fn rename_category_endpoint(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(UserId, CategoryId)>,
    AppJson(data): AppJson<CategoryData>,
) -> Result<Json<Category>, Error> {
    let name = CategoryName::new(&data.name)?;

    let connection = state.connection()?;
    get_user(user_id, &connection)?;

    let category = rename_category(user_id, category_id, name, &connection)?;

    Ok(Json(category))
}

#[cfg(test)]
mod category_endpoint_tests {
    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        AppJson,
        category::{CategoryName, domain::CategoryData, resolver::ensure_category},
        test_utils::{get_test_app_state, register_test_user, response_json},
    };

    use super::{create_category_endpoint, get_categories_endpoint, rename_category_endpoint};

    #[tokio::test]
    async fn list_categories_includes_universal_categories() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);

        let Json(categories) = get_categories_endpoint(State(state), Path(user.id))
            .await
            .expect("Could not list categories");

        let names: Vec<&str> = categories
            .iter()
            .map(|category| category.name.as_ref())
            .collect();
        assert_eq!(names, vec!["Food", "Housing", "Transportation"]);
    }

    #[tokio::test]
    async fn create_category_responds_with_created_then_ok() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);
        let data = CategoryData {
            name: "Groceries".to_string(),
        };

        let first = create_category_endpoint(
            State(state.clone()),
            Path(user.id),
            AppJson(data.clone()),
        )
        .await
        .expect("Could not create category");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = create_category_endpoint(State(state), Path(user.id), AppJson(data))
            .await
            .expect("Could not get existing category");
        assert_eq!(second.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_category_rejects_blank_name() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);
        let data = CategoryData {
            name: "   ".to_string(),
        };

        let response = create_category_endpoint(State(state), Path(user.id), AppJson(data))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rename_category_returns_renamed_category() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);
        let (category, _) = {
            let connection = state.connection().unwrap();
            ensure_category(CategoryName::new_unchecked("Hobbies"), user.id, &connection).unwrap()
        };

        let Json(renamed) = rename_category_endpoint(
            State(state),
            Path((user.id, category.id)),
            AppJson(CategoryData {
                name: "Games".to_string(),
            }),
        )
        .await
        .expect("Could not rename category");

        assert_eq!(renamed.id, category.id);
        assert_eq!(renamed.name.as_ref(), "Games");
    }

    #[tokio::test]
    async fn rename_universal_category_is_forbidden() {
        let state = get_test_app_state();
        let user = register_test_user("foo@bar.baz", &state);
        let universal = {
            let connection = state.connection().unwrap();
            crate::category::db::find_category_by_name(
                &CategoryName::new_unchecked("Housing"),
                &connection,
            )
            .unwrap()
            .expect("Universal category 'Housing' should be seeded")
        };

        let response = rename_category_endpoint(
            State(state),
            Path((user.id, universal.id)),
            AppJson(CategoryData {
                name: "Rent".to_string(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = response_json(response).await;
        assert_eq!(body["error"], "universal categories cannot be modified");
    }
}
