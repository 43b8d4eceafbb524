use super::routes;
use crate::persistence::Repository;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn new(repo: Arc<dyn Repository>) -> Router {
    Router::new()
        .route(
            "/account",
            get(routes::list_accounts)
                .post(routes::create_account)
                .delete(routes::delete_accounts)
                .fallback(routes::method_not_allowed),
        )
        .route(
            "/account/:id",
            get(routes::show_account)
                .put(routes::update_account)
                .delete(routes::delete_account)
                .fallback(routes::method_not_allowed),
        )
        .route(
            "/account/number/:number",
            get(routes::show_account_by_number).fallback(routes::method_not_allowed),
        )
        .fallback(routes::not_found)
        .with_state(repo)
}
