mod account;
mod extract;

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub use account::{
    create as create_account, delete as delete_account, delete_all as delete_accounts,
    list as list_accounts, show as show_account, show_by_number as show_account_by_number,
    update as update_account,
};

use crate::persistence;
use crate::telemetry;

/// Body of every failed response.
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // 4xx logs at debug
        if status.is_server_error() {
            telemetry::error!("Request failed with {}: {}", status, self);
        } else {
            telemetry::debug!("Request rejected with {}: {}", status, self);
        }

        (
            status,
            Json(ApiError {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<persistence::Error> for Error {
    fn from(err: persistence::Error) -> Self {
        match err {
            persistence::Error::AccountNotFound(_) => Self::NotFound(err.to_string()),
            persistence::Error::Connection | persistence::Error::Internal(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

/// Fallback for any path the router does not serve.
pub async fn not_found(uri: Uri) -> Error {
    Error::NotFound(format!("no route for {}", uri.path()))
}

/// Fallback for any method a route does not serve.
pub async fn method_not_allowed(method: Method) -> Error {
    Error::InvalidInput(format!("method not allowed {}", method))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::persistence::Lookup;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(persistence::Error::AccountNotFound(Lookup::Id(1)), StatusCode::NOT_FOUND)]
    #[case(
        persistence::Error::AccountNotFound(Lookup::Number(1)),
        StatusCode::NOT_FOUND
    )]
    #[case(persistence::Error::Connection, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(persistence::Error::Internal("internal".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_from_persistence_error(
        #[case] error: persistence::Error,
        #[case] expected_status: StatusCode,
    ) {
        assert_eq!(expected_status, Error::from(error).status());
    }

    #[rstest]
    #[case::invalid_input(Error::InvalidInput("invalid id given abc".into()), false)]
    #[case::not_found(Error::NotFound("account with id [1] not found".into()), false)]
    #[case::internal(Error::Internal("boom".into()), true)]
    fn test_only_internal_errors_are_server_errors(#[case] error: Error, #[case] server: bool) {
        assert_eq!(error.status().is_server_error(), server);
    }

    #[rstest]
    #[case(Error::InvalidInput("invalid id given abc".into()), StatusCode::BAD_REQUEST)]
    #[case(Error::NotFound("account with id [1] not found".into()), StatusCode::NOT_FOUND)]
    #[case(Error::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[tokio::test]
    async fn test_into_response(#[case] error: Error, #[case] expected_status: StatusCode) {
        let message = error.to_string();
        let response = error.into_response();

        assert_eq!(response.status(), expected_status);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();

        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            json!({ "error": message })
        );
    }
}
