use super::Error;
use axum::{
    async_trait,
    extract::{
        rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request as AxumRequest,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::str::FromStr;

/// `:id` path segment, parsed before any storage access.
pub struct AccountId(pub i32);

/// `:number` path segment.
pub struct AccountNumber(pub i64);

async fn parse_segment<T, S>(parts: &mut Parts, state: &S, label: &str) -> Result<T, Error>
where
    T: FromStr,
    S: Send + Sync,
{
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
        .await
        .map_err(|e| Error::InvalidInput(e.body_text()))?;

    raw.parse()
        .map_err(|_| Error::InvalidInput(format!("invalid {} given {}", label, raw)))
}

#[async_trait]
impl<S> FromRequestParts<S> for AccountId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_segment(parts, state, "id").await.map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AccountNumber
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        parse_segment(parts, state, "number").await.map(Self)
    }
}

/// JSON body whose rejections are reported through the API error envelope.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = Error;

    async fn from_request(req: AxumRequest, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| Error::InvalidInput(e.body_text()))?;

        Ok(Self(data))
    }
}
