use std::sync::Arc;

use super::{
    extract::{AccountId, AccountNumber, ValidJson},
    Error,
};
use crate::{models::Account, persistence::Repository};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

/// Payload of both `POST /account` and `PUT /account/:id`.
#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Request {
    pub first_name: String,
    pub last_name: String,
}

pub async fn list(State(repo): State<Arc<dyn Repository>>) -> Result<Json<Vec<Account>>, Error> {
    Ok(Json(repo.get_accounts().await?))
}

pub async fn create(
    State(repo): State<Arc<dyn Repository>>,
    ValidJson(payload): ValidJson<Request>,
) -> Result<Json<Account>, Error> {
    let mut account = Account::new(payload.first_name, payload.last_name);
    repo.create_account(&mut account).await?;

    Ok(Json(account))
}

/// Collection delete is intentionally a no-op that answers 200 with no body.
pub async fn delete_all() -> StatusCode {
    StatusCode::OK
}

pub async fn show(
    State(repo): State<Arc<dyn Repository>>,
    AccountId(id): AccountId,
) -> Result<Json<Account>, Error> {
    Ok(Json(repo.get_account_by_id(id).await?))
}

pub async fn show_by_number(
    State(repo): State<Arc<dyn Repository>>,
    AccountNumber(number): AccountNumber,
) -> Result<Json<Account>, Error> {
    Ok(Json(repo.get_account_by_number(number).await?))
}

pub async fn update(
    State(repo): State<Arc<dyn Repository>>,
    AccountId(id): AccountId,
    ValidJson(payload): ValidJson<Request>,
) -> Result<Json<Account>, Error> {
    let mut account = repo.get_account_by_id(id).await?;
    account.first_name = payload.first_name;
    account.last_name = payload.last_name;

    repo.update_account(&account).await?;

    Ok(Json(account))
}

pub async fn delete(
    State(repo): State<Arc<dyn Repository>>,
    AccountId(id): AccountId,
) -> Result<StatusCode, Error> {
    repo.delete_account(id).await?;

    Ok(StatusCode::OK)
}
