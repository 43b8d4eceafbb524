use crate::models::Account;
use axum::async_trait;
use std::fmt;

/// Key an account was looked up by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    Id(i32),
    Number(i64),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Id(id) => write!(f, "id [{}]", id),
            Lookup::Number(number) => write!(f, "number [{}]", number),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("timed out waiting for a database connection")]
    Connection,
    #[error("{0}")]
    Internal(String),
    #[error("account with {0} not found")]
    AccountNotFound(Lookup),
}

/// Account persistence. Every method runs as a single statement against the store.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Stores a new account and writes the assigned id back into `account`.
    async fn create_account(&self, account: &mut Account) -> Result<(), Error>;

    /// Removing an id that does not exist is not an error.
    async fn delete_account(&self, id: i32) -> Result<(), Error>;

    /// Overwrites names, password and balance of the account with `account.id`.
    async fn update_account(&self, account: &Account) -> Result<(), Error>;

    async fn get_accounts(&self) -> Result<Vec<Account>, Error>;

    async fn get_account_by_id(&self, id: i32) -> Result<Account, Error>;

    async fn get_account_by_number(&self, number: i64) -> Result<Account, Error>;
}
