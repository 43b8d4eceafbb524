use super::{schema, statements_cache};
use crate::{
    config,
    models::Account,
    persistence::{Error, Lookup, Repository as RepositoryTrait},
    telemetry,
};
use axum::async_trait;
use bb8_postgres::{
    bb8::{self, ManageConnection, Pool, PooledConnection},
    tokio_postgres,
};
use postgres_types::ToSql;

#[derive(Clone)]
pub struct Repository {
    pool: Pool<statements_cache::ConnectionManager>,
}

impl Repository {
    /// Creates the schema, fills the pool and checks the database answers.
    pub async fn new(config: &config::Database) -> Result<Self, Error> {
        let manager = statements_cache::ConnectionManager::new(config.pg_config());

        // statements are prepared on acquire, so the table has to exist first
        manager
            .connect()
            .await?
            .batch_execute(schema::CREATE_ACCOUNT_TABLE)
            .await?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_customizer(Box::new(statements_cache::Cache))
            .connection_timeout(std::time::Duration::from_secs(5))
            .build(manager)
            .await?;

        let repo = Self { pool };
        repo.ping().await?;

        telemetry::info!("Connected to postgres on {}", config.host);

        Ok(repo)
    }

    pub async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, statements_cache::ConnectionManager>, Error> {
        let conn = self.pool.get().await?;
        Ok(conn)
    }

    pub async fn ping(&self) -> Result<(), Error> {
        self.connection().await?.simple_query("").await?;
        Ok(())
    }
}

async fn query_opt(
    conn: &statements_cache::Connection,
    stmt: statements_cache::Statement,
    params: &[&(dyn ToSql + Sync)],
) -> Result<Option<tokio_postgres::Row>, Error> {
    Ok(conn.query_opt(prepared(conn, stmt)?, params).await?)
}

fn prepared(
    conn: &statements_cache::Connection,
    stmt: statements_cache::Statement,
) -> Result<&tokio_postgres::Statement, Error> {
    conn.statements
        .get(&stmt)
        .ok_or(Error::Internal("Statement not found".into()))
}

#[async_trait]
impl RepositoryTrait for Repository {
    async fn create_account(&self, account: &mut Account) -> Result<(), Error> {
        let conn = self.connection().await?;

        let row = conn
            .query_one(
                prepared(&conn, statements_cache::Statement::CreateAccount)?,
                &[
                    &account.first_name,
                    &account.last_name,
                    &account.number,
                    &account.encrypted_password,
                    &account.balance,
                    &account.created_at,
                ],
            )
            .await?;

        account.id = row.try_get(0)?;

        Ok(())
    }

    async fn delete_account(&self, id: i32) -> Result<(), Error> {
        let conn = self.connection().await?;

        conn.execute(
            prepared(&conn, statements_cache::Statement::DeleteAccount)?,
            &[&id],
        )
        .await?;

        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<(), Error> {
        let conn = self.connection().await?;

        let updated = conn
            .execute(
                prepared(&conn, statements_cache::Statement::UpdateAccount)?,
                &[
                    &account.id,
                    &account.first_name,
                    &account.last_name,
                    &account.encrypted_password,
                    &account.balance,
                ],
            )
            .await?;

        match updated {
            0 => Err(Error::AccountNotFound(Lookup::Id(account.id))),
            _ => Ok(()),
        }
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, Error> {
        let conn = self.connection().await?;

        let rows = conn
            .query(
                prepared(&conn, statements_cache::Statement::GetAccounts)?,
                &[],
            )
            .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn get_account_by_id(&self, id: i32) -> Result<Account, Error> {
        let conn = self.connection().await?;

        query_opt(&conn, statements_cache::Statement::GetAccountById, &[&id])
            .await?
            .ok_or(Error::AccountNotFound(Lookup::Id(id)))?
            .try_into()
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, Error> {
        let conn = self.connection().await?;

        query_opt(
            &conn,
            statements_cache::Statement::GetAccountByNumber,
            &[&number],
        )
        .await?
        .ok_or(Error::AccountNotFound(Lookup::Number(number)))?
        .try_into()
    }
}

/// Decodes rows selected with [`schema::ACCOUNT_COLUMNS`], by position.
impl TryFrom<tokio_postgres::Row> for Account {
    type Error = Error;

    fn try_from(row: tokio_postgres::Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get(0)?,
            first_name: row.try_get(1)?,
            last_name: row.try_get(2)?,
            number: row.try_get(3)?,
            encrypted_password: row.try_get(4)?,
            balance: row.try_get(5)?,
            created_at: row.try_get(6)?,
        })
    }
}

impl From<bb8::RunError<tokio_postgres::Error>> for Error {
    fn from(err: bb8::RunError<tokio_postgres::Error>) -> Self {
        telemetry::error!("Postgres error: {:?}", err);

        match err {
            bb8::RunError::User(e) => Self::Internal(e.to_string()),
            bb8::RunError::TimedOut => Self::Connection,
        }
    }
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        telemetry::error!("Postgres error: {:?}", err);

        Self::Internal(err.to_string())
    }
}
