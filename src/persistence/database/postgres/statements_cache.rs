use std::{collections::BTreeMap, ops::Deref};

use super::schema::ACCOUNT_COLUMNS;
use axum::async_trait;
use bb8_postgres::{
    bb8::{CustomizeConnection, ManageConnection},
    tokio_postgres::{self, NoTls},
    PostgresConnectionManager,
};

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Copy, Debug)]
pub enum Statement {
    CreateAccount,
    DeleteAccount,
    UpdateAccount,
    GetAccounts,
    GetAccountById,
    GetAccountByNumber,
}

impl Statement {
    const ALL: [Statement; 6] = [
        Statement::CreateAccount,
        Statement::DeleteAccount,
        Statement::UpdateAccount,
        Statement::GetAccounts,
        Statement::GetAccountById,
        Statement::GetAccountByNumber,
    ];

    fn sql(self) -> String {
        match self {
            Statement::CreateAccount => r#"
                INSERT INTO account
                    (firstName, lastName, number, encryptedPassword, balance, createdAt)
                VALUES
                    ($1, $2, $3, $4, $5, $6)
                RETURNING id;
            "#
            .into(),
            Statement::DeleteAccount => "DELETE FROM account WHERE id = $1;".into(),
            Statement::UpdateAccount => r#"
                UPDATE account
                SET
                    firstName = $2,
                    lastName = $3,
                    encryptedPassword = $4,
                    balance = $5
                WHERE
                    id = $1;
            "#
            .into(),
            Statement::GetAccounts => format!("SELECT {} FROM account;", ACCOUNT_COLUMNS),
            Statement::GetAccountById => {
                format!("SELECT {} FROM account WHERE id = $1;", ACCOUNT_COLUMNS)
            }
            Statement::GetAccountByNumber => {
                format!("SELECT {} FROM account WHERE number = $1;", ACCOUNT_COLUMNS)
            }
        }
    }
}

/// Prepares every [`Statement`] once per physical connection.
#[derive(Debug)]
pub struct Cache;

#[async_trait]
impl CustomizeConnection<Connection, tokio_postgres::Error> for Cache {
    async fn on_acquire(&self, conn: &mut Connection) -> Result<(), tokio_postgres::Error> {
        for statement in Statement::ALL {
            let prepared = conn.prepare(&statement.sql()).await?;
            conn.statements.insert(statement, prepared);
        }

        Ok(())
    }
}

pub struct Connection {
    inner: tokio_postgres::Client,
    pub statements: BTreeMap<Statement, tokio_postgres::Statement>,
}

impl Connection {
    fn new(inner: tokio_postgres::Client) -> Self {
        Self {
            inner,
            statements: Default::default(),
        }
    }
}

impl Deref for Connection {
    type Target = tokio_postgres::Client;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Hands out [`Connection`]s wrapping plain-text `tokio_postgres` clients.
pub struct ConnectionManager {
    inner: PostgresConnectionManager<NoTls>,
}

impl ConnectionManager {
    pub fn new(config: tokio_postgres::Config) -> Self {
        Self {
            inner: PostgresConnectionManager::new(config, NoTls),
        }
    }
}

#[async_trait]
impl ManageConnection for ConnectionManager {
    type Connection = Connection;
    type Error = tokio_postgres::Error;

    async fn connect(&self) -> Result<Self::Connection, Self::Error> {
        let conn = self.inner.connect().await?;
        Ok(Connection::new(conn))
    }

    async fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.simple_query("").await.map(|_| ())
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        self.inner.has_broken(&mut conn.inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_every_statement_is_distinct() {
        let unique: std::collections::BTreeSet<_> = Statement::ALL.into_iter().collect();

        assert_eq!(unique.len(), Statement::ALL.len());
    }

    #[rstest]
    #[case(Statement::GetAccounts)]
    #[case(Statement::GetAccountById)]
    #[case(Statement::GetAccountByNumber)]
    fn test_selects_use_positional_columns(#[case] statement: Statement) {
        assert!(statement.sql().starts_with(&format!("SELECT {} ", ACCOUNT_COLUMNS)));
    }

    #[rstest]
    #[case(Statement::CreateAccount, 6)]
    #[case(Statement::DeleteAccount, 1)]
    #[case(Statement::UpdateAccount, 5)]
    #[case(Statement::GetAccountById, 1)]
    #[case(Statement::GetAccountByNumber, 1)]
    fn test_statements_are_parameterized(#[case] statement: Statement, #[case] params: usize) {
        let sql = statement.sql();

        for n in 1..=params {
            assert!(sql.contains(&format!("${}", n)), "missing ${} in {}", n, sql);
        }
        assert!(!sql.contains(&format!("${}", params + 1)));
    }
}
