use bb8_postgres::tokio_postgres::{self, config::SslMode};
use std::{net::SocketAddr, str::FromStr};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl FromStr for Storage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone)]
pub struct Database {
    pub host: String,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub ssl_mode: SslMode,
    pub pool_size: u32,
}

impl Database {
    pub fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.dbname)
            .ssl_mode(self.ssl_mode);
        config
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone)]
pub struct Config {
    pub storage: Storage,
    pub database: Database,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.into());

        let storage = parse("STORAGE", var("STORAGE", "postgres"))?;

        let ssl_mode = match var("DB_SSLMODE", "disable").as_str() {
            "disable" => SslMode::Disable,
            "prefer" => SslMode::Prefer,
            "require" => SslMode::Require,
            other => {
                return Err(Error::Invalid {
                    name: "DB_SSLMODE",
                    value: other.into(),
                })
            }
        };

        let database = Database {
            host: var("DB_HOST", "localhost"),
            user: var("DB_USER", "postgres"),
            password: var("DB_PASSWORD", "postgres"),
            dbname: var("DB_NAME", "postgres"),
            ssl_mode,
            pool_size: parse("DB_POOL_SIZE", var("DB_POOL_SIZE", "10"))?,
        };

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(addr) => parse("LISTEN_ADDR", addr)?,
            None => parse("PORT", format!("0.0.0.0:{}", var("PORT", "3000")))?,
        };

        Ok(Self {
            storage,
            database,
            listen_addr,
        })
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, Error> {
    value.parse().map_err(|_| Error::Invalid { name, value })
}
