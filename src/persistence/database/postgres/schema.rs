/// Idempotent bootstrap for the `account` table.
pub const CREATE_ACCOUNT_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS account (
        id SERIAL PRIMARY KEY,
        firstName VARCHAR(50) NOT NULL,
        lastName VARCHAR(50) NOT NULL,
        number BIGINT NOT NULL UNIQUE,
        encryptedPassword VARCHAR(100) NOT NULL,
        balance BIGINT NOT NULL DEFAULT 0,
        createdAt TIMESTAMPTZ NOT NULL
    );
"#;

/// Column list shared by every select. Row decoding relies on this order.
pub const ACCOUNT_COLUMNS: &str =
    "id, firstName, lastName, number, encryptedPassword, balance, createdAt";
