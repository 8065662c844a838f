//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, migrate::MigrateError};

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction. Dropping it without committing rolls it back.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error when a migration fails or the applied history diverges.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Encode an unsigned quantity for a `BIGINT` column.
pub(crate) fn encode_u64(column: &str, value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Decode a `BIGINT` column that must never be negative.
pub(crate) fn decode_u64(column: &str, value: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Decode a text column into one of the domain's string-backed enums.
pub(crate) fn decode_str<T>(column: &str, value: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use stockroom::returns::ReturnStatus;

    use super::*;

    #[test]
    fn negative_quantities_fail_to_decode() {
        let result = decode_u64("stock_quantity", -1);

        assert!(
            matches!(result, Err(sqlx::Error::ColumnDecode { ref index, .. }) if index == "stock_quantity"),
            "expected ColumnDecode, got {result:?}"
        );
    }

    #[test]
    fn oversized_quantities_fail_to_encode() {
        assert!(encode_u64("quantity", u64::MAX).is_err());
        assert!(matches!(encode_u64("quantity", 7), Ok(7)));
    }

    #[test]
    fn unknown_enum_strings_fail_to_decode() {
        assert!(decode_str::<ReturnStatus>("status", "LOST").is_err());
        assert!(matches!(
            decode_str::<ReturnStatus>("status", "RECEIVED"),
            Ok(ReturnStatus::Received)
        ));
    }
}
