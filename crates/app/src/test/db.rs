//! Per-test PostgreSQL databases on one shared container.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const USER: &str = "stockroom_test";
const PASSWORD: &str = "stockroom_test_password";

/// Database names are interpolated into DDL, so only plain identifiers are allowed.
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("Database name must be 1-63 characters long".to_string());
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err("Database name must start with a letter or underscore".to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Database name can only contain letters, digits and underscores".to_string());
    }

    Ok(())
}

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(USER)
        .with_tag("17-alpine")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

/// Started on first use and shared by every test in the binary.
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases waiting to be dropped.
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            if let Err(err) = cleanup_database(&db_name).await {
                eprintln!("Failed to cleanup database '{db_name}': {err}");
            }
        }
    });

    sender
}

async fn database_url(container: &ContainerAsync<PostgresImage>, db_name: &str) -> String {
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{db_name}")
}

async fn cleanup_database(db_name: &str) -> Result<(), sqlx::Error> {
    let Some(container) = POSTGRES_CONTAINER.get() else {
        return Ok(());
    };

    if validate_database_name(db_name).is_err() {
        return Ok(());
    }

    let mut conn = PgConnection::connect(&database_url(container, "postgres").await).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// A freshly migrated database, dropped in the background when the value is.
///
/// Services commit their own transactions, so isolation comes from every test
/// getting its own database rather than from rollback.
#[derive(Debug)]
pub struct TestDb {
    pub pool: PgPool,
    pub name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    /// Create an isolated test database with a unique generated name.
    pub async fn new() -> Self {
        let name = format!("stockroom_test_{}", uuid::Uuid::now_v7().simple());

        Self::new_with_db_name(&name).await
    }

    /// Create an isolated test database with the given name.
    pub async fn new_with_db_name(db_name: &str) -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        if let Err(error) = validate_database_name(db_name) {
            panic!("Invalid database name '{db_name}': {error}");
        }

        let container = POSTGRES_CONTAINER
            .get_or_init(init_postgres_container)
            .await;

        let mut conn = PgConnection::connect(&database_url(container, "postgres").await)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let pool = PgPool::connect(&database_url(container, db_name).await)
            .await
            .expect("Failed to create pool for database");

        crate::database::migrate(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self {
            pool,
            name: db_name.to_string(),
        }
    }

    /// Begin a transaction that rolls back when dropped.
    pub async fn begin_test_transaction(&self) -> Transaction<'_, Postgres> {
        self.pool
            .begin()
            .await
            .expect("Failed to start test transaction")
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_names_must_be_plain_identifiers() {
        assert!(validate_database_name("stockroom_test_1").is_ok());
        assert!(validate_database_name("_underscore_start").is_ok());

        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
        assert!(validate_database_name("1starts_with_digit").is_err());
        assert!(validate_database_name("has-hyphen").is_err());
        assert!(validate_database_name("x\"; DROP DATABASE postgres; --").is_err());
    }

    #[tokio::test]
    async fn fresh_database_has_the_schema() {
        let test_db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM information_schema.tables WHERE table_name IN ('product_variants', 'stocktakes')",
        )
        .fetch_one(test_db.pool())
        .await
        .expect("Failed to query schema");

        assert_eq!(tables, 2);
    }

    #[tokio::test]
    async fn uncommitted_changes_are_invisible_to_other_transactions() {
        let test_db = TestDb::new().await;

        let mut tx1 = test_db.begin_test_transaction().await;

        sqlx::query("INSERT INTO products (uuid, code, name) VALUES ($1, 'TMP', 'Temp')")
            .bind(uuid::Uuid::now_v7())
            .execute(&mut *tx1)
            .await
            .expect("Failed to insert in tx1");

        let mut tx2 = test_db.begin_test_transaction().await;

        let visible: i64 = sqlx::query_scalar("SELECT count(*) FROM products")
            .fetch_one(&mut *tx2)
            .await
            .expect("Failed to count in tx2");

        assert_eq!(visible, 0);
    }
}
