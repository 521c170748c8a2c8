//! Database Connection Pool and Postgres Store
//!
//! PostgreSQL connection pooling via deadpool-postgres plus the
//! `PgCertificateStore` implementation of the storage trait. All driver
//! errors are translated into `StoreError` at this boundary; every call is
//! bounded by a timeout after which the store reports itself unavailable so
//! the resolver can fall back to the seed set instead of hanging the caller.

use ::async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolError, RecyclingMethod, Runtime};
use gemcert_core::{Certificate, CertificateDraft, CertificateNumber, StoreError};
use gemcert_storage::CertificateStore;
use std::future::Future;
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Per-call timeout; elapsed calls report `StoreError::Unavailable`.
    pub statement_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "gemcert".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            statement_timeout: Duration::from_secs(5),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("GEMCERT_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("GEMCERT_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("GEMCERT_DB_NAME").unwrap_or_else(|_| "gemcert".to_string()),
            user: std::env::var("GEMCERT_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("GEMCERT_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("GEMCERT_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            statement_timeout: Duration::from_secs(
                std::env::var("GEMCERT_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> Result<Pool, StoreError> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StoreError::Backend {
                reason: format!("Failed to create pool: {}", e),
            })
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client wrapping a connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
    statement_timeout: Duration,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> Result<Self, StoreError> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool, config.statement_timeout))
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> Result<deadpool_postgres::Object, StoreError> {
        self.pool.get().await.map_err(translate_pool_error)
    }

    /// Run a store operation under the configured timeout.
    async fn bounded<F, T>(&self, operation: &str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable {
                reason: format!("{} timed out after {:?}", operation, self.statement_timeout),
            }),
        }
    }

    /// Create the certificates table and its case-insensitive unique index.
    ///
    /// The raw column carries a plain unique constraint; the index on
    /// `lower(certificate_number)` is the authoritative case-insensitive
    /// guarantee (a case-sensitive constraint alone is insufficient).
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.get_conn().await?;
        conn.batch_execute(
            "CREATE TABLE IF NOT EXISTS certificates (
                id BIGSERIAL PRIMARY KEY,
                certificate_number VARCHAR(100) UNIQUE NOT NULL,
                gemstone_type VARCHAR(100) NOT NULL,
                carat_weight VARCHAR(50) NOT NULL,
                color VARCHAR(50) NOT NULL,
                clarity VARCHAR(50) NOT NULL,
                cut VARCHAR(100) NOT NULL,
                polish VARCHAR(50) NOT NULL,
                symmetry VARCHAR(50) NOT NULL,
                fluorescence VARCHAR(50) NOT NULL,
                measurements VARCHAR(100) NOT NULL,
                origin VARCHAR(100) NOT NULL,
                issue_date VARCHAR(50) NOT NULL,
                image_url TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );
            CREATE UNIQUE INDEX IF NOT EXISTS certificates_number_lower_idx
                ON certificates (lower(certificate_number));",
        )
        .await
        .map_err(translate_pg_error)
    }
}

// ============================================================================
// ERROR TRANSLATION
// ============================================================================

fn translate_pool_error(err: PoolError) -> StoreError {
    tracing::error!("connection pool error: {:?}", err);
    match err {
        PoolError::Timeout(_) => StoreError::Unavailable {
            reason: "connection pool timed out".to_string(),
        },
        PoolError::Closed => StoreError::Unavailable {
            reason: "connection pool is closed".to_string(),
        },
        other => StoreError::Backend {
            reason: format!("failed to acquire connection: {}", other),
        },
    }
}

fn translate_pg_error(err: tokio_postgres::Error) -> StoreError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        // The caller fills in the display number; the constraint fires on
        // the lower() index so the raw value is not recoverable here.
        return StoreError::DuplicateKey {
            certificate_number: String::new(),
        };
    }
    tracing::error!("database error: {:?}", err);
    if err.is_closed() {
        StoreError::Unavailable {
            reason: "database connection closed".to_string(),
        }
    } else {
        StoreError::Backend {
            reason: "database operation failed".to_string(),
        }
    }
}

// ============================================================================
// POSTGRES CERTIFICATE STORE
// ============================================================================

const CERTIFICATE_COLUMNS: &str = "id, certificate_number, gemstone_type, carat_weight, color, \
     clarity, cut, polish, symmetry, fluorescence, measurements, origin, \
     issue_date, image_url, created_at";

/// Postgres-backed implementation of [`CertificateStore`].
#[derive(Clone)]
pub struct PgCertificateStore {
    db: DbClient,
}

impl PgCertificateStore {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

fn row_to_certificate(row: &Row) -> Certificate {
    Certificate {
        id: row.get("id"),
        certificate_number: row.get("certificate_number"),
        gemstone_type: row.get("gemstone_type"),
        carat_weight: row.get("carat_weight"),
        color: row.get("color"),
        clarity: row.get("clarity"),
        cut: row.get("cut"),
        polish: row.get("polish"),
        symmetry: row.get("symmetry"),
        fluorescence: row.get("fluorescence"),
        measurements: row.get("measurements"),
        origin: row.get("origin"),
        issue_date: row.get("issue_date"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl CertificateStore for PgCertificateStore {
    async fn get(&self, number: &CertificateNumber) -> Result<Option<Certificate>, StoreError> {
        self.db
            .bounded("certificate_get", async {
                let conn = self.db.get_conn().await?;

                // Exact match first.
                let exact_sql = format!(
                    "SELECT {} FROM certificates WHERE certificate_number = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT 1",
                    CERTIFICATE_COLUMNS
                );
                let exact = conn
                    .query_opt(exact_sql.as_str(), &[&number.as_raw()])
                    .await
                    .map_err(translate_pg_error)?;
                if let Some(row) = exact {
                    return Ok(Some(row_to_certificate(&row)));
                }

                // Case-insensitive fallback; latest record wins if the data
                // ever contains case-colliding duplicates.
                let folded_sql = format!(
                    "SELECT {} FROM certificates WHERE lower(certificate_number) = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT 1",
                    CERTIFICATE_COLUMNS
                );
                let folded = conn
                    .query_opt(folded_sql.as_str(), &[&number.as_key()])
                    .await
                    .map_err(translate_pg_error)?;
                Ok(folded.map(|row| row_to_certificate(&row)))
            })
            .await
    }

    async fn exists(&self, number: &CertificateNumber) -> Result<bool, StoreError> {
        self.db
            .bounded("certificate_exists", async {
                let conn = self.db.get_conn().await?;
                let row = conn
                    .query_opt(
                        "SELECT 1 FROM certificates WHERE lower(certificate_number) = $1 LIMIT 1",
                        &[&number.as_key()],
                    )
                    .await
                    .map_err(translate_pg_error)?;
                Ok(row.is_some())
            })
            .await
    }

    async fn create(&self, draft: &CertificateDraft) -> Result<Certificate, StoreError> {
        let issue_date = draft.issue_date_or_today();
        let result = self
            .db
            .bounded("certificate_create", async {
                let conn = self.db.get_conn().await?;
                let insert_sql = format!(
                    "INSERT INTO certificates (
                        certificate_number, gemstone_type, carat_weight, color,
                        clarity, cut, polish, symmetry, fluorescence,
                        measurements, origin, issue_date, image_url
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                    RETURNING {}",
                    CERTIFICATE_COLUMNS
                );
                let row = conn
                    .query_one(
                        insert_sql.as_str(),
                        &[
                            &draft.certificate_number,
                            &draft.gemstone_type,
                            &draft.carat_weight,
                            &draft.color,
                            &draft.clarity,
                            &draft.cut,
                            &draft.polish,
                            &draft.symmetry,
                            &draft.fluorescence,
                            &draft.measurements,
                            &draft.origin,
                            &issue_date,
                            &draft.image_url,
                        ],
                    )
                    .await
                    .map_err(translate_pg_error)?;
                Ok(row_to_certificate(&row))
            })
            .await;

        // The unique-violation path loses the display value; restore it.
        result.map_err(|e| match e {
            StoreError::DuplicateKey { .. } => StoreError::DuplicateKey {
                certificate_number: draft.certificate_number.clone(),
            },
            other => other,
        })
    }

    async fn list(&self) -> Result<Vec<Certificate>, StoreError> {
        self.db
            .bounded("certificate_list", async {
                let conn = self.db.get_conn().await?;
                let list_sql = format!(
                    "SELECT {} FROM certificates ORDER BY created_at DESC, id DESC",
                    CERTIFICATE_COLUMNS
                );
                let rows = conn
                    .query(list_sql.as_str(), &[])
                    .await
                    .map_err(translate_pg_error)?;
                Ok(rows.iter().map(row_to_certificate).collect())
            })
            .await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db
            .bounded("health_check", async {
                let conn = self.db.get_conn().await?;
                conn.simple_query("SELECT 1")
                    .await
                    .map_err(translate_pg_error)?;
                Ok(())
            })
            .await
    }
}
