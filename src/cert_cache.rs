//! Persistent key/value store for TLS certificate material.
//!
//! The service itself terminates plain HTTP; certificate acquisition and TLS
//! termination live in front of it. This module only provides the durable
//! byte store that tooling (the `cert` subcommand, the external ACME client)
//! reads and writes, backed by Postgres:
//!
//! ```sql
//! CREATE TABLE cert_cache (
//!     key   TEXT PRIMARY KEY,
//!     value BYTEA NOT NULL
//! );
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

/// Keys are namespaced so the table can be shared with other config rows.
const KEY_PREFIX: &str = "autocert-";

/// Byte store contract: get-by-key (miss is `None`, not an error), put, delete.
#[async_trait]
pub trait CertCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, data: &[u8]) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Postgres-backed [`CertCache`].
pub struct PgCertCache {
    pool: PgPool,
}

impl PgCertCache {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn storage_key(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }
}

#[async_trait]
impl CertCache for PgCertCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> =
            sqlx::query_as("SELECT value FROM cert_cache WHERE key = $1")
                .bind(Self::storage_key(key))
                .fetch_optional(&self.pool)
                .await
                .context("cert cache lookup failed")?;

        Ok(row.map(|(value,)| value))
    }

    async fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        sqlx::query(
            "INSERT INTO cert_cache (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(Self::storage_key(key))
        .bind(data)
        .execute(&self.pool)
        .await
        .context("cert cache write failed")?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM cert_cache WHERE key = $1")
            .bind(Self::storage_key(key))
            .execute(&self.pool)
            .await
            .context("cert cache delete failed")?;

        Ok(())
    }
}
