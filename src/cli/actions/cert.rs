use crate::cert_cache::{CertCache, PgCertCache};
use crate::cli::actions::{Action, CertOp};
use anyhow::{anyhow, Result};
use sqlx::postgres::PgPoolOptions;
use tokio::io::AsyncWriteExt;

/// Handle the cert action
pub async fn handle(action: Action) -> Result<()> {
    let Action::Cert { dsn, op } = action else {
        return Err(anyhow!("not a cert action"));
    };

    let pool = PgPoolOptions::new().max_connections(1).connect(&dsn).await?;
    let cache = PgCertCache::new(pool);

    match op {
        CertOp::Get { key } => {
            let value = cache
                .get(&key)
                .await?
                .ok_or_else(|| anyhow!("not found: {key}"))?;
            tokio::io::stdout().write_all(&value).await?;
        }
        CertOp::Put { key, file } => {
            let value = tokio::fs::read(&file).await?;
            cache.put(&key, &value).await?;
        }
        CertOp::Delete { key } => cache.delete(&key).await?,
    }

    Ok(())
}
