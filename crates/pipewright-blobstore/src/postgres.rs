// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Postgres-backed blob store implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::BlobError;
use crate::key::BlobKey;
use crate::store::BlobStore;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Postgres-backed blob store.
///
/// Rows carry an `expires_at` timestamp; reads filter expired rows so a key
/// past its TTL behaves exactly like a deleted one, and [`purge_expired`]
/// reclaims the storage. Writes upsert so activity retries reusing the same
/// keys stay idempotent.
///
/// [`purge_expired`]: PostgresBlobStore::purge_expired
#[derive(Clone)]
pub struct PostgresBlobStore {
    pool: PgPool,
    ttl: Duration,
    max_payload_size: usize,
}

impl PostgresBlobStore {
    /// Create a store from an existing pool.
    pub fn new(pool: PgPool, ttl: Duration, max_payload_size: usize) -> Self {
        Self {
            pool,
            ttl,
            max_payload_size,
        }
    }

    /// Connect to Postgres, run migrations, and build a store.
    ///
    /// # Arguments
    /// * `url` - Postgres connection string
    /// * `ttl` - blob lifetime, normally the maximum workflow timeout
    /// * `max_payload_size` - encoded record size limit in bytes
    pub async fn connect(
        url: &str,
        ttl: Duration,
        max_payload_size: usize,
    ) -> Result<Self, BlobError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| BlobError::Backend(format!("failed to connect to postgres: {}", e)))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| BlobError::Backend(format!("failed to run migrations: {}", e)))?;

        Ok(Self::new(pool, ttl, max_payload_size))
    }

    /// Delete every expired row, returning how many were reclaimed.
    ///
    /// The engine deletes its keys on the happy path; this sweep is the
    /// backstop for keys orphaned by crashes or cancellations.
    pub async fn purge_expired(&self) -> Result<u64, BlobError> {
        let result = sqlx::query("DELETE FROM blobs WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl BlobStore for PostgresBlobStore {
    async fn put(&self, entries: Vec<(BlobKey, Value)>) -> Result<(), BlobError> {
        for (key, record) in entries {
            let payload = serde_json::to_string(&record)?;
            if payload.len() > self.max_payload_size {
                return Err(BlobError::PayloadTooLarge {
                    key: key.to_string(),
                    size: payload.len(),
                    max: self.max_payload_size,
                });
            }
            sqlx::query(
                r#"
                INSERT INTO blobs (key, payload, expires_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (key)
                DO UPDATE SET payload = EXCLUDED.payload, expires_at = EXCLUDED.expires_at
                "#,
            )
            .bind(key.as_str())
            .bind(&payload)
            .bind(Utc::now() + self.ttl)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn get(&self, keys: &[BlobKey]) -> Result<Vec<Value>, BlobError> {
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let payload: Option<String> = sqlx::query_scalar(
                r#"
                SELECT payload FROM blobs
                WHERE key = $1 AND expires_at > now()
                "#,
            )
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

            let payload = payload.ok_or_else(|| BlobError::Missing {
                key: key.to_string(),
            })?;
            records.push(serde_json::from_str(&payload)?);
        }
        Ok(records)
    }

    async fn delete(&self, key: &BlobKey) -> Result<(), BlobError> {
        sqlx::query("DELETE FROM blobs WHERE key = $1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
