// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::time::Duration;

/// Default maximum number of records in one trigger batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 32;

/// Default maximum encoded record size in bytes.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 32 * 1024 * 1024;

const DEFAULT_MAX_WORKFLOW_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_MAX_ACTIVITY_RETRY: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Workflow engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of records in one trigger batch.
    pub max_batch_size: usize,
    /// Maximum encoded record size in bytes.
    pub max_payload_size: usize,
    /// Workflow deadline, activity start-to-close timeout, and blob TTL.
    pub max_workflow_timeout: Duration,
    /// Maximum activity attempts before the failure surfaces.
    pub max_activity_retry: u32,
    /// Base delay for the activity retry backoff.
    pub retry_base_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            max_workflow_timeout: Duration::from_secs(DEFAULT_MAX_WORKFLOW_TIMEOUT_SECS),
            max_activity_retry: DEFAULT_MAX_ACTIVITY_RETRY,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional, with defaults:
    /// - `PIPEWRIGHT_MAX_BATCH_SIZE` (default: 32)
    /// - `PIPEWRIGHT_MAX_PAYLOAD_SIZE` (bytes, default: 33554432)
    /// - `PIPEWRIGHT_MAX_WORKFLOW_TIMEOUT` (seconds, default: 3600)
    /// - `PIPEWRIGHT_MAX_ACTIVITY_RETRY` (attempts, default: 3)
    /// - `PIPEWRIGHT_RETRY_BASE_DELAY_MS` (milliseconds, default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_batch_size: parse_env(
                "PIPEWRIGHT_MAX_BATCH_SIZE",
                DEFAULT_MAX_BATCH_SIZE,
                "must be a positive integer",
            )?,
            max_payload_size: parse_env(
                "PIPEWRIGHT_MAX_PAYLOAD_SIZE",
                DEFAULT_MAX_PAYLOAD_SIZE,
                "must be a byte count",
            )?,
            max_workflow_timeout: Duration::from_secs(parse_env(
                "PIPEWRIGHT_MAX_WORKFLOW_TIMEOUT",
                DEFAULT_MAX_WORKFLOW_TIMEOUT_SECS,
                "must be a duration in seconds",
            )?),
            max_activity_retry: parse_env(
                "PIPEWRIGHT_MAX_ACTIVITY_RETRY",
                DEFAULT_MAX_ACTIVITY_RETRY,
                "must be an attempt count",
            )?,
            retry_base_delay: Duration::from_millis(parse_env(
                "PIPEWRIGHT_RETRY_BASE_DELAY_MS",
                DEFAULT_RETRY_BASE_DELAY_MS,
                "must be a duration in milliseconds",
            )?),
        })
    }
}

fn parse_env<T: std::str::FromStr>(
    name: &'static str,
    default: T,
    hint: &'static str,
) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name, hint)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
