// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP connector service client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConnectorError;
use crate::metadata::TriggerMetadata;
use crate::service::ConnectorService;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length of an error body echoed back in [`ConnectorError::Service`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    name: &'a str,
    inputs: &'a [Value],
}

#[derive(Deserialize)]
struct ExecuteResponse {
    outputs: Vec<Value>,
}

/// HTTP client for the connector service.
///
/// Dispatches `POST {base_url}/connectors/{name}/execute` with the batch in
/// the body and the trigger metadata in request headers (`id`, `uid`,
/// `owner`, `trigger_id`, `owner-uid`).
pub struct HttpConnectorService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpConnectorService {
    /// Create a client with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConnectorError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConnectorError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConnectorError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ConnectorService for HttpConnectorService {
    async fn execute(
        &self,
        name: &str,
        inputs: Vec<Value>,
        metadata: &TriggerMetadata,
    ) -> Result<Vec<Value>, ConnectorError> {
        let url = format!("{}/connectors/{}/execute", self.base_url, name);
        let response = self
            .http
            .post(&url)
            .header("id", &metadata.pipeline_id)
            .header("uid", metadata.pipeline_uid.to_string())
            .header("owner", &metadata.owner)
            .header("trigger_id", &metadata.trigger_id)
            .header("owner-uid", metadata.owner_uid())
            .json(&ExecuteRequest {
                name,
                inputs: &inputs,
            })
            .send()
            .await
            .map_err(|e| ConnectorError::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ConnectorError::NotFound {
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            message.truncate(MAX_ERROR_BODY);
            return Err(ConnectorError::Service {
                name: name.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: ExecuteResponse = response
            .json()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(e.to_string()))?;
        Ok(body.outputs)
    }
}
