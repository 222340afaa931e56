// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! REST adapter for the platform backend.
//!
//! ## Endpoints
//!
//! | Call | Request |
//! |---|---|
//! | generate wallet | `POST {base}/v1/self-custody/wallets` |
//! | list wallets | `GET {base}/v1/self-custody/wallets` |
//! | balance | `GET {base}/v1/balance` |
//! | create transfer | `POST {base}/v1/self-custody/transfers` |
//! | transfer history | `GET {base}/v1/self-custody/transfers` |
//!
//! Non-2xx answers become [`BackendError::Rejected`] carrying the body's
//! `error` field, or the raw body text when there is none.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};
use url::Url;

use super::{BackendError, BackendResult, Caller, CustodyBackend};
use crate::models::{
    GeneratedWallet, SelfCustodyTransfer, SelfCustodyWallet, TransferReceipt, TransferRequest,
};

const WALLETS_PATH: &str = "v1/self-custody/wallets";
const BALANCE_PATH: &str = "v1/balance";
const TRANSFERS_PATH: &str = "v1/self-custody/transfers";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    balance_satoshis: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`CustodyBackend`] over the platform's REST API.
#[derive(Debug, Clone)]
pub struct HttpCustodyBackend {
    base_url: Url,
    http: Client,
}

impl HttpCustodyBackend {
    /// `timeout` bounds each request at the transport level; `None` means no
    /// client-side timeout.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> BackendResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| BackendError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: normalize_base(base_url),
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidResponse(format!("bad endpoint {path}: {e}")))
    }

    async fn send<T: DeserializeOwned>(&self, caller: &Caller, request: RequestBuilder) -> BackendResult<T> {
        let response = request
            .bearer_auth(&caller.credential)
            .send()
            .await
            .map_err(|e| {
                warn!(identity = %caller.identity, error = %e, "Custody backend request failed");
                BackendError::Unavailable(e.to_string())
            })?;

        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, caller: &Caller, path: &str) -> BackendResult<T> {
        let url = self.endpoint(path)?;
        debug!(identity = %caller.identity, %url, "GET custody backend");
        self.send(caller, self.http.get(url)).await
    }
}

/// Make sure the base ends with `/` so `join` appends instead of replacing
/// the last path segment.
fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

async fn check_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());

    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string()
    } else {
        message
    };

    warn!(status = status.as_u16(), error = %message, "Custody backend rejected request");
    Err(BackendError::Rejected(message))
}

#[async_trait]
impl CustodyBackend for HttpCustodyBackend {
    async fn generate_self_custody_wallet(&self, caller: &Caller) -> BackendResult<GeneratedWallet> {
        let url = self.endpoint(WALLETS_PATH)?;
        debug!(identity = %caller.identity, "Requesting self-custody wallet generation");
        self.send(caller, self.http.post(url)).await
    }

    async fn list_self_custody_wallets(
        &self,
        caller: &Caller,
    ) -> BackendResult<Vec<SelfCustodyWallet>> {
        self.get(caller, WALLETS_PATH).await
    }

    async fn get_caller_balance(&self, caller: &Caller) -> BackendResult<u64> {
        let balance: BalanceResponse = self.get(caller, BALANCE_PATH).await?;
        Ok(balance.balance_satoshis)
    }

    async fn create_self_custody_transfer(
        &self,
        caller: &Caller,
        request: &TransferRequest,
    ) -> BackendResult<TransferReceipt> {
        let url = self.endpoint(TRANSFERS_PATH)?;
        debug!(
            identity = %caller.identity,
            amount_satoshis = request.amount_satoshis,
            destination = %request.destination_address,
            "Creating self-custody transfer"
        );
        self.send(caller, self.http.post(url).json(request)).await
    }

    async fn list_self_custody_transfer_history(
        &self,
        caller: &Caller,
    ) -> BackendResult<Vec<SelfCustodyTransfer>> {
        self.get(caller, TRANSFERS_PATH).await
    }
}
