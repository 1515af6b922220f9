//! JSON-RPC client for Solana-compatible nodes.

use crate::error::RpcError;
use crate::ports::outbound::{CommitmentLevel, ConfirmedTransaction, SignatureStatus, SolanaRpc};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{Blockhash, ChainAddress, Lamports, TxSignature};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a Value,
    id: u64,
}

/// JSON-RPC response structure.
///
/// `result` defaults to `null` so "not found" answers are distinguishable
/// from errors.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// RPC client with ordered endpoint fallback.
///
/// Transport failures move on to the next endpoint. A JSON-RPC error is the
/// node's answer and is returned as-is.
pub struct JsonRpcSolanaClient {
    http_client: reqwest::Client,
    endpoints: Vec<String>,
    request_id: AtomicU64,
}

impl JsonRpcSolanaClient {
    /// Create a client trying `endpoints` in order.
    pub fn new(endpoints: Vec<String>, timeout: Duration) -> Self {
        // reqwest::Client::new() is infallible
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            endpoints,
            request_id: AtomicU64::new(1),
        }
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Make a JSON-RPC call, falling back across endpoints.
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let mut last_error = None;

        for endpoint in &self.endpoints {
            match self.call_endpoint(endpoint, method, &params).await {
                Ok(result) => return Ok(result),
                Err(e @ RpcError::Transport { .. }) => {
                    warn!("[gp-03] RPC endpoint {} failed for {}: {}", endpoint, method, e);
                    last_error = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        Err(RpcError::AllEndpointsFailed {
            attempted: self.endpoints.len(),
            last: last_error.unwrap_or_else(|| "no endpoints configured".to_string()),
        })
    }

    async fn call_endpoint(
        &self,
        endpoint: &str,
        method: &str,
        params: &Value,
    ) -> Result<Value, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };
        debug!("[gp-03] RPC {} #{} -> {}", method, id, endpoint);

        let transport = |message: String| RpcError::Transport {
            endpoint: endpoint.to_string(),
            message,
        };

        let response = self
            .http_client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transport(format!("HTTP {status}")));
        }

        let body: JsonRpcResponse =
            response
                .json()
                .await
                .map_err(|e| RpcError::InvalidResponse {
                    message: e.to_string(),
                })?;

        if let Some(error) = body.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(body.result)
    }
}

#[async_trait]
impl SolanaRpc for JsonRpcSolanaClient {
    async fn get_balance(&self, address: &ChainAddress) -> Result<Lamports, RpcError> {
        let result = self
            .call(
                "getBalance",
                json!([address.to_string(), { "commitment": "confirmed" }]),
            )
            .await?;
        parse_balance(&result)
    }

    async fn get_latest_blockhash(&self) -> Result<Blockhash, RpcError> {
        let result = self
            .call("getLatestBlockhash", json!([{ "commitment": "confirmed" }]))
            .await?;
        parse_blockhash(&result)
    }

    async fn get_signature_status(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<SignatureStatus>, RpcError> {
        let result = self
            .call(
                "getSignatureStatuses",
                json!([[signature.as_str()], { "searchTransactionHistory": false }]),
            )
            .await?;
        parse_signature_status(&result)
    }

    async fn get_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<ConfirmedTransaction>, RpcError> {
        let result = self
            .call(
                "getTransaction",
                json!([
                    signature.as_str(),
                    {
                        "commitment": "confirmed",
                        "encoding": "json",
                        "maxSupportedTransactionVersion": 0
                    }
                ]),
            )
            .await?;
        parse_transaction(&result)
    }
}

fn invalid(message: impl Into<String>) -> RpcError {
    RpcError::InvalidResponse {
        message: message.into(),
    }
}

/// Encode a non-null execution error, `None` for null/absent.
fn chain_error(value: Option<&Value>) -> Option<String> {
    value.filter(|v| !v.is_null()).map(Value::to_string)
}

/// `getBalance` result: `{"context": {...}, "value": <lamports>}`
pub fn parse_balance(result: &Value) -> Result<Lamports, RpcError> {
    result["value"]
        .as_u64()
        .ok_or_else(|| invalid("getBalance: missing numeric value"))
}

/// `getLatestBlockhash` result: `{"value": {"blockhash": "...", ...}}`
pub fn parse_blockhash(result: &Value) -> Result<Blockhash, RpcError> {
    result["value"]["blockhash"]
        .as_str()
        .map(|hash| Blockhash(hash.to_string()))
        .ok_or_else(|| invalid("getLatestBlockhash: missing blockhash"))
}

/// `getSignatureStatuses` result: `{"value": [null | {...}]}`
pub fn parse_signature_status(result: &Value) -> Result<Option<SignatureStatus>, RpcError> {
    let entries = result["value"]
        .as_array()
        .ok_or_else(|| invalid("getSignatureStatuses: missing value array"))?;

    let Some(entry) = entries.first().filter(|e| !e.is_null()) else {
        return Ok(None);
    };

    let slot = entry["slot"]
        .as_u64()
        .ok_or_else(|| invalid("getSignatureStatuses: missing slot"))?;

    let confirmation_status = match entry.get("confirmationStatus") {
        None | Some(Value::Null) => None,
        Some(level) => Some(
            serde_json::from_value::<CommitmentLevel>(level.clone())
                .map_err(|e| invalid(format!("getSignatureStatuses: {e}")))?,
        ),
    };

    Ok(Some(SignatureStatus {
        slot,
        confirmation_status,
        err: chain_error(entry.get("err")),
    }))
}

/// `getTransaction` result: `null` or `{"slot": n, "meta": {"err": ...}}`
pub fn parse_transaction(result: &Value) -> Result<Option<ConfirmedTransaction>, RpcError> {
    if result.is_null() {
        return Ok(None);
    }

    let slot = result["slot"]
        .as_u64()
        .ok_or_else(|| invalid("getTransaction: missing slot"))?;

    Ok(Some(ConfirmedTransaction {
        slot,
        err: chain_error(result.get("meta").and_then(|meta| meta.get("err"))),
    }))
}
