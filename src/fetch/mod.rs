//! JSON-RPC gateway plumbing.
//!
//! A single call: POST the envelope to `{base_url}/apiv1`, then split the
//! outcome three ways — transport failure, RPC-level error object, or the
//! decoded `result` value.

mod basic;
mod client;
mod error;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use error::RpcError;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::session::Credentials;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    // Vendor expects credentials as a sibling of params, not nested inside.
    #[serde(skip_serializing_if = "Option::is_none")]
    credentials: Option<&'a Credentials>,
    id: u64,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Interprets one HTTP response from the gateway.
///
/// Non-2xx statuses surface verbatim as [`RpcError::Transport`]; a 2xx body
/// carrying an `error` object becomes [`RpcError::Rpc`]; otherwise the
/// `result` value is returned (`null` when the gateway sent none).
pub fn decode_envelope(status: u16, body: &[u8]) -> Result<Value, RpcError> {
    if !(200..300).contains(&status) {
        return Err(RpcError::Transport {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }

    let response: RpcResponse = serde_json::from_slice(body)?;
    if let Some(err) = response.error {
        return Err(RpcError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    Ok(response.result.unwrap_or(Value::Null))
}

/// Executes one JSON-RPC method against the vendor gateway.
pub async fn rpc_call<C: HttpClient>(
    client: &C,
    base_url: &str,
    method: &str,
    params: Value,
    credentials: Option<&Credentials>,
) -> Result<Value, RpcError> {
    let endpoint = format!("{}/apiv1", base_url.trim_end_matches('/'));
    let url = endpoint
        .parse()
        .map_err(|_| RpcError::InvalidUrl(endpoint.clone()))?;

    let envelope = RpcRequest {
        jsonrpc: "2.0",
        method,
        params,
        credentials,
        id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
    };

    let mut req = reqwest::Request::new(Method::POST, url);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(&envelope)?.into());

    debug!(endpoint, method, "Sending RPC request");

    let resp = client.execute(req).await?;
    let status = resp.status().as_u16();
    let body = resp.bytes().await?;

    decode_envelope(status, &body)
}
