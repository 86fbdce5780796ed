use thiserror::Error;

/// Failure modes of a single JSON-RPC call.
///
/// Transport failures (non-2xx) and RPC-level failures (an `error` object in
/// a 200 response) are distinct cases so callers can tell an unreachable or
/// misconfigured gateway apart from a rejected request.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The HTTP layer returned a non-success status.
    #[error("HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// The gateway answered with a well-formed RPC error object.
    #[error("RPC Error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request could not be sent or the response body not read.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The response decoded, but not into the shape we expect.
    #[error("malformed RPC response: {0}")]
    Malformed(String),

    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Malformed(err.to_string())
    }
}
