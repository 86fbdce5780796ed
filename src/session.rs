//! Authentication and the session context threaded through every call.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fetch::{HttpClient, RpcError, rpc_call};

/// Fallback gateway when the vendor does not redirect to a regional server.
pub const DEFAULT_BASE_URL: &str = "https://my.geotab.com";

/// Credentials in the vendor's wire shape, sent with every authorized call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_name: String,
    pub session_id: String,
    pub database: String,
}

/// Everything needed to authorize further RPC calls, owned by the caller and
/// passed explicitly; nothing here is ambient or persisted.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub base_url: String,
    pub credentials: Credentials,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResult {
    credentials: Option<AuthCredentials>,
    path: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthCredentials {
    session_id: Option<String>,
    database: Option<String>,
}

/// Normalizes the server path returned by `Authenticate`.
///
/// The vendor answers with `"ThisServer"`, a bare hostname, or a
/// scheme-relative `//host` depending on whether the account lives on a
/// regional server.
pub fn normalize_base_url(path_from_auth: &str) -> String {
    let trimmed = path_from_auth.trim();
    if trimmed.is_empty() || trimmed == "ThisServer" {
        return DEFAULT_BASE_URL.to_string();
    }

    let mut url = trimmed.to_string();
    if url.starts_with("//") {
        url = format!("https:{url}");
    } else if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("https://{url}");
    }
    url.trim_end_matches('/').to_string()
}

/// Authenticates against the vendor and builds the [`SessionContext`] for the
/// rest of the run.
#[tracing::instrument(skip(client, password), fields(user_name, database))]
pub async fn authenticate<C: HttpClient>(
    client: &C,
    base_url: &str,
    user_name: &str,
    password: &str,
    database: &str,
) -> Result<SessionContext, RpcError> {
    let params = serde_json::json!({
        "userName": user_name,
        "password": password,
        "database": database,
    });

    let result = rpc_call(client, base_url, "Authenticate", params, None).await?;
    let auth: AuthResult = serde_json::from_value(result)?;

    let creds = auth
        .credentials
        .ok_or_else(|| RpcError::Malformed("Authenticate returned no credentials".into()))?;
    let session_id = creds
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RpcError::Malformed("Authenticate returned no sessionId".into()))?;
    let database = creds.database.unwrap_or_else(|| database.to_string());
    let base_url = normalize_base_url(auth.path.as_deref().unwrap_or(""));

    info!(%base_url, %database, "Authenticated");

    Ok(SessionContext {
        base_url,
        credentials: Credentials {
            user_name: user_name.to_string(),
            session_id,
            database,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_this_server_uses_default() {
        assert_eq!(normalize_base_url("ThisServer"), DEFAULT_BASE_URL);
        assert_eq!(normalize_base_url(""), DEFAULT_BASE_URL);
        assert_eq!(normalize_base_url("  "), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_normalize_scheme_relative() {
        assert_eq!(
            normalize_base_url("//my42.geotab.com"),
            "https://my42.geotab.com"
        );
    }

    #[test]
    fn test_normalize_bare_host() {
        assert_eq!(
            normalize_base_url("my42.geotab.com"),
            "https://my42.geotab.com"
        );
    }

    #[test]
    fn test_normalize_keeps_scheme_and_trims_slashes() {
        assert_eq!(
            normalize_base_url("https://my42.geotab.com///"),
            "https://my42.geotab.com"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080/"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_credentials_wire_shape() {
        let creds = Credentials {
            user_name: "ops@example.com".into(),
            session_id: "s-123".into(),
            database: "acme".into(),
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["userName"], "ops@example.com");
        assert_eq!(json["sessionId"], "s-123");
        assert_eq!(json["database"], "acme");
    }
}
