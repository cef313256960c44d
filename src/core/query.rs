//! Multi-server token validation fan-out.
//!
//! Given a classified token and the configured server registry, every entry
//! is queried independently and its outcome captured — an aggregate query
//! never fails as a whole, and one server's failure never disturbs another's
//! result. The aggregate always holds exactly one outcome per registry entry,
//! in registry order.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::client::{extract_api_error, BackendClient};
use crate::api::SubscriptionResponse;
use crate::core::registry::{ServerKind, ServerRegistry};
use crate::core::token::{classify, TokenKind};
use crate::utils::url::join_url;

/// Bound on each external billing-subscription probe. Backend calls use the
/// client-wide default instead.
pub const EXTERNAL_TIMEOUT: Duration = Duration::from_secs(10);

const SUBSCRIPTION_ENDPOINT: &str = "v1/dashboard/billing/subscription";

/// Outcome of validating one token against one server.
///
/// Tagged on `status` so the local backend's per-server result JSON decodes
/// directly into it; each variant carries only the fields meaningful to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ServerOutcome {
    Valid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        balance: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_type: Option<String>,
    },
    Invalid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_type: Option<String>,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Unsupported {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Timeout {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ServerOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        ServerOutcome::Error {
            error: Some(message.into()),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        ServerOutcome::Timeout {
            error: Some(message.into()),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        ServerOutcome::Unsupported {
            error: Some(message.into()),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ServerOutcome::Valid { .. } => "valid",
            ServerOutcome::Invalid { .. } => "invalid",
            ServerOutcome::Error { .. } => "error",
            ServerOutcome::Unsupported { .. } => "unsupported",
            ServerOutcome::Timeout { .. } => "timeout",
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ServerOutcome::Valid { .. } => None,
            ServerOutcome::Invalid { error, .. }
            | ServerOutcome::Error { error }
            | ServerOutcome::Unsupported { error }
            | ServerOutcome::Timeout { error } => error.as_deref(),
        }
    }

    pub fn token_type(&self) -> Option<&str> {
        match self {
            ServerOutcome::Valid { token_type, .. } | ServerOutcome::Invalid { token_type, .. } => {
                token_type.as_deref()
            }
            _ => None,
        }
    }

    /// Balance rendered for display; `hard_limit_usd` arrives as either a
    /// number or a string depending on the server.
    pub fn balance_display(&self) -> Option<String> {
        match self {
            ServerOutcome::Valid { balance, .. } => balance.as_ref().map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            _ => None,
        }
    }
}

/// One outcome per registry entry, keyed by server name, in registry order.
pub type AggregateResult = IndexMap<String, ServerOutcome>;

/// Query every configured server with the given token and collect per-server
/// outcomes.
///
/// Servers are visited sequentially in registry order. Local entries delegate
/// the whole token to the backend's validation endpoint; external entries are
/// probed directly, and only with NewAPI tokens — a Webscout token yields
/// `Unsupported` for them without any network call. Every failure is captured
/// in that entry's outcome; this function itself never fails.
pub async fn query_servers(
    token: &str,
    registry: &ServerRegistry,
    backend: &BackendClient,
) -> AggregateResult {
    let kind = classify(token).kind;
    let mut results = AggregateResult::with_capacity(registry.len());

    for entry in registry.entries() {
        let outcome = match entry.kind {
            ServerKind::Local => match backend.validate_token(token).await {
                Ok(body) => decode_local_result(body),
                Err(e) => {
                    warn!(server = %entry.name, "local validation failed: {e}");
                    ServerOutcome::error(e.to_string())
                }
            },
            ServerKind::ExternalNewApi => {
                if kind == TokenKind::NewApi {
                    probe_external(backend.http(), &entry.base_url, token, EXTERNAL_TIMEOUT).await
                } else {
                    ServerOutcome::unsupported(format!(
                        "{kind} tokens are not supported on external NewAPI servers"
                    ))
                }
            }
        };
        debug!(server = %entry.name, status = outcome.status(), "server outcome");
        results.insert(entry.name.clone(), outcome);
    }

    results
}

/// Interpret the local validation endpoint's response body as a per-server
/// outcome. A body that does not carry a recognizable `status` is captured as
/// an error rather than dropped.
fn decode_local_result(body: Value) -> ServerOutcome {
    match serde_json::from_value::<ServerOutcome>(body) {
        Ok(outcome) => outcome,
        Err(e) => ServerOutcome::error(format!("unrecognized validation response: {e}")),
    }
}

async fn probe_external(
    http: &reqwest::Client,
    base_url: &str,
    token: &str,
    timeout: Duration,
) -> ServerOutcome {
    let url = join_url(base_url, SUBSCRIPTION_ENDPOINT);
    debug!(%url, "probing external server");

    let sent = http
        .get(&url)
        .bearer_auth(token)
        .timeout(timeout)
        .send()
        .await;

    match sent {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                match response.json::<SubscriptionResponse>().await {
                    Ok(subscription) => ServerOutcome::Valid {
                        balance: subscription.hard_limit_usd,
                        usage: subscription.usage,
                        token_type: Some(TokenKind::NewApi.as_str().to_string()),
                    },
                    Err(e) => {
                        ServerOutcome::error(format!("malformed subscription response: {e}"))
                    }
                }
            } else {
                let body = response.text().await.unwrap_or_default();
                ServerOutcome::error(extract_api_error(status, &body))
            }
        }
        Err(e) if e.is_timeout() => {
            ServerOutcome::timeout(format!("no response within {timeout:?}"))
        }
        Err(e) => ServerOutcome::error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn newapi_token() -> String {
        format!("sk-{}", "a".repeat(48))
    }

    fn webscout_token() -> String {
        format!("ws_{}", "b".repeat(32))
    }

    // 127.0.0.1:9 (discard) is expected to refuse connections immediately,
    // which exercises the failure-capture paths without leaving the machine.
    fn unroutable_backend() -> BackendClient {
        BackendClient::new("http://127.0.0.1:9").unwrap()
    }

    #[tokio::test]
    async fn webscout_tokens_never_reach_external_servers() {
        // The external base URL is not resolvable; the test would error out
        // loudly if a request were attempted instead of short-circuiting.
        let registry = ServerRegistry::from_json(
            r#"{"External A": "https://ext.invalid", "External B": "https://ext2.invalid"}"#,
        )
        .unwrap();
        let backend = unroutable_backend();

        let results = query_servers(&webscout_token(), &registry, &backend).await;

        assert_eq!(results.len(), 2);
        for (_, outcome) in &results {
            assert_eq!(outcome.status(), "unsupported");
            let message = outcome.error_message().unwrap_or_default();
            assert!(!message.is_empty());
        }
    }

    #[tokio::test]
    async fn every_registry_entry_yields_exactly_one_result() {
        let registry = ServerRegistry::from_json(
            r#"{"Local Backend": "/api", "External A": "http://127.0.0.1:9", "External B": "https://ext.invalid"}"#,
        )
        .unwrap();
        let backend = unroutable_backend();

        let results = query_servers(&newapi_token(), &registry, &backend).await;

        let names: Vec<&str> = results.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Local Backend", "External A", "External B"]);
        // Every failure is captured per entry; none escalates or is dropped.
        for (_, outcome) in &results {
            assert!(matches!(
                outcome.status(),
                "error" | "timeout" | "invalid" | "valid"
            ));
            assert_ne!(outcome.status(), "valid");
        }
    }

    #[tokio::test]
    async fn one_failing_external_does_not_disturb_unsupported_entries() {
        let registry = ServerRegistry::from_json(
            r#"{"External A": "http://127.0.0.1:9", "External B": "https://ext.invalid"}"#,
        )
        .unwrap();
        let backend = unroutable_backend();

        let results = query_servers(&webscout_token(), &registry, &backend).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results["External A"].status(), "unsupported");
        assert_eq!(results["External B"].status(), "unsupported");
    }

    #[tokio::test]
    async fn unresponsive_external_servers_time_out() {
        // A bound listener that never accepts: the connection lands in the
        // kernel backlog and the request gets no response at all.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let http = reqwest::Client::new();

        let outcome = probe_external(
            &http,
            &format!("http://{addr}"),
            &newapi_token(),
            Duration::from_millis(200),
        )
        .await;

        assert_eq!(outcome.status(), "timeout");
        let message = outcome.error_message().unwrap_or_default();
        assert!(message.contains("no response"), "got: {message}");
    }

    #[test]
    fn decodes_local_webscout_result() {
        let body = json!({
            "token": "ws_x",
            "token_type": "webscout",
            "status": "valid",
            "user_id": "abcdef1234",
            "permissions": ["chat", "search"],
            "usage": {"requests_today": 45, "tokens_used": 12500}
        });
        let outcome = decode_local_result(body);
        assert_eq!(outcome.status(), "valid");
        assert_eq!(outcome.token_type(), Some("webscout"));
    }

    #[test]
    fn decodes_local_invalid_result() {
        let body = json!({
            "status": "invalid",
            "token_type": "webscout",
            "error": "Invalid webscout token format"
        });
        let outcome = decode_local_result(body);
        assert_eq!(outcome.status(), "invalid");
        assert_eq!(
            outcome.error_message(),
            Some("Invalid webscout token format")
        );
    }

    #[test]
    fn captures_unrecognized_local_bodies_as_errors() {
        let outcome = decode_local_result(json!({"token": "sk-x", "servers": {}}));
        assert_eq!(outcome.status(), "error");
        assert!(outcome.error_message().unwrap().contains("unrecognized"));

        let outcome = decode_local_result(json!("just a string"));
        assert_eq!(outcome.status(), "error");
    }

    #[test]
    fn balance_display_handles_numbers_and_strings() {
        let outcome = ServerOutcome::Valid {
            balance: Some(json!(12.5)),
            usage: None,
            token_type: None,
        };
        assert_eq!(outcome.balance_display().as_deref(), Some("12.5"));

        let outcome = ServerOutcome::Valid {
            balance: Some(json!("12.50")),
            usage: None,
            token_type: None,
        };
        assert_eq!(outcome.balance_display().as_deref(), Some("12.50"));

        assert_eq!(ServerOutcome::error("x").balance_display(), None);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = ServerOutcome::unsupported("not here");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "unsupported");
        assert_eq!(value["error"], "not here");
    }
}
