//! Server registry: the ordered name → base-URL mapping used for fan-out
//! token validation.
//!
//! The registry is configured as a JSON object (`BASE_URL`), e.g.
//! `{"Local Backend": "/api", "Mirror": "https://neko.example.com"}`.
//! Object order is preserved; downstream aggregation emits exactly one result
//! per entry, in this order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How an entry is reached. Decided once, when the registry is parsed,
/// instead of re-inferring it from the URL on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerKind {
    /// The local backend; handles both token kinds via `/api/auth/validate`.
    Local,
    /// An externally hosted NewAPI-compatible server; only serves
    /// `sk-` tokens via its billing subscription endpoint.
    ExternalNewApi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    pub name: String,
    pub base_url: String,
    pub kind: ServerKind,
}

/// Ordered collection of configured servers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerRegistry {
    entries: Vec<ServerEntry>,
}

impl ServerRegistry {
    /// Parse a registry from its JSON object representation.
    ///
    /// A base URL that is exactly `/api` or starts with `/api` designates the
    /// local backend; anything else is treated as an external NewAPI server.
    /// Duplicate names collapse to the last occurrence, per JSON object
    /// semantics.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: IndexMap<String, String> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|(name, base_url)| {
                let kind = if base_url.starts_with("/api") {
                    ServerKind::Local
                } else {
                    ServerKind::ExternalNewApi
                };
                ServerEntry {
                    name,
                    base_url,
                    kind,
                }
            })
            .collect();
        Ok(ServerRegistry { entries })
    }

    pub fn entries(&self) -> &[ServerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_registry() {
        let registry = ServerRegistry::from_json(r#"{"Local Backend": "/api"}"#).unwrap();
        assert_eq!(registry.len(), 1);
        let entry = &registry.entries()[0];
        assert_eq!(entry.name, "Local Backend");
        assert_eq!(entry.base_url, "/api");
        assert_eq!(entry.kind, ServerKind::Local);
    }

    #[test]
    fn preserves_declaration_order() {
        let registry = ServerRegistry::from_json(
            r#"{"Zeta": "https://z.example.com", "Local Backend": "/api", "Alpha": "https://a.example.com"}"#,
        )
        .unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["Zeta", "Local Backend", "Alpha"]);
    }

    #[test]
    fn detects_local_backend_by_url_shape() {
        let registry = ServerRegistry::from_json(
            r#"{"A": "/api", "B": "/api/v2", "C": "https://ext.example.com", "D": "http://localhost:9000"}"#,
        )
        .unwrap();
        let kinds: Vec<ServerKind> = registry.entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ServerKind::Local,
                ServerKind::Local,
                ServerKind::ExternalNewApi,
                ServerKind::ExternalNewApi,
            ]
        );
    }

    #[test]
    fn duplicate_names_collapse_to_last() {
        let registry =
            ServerRegistry::from_json(r#"{"S": "https://one.example", "S": "https://two.example"}"#)
                .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].base_url, "https://two.example");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ServerRegistry::from_json("not json").is_err());
        assert!(ServerRegistry::from_json(r#"["a", "b"]"#).is_err());
    }
}
