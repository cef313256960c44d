//! Client-side token format classification
//!
//! Tokens are classified before any request is sent: a string that matches
//! neither pattern is rejected locally and never reaches the network.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// NewAPI credential: `sk-` followed by exactly 48 alphanumeric characters.
static NEWAPI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sk-[A-Za-z0-9]{48}$").expect("invalid newapi pattern"));

/// Webscout credential: `ws_` followed by exactly 32 alphanumeric characters.
static WEBSCOUT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ws_[A-Za-z0-9]{32}$").expect("invalid webscout pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    NewApi,
    Webscout,
    Unknown,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::NewApi => "newapi",
            TokenKind::Webscout => "webscout",
            TokenKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClassification {
    pub valid: bool,
    pub kind: TokenKind,
}

/// Classify a token string against the two fixed credential formats.
///
/// The prefixes are disjoint, so at most one pattern can match; newapi is
/// tested first and the first match wins. Anything else is `Unknown`.
pub fn classify(token: &str) -> TokenClassification {
    if NEWAPI_PATTERN.is_match(token) {
        TokenClassification {
            valid: true,
            kind: TokenKind::NewApi,
        }
    } else if WEBSCOUT_PATTERN.is_match(token) {
        TokenClassification {
            valid: true,
            kind: TokenKind::Webscout,
        }
    } else {
        TokenClassification {
            valid: false,
            kind: TokenKind::Unknown,
        }
    }
}

/// Mask a token for display, keeping the format prefix and the last four
/// characters visible.
pub fn mask_token(token: &str) -> String {
    let visible_tail = |s: &str| -> String {
        let chars: Vec<char> = s.chars().collect();
        chars[chars.len().saturating_sub(4)..].iter().collect()
    };
    if let Some(rest) = token.strip_prefix("sk-") {
        format!("sk-{}{}", "*".repeat(rest.len().saturating_sub(4)), visible_tail(rest))
    } else if let Some(rest) = token.strip_prefix("ws_") {
        format!("ws_{}{}", "*".repeat(rest.len().saturating_sub(4)), visible_tail(rest))
    } else {
        format!(
            "{}{}",
            "*".repeat(token.chars().count().saturating_sub(4)),
            visible_tail(token)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn newapi_token() -> String {
        format!("sk-{}", "a1B2".repeat(12))
    }

    fn webscout_token() -> String {
        format!("ws_{}", "Zz09".repeat(8))
    }

    #[test]
    fn classifies_newapi_tokens() {
        let token = newapi_token();
        assert_eq!(token.len(), 51);
        let result = classify(&token);
        assert!(result.valid);
        assert_eq!(result.kind, TokenKind::NewApi);
    }

    #[test]
    fn classifies_webscout_tokens() {
        let token = webscout_token();
        assert_eq!(token.len(), 35);
        let result = classify(&token);
        assert!(result.valid);
        assert_eq!(result.kind, TokenKind::Webscout);
    }

    #[test]
    fn rejects_everything_else() {
        let cases = vec![
            String::new(),
            "sk-".to_string(),
            "ws_".to_string(),
            "sk-short".to_string(),
            "hello world".to_string(),
            // one char short / one char long
            format!("sk-{}", "a".repeat(47)),
            format!("sk-{}", "a".repeat(49)),
            format!("ws_{}", "a".repeat(31)),
            format!("ws_{}", "a".repeat(33)),
            // right length, non-alphanumeric tail
            format!("sk-{}!", "a".repeat(47)),
            format!("ws_{}-", "a".repeat(31)),
            // wrong prefix separator
            format!("sk_{}", "a".repeat(48)),
            format!("ws-{}", "a".repeat(32)),
        ];
        for case in &cases {
            let result = classify(case);
            assert!(!result.valid, "expected {case:?} to be rejected");
            assert_eq!(result.kind, TokenKind::Unknown);
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let token = newapi_token();
        assert_eq!(classify(&token), classify(&token));
    }

    #[test]
    fn masks_keep_prefix_and_tail() {
        let token = newapi_token();
        let masked = mask_token(&token);
        assert!(masked.starts_with("sk-"));
        assert!(masked.ends_with(&token[token.len() - 4..]));
        assert_eq!(masked.len(), token.len());
        assert!(masked[3..masked.len() - 4].chars().all(|c| c == '*'));

        let token = webscout_token();
        let masked = mask_token(&token);
        assert!(masked.starts_with("ws_"));
        assert!(masked.ends_with(&token[token.len() - 4..]));

        assert_eq!(mask_token("abcdefgh"), "****efgh");
    }
}
