//! Persisted OAuth tokens and access-token expiry checks.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ow_store::{read_json, write_json, JsonStyle};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::auth::RefreshedAccess;
use crate::error::{ApiError, ApiResult};

/// Token pair as returned by the token endpoint.
///
/// Fields beyond the two we use are kept so the file round-trips unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            extra: Map::new(),
        }
    }

    /// Unix time at which the access token expires.
    pub fn expires_at(&self) -> ApiResult<i64> {
        access_token_expiry(&self.access_token)
    }

    /// Whether the access token is still usable at unix time `now`.
    ///
    /// An unreadable token counts as expired.
    pub fn is_valid_at(&self, now: i64) -> bool {
        match self.expires_at() {
            Ok(exp) => exp > now,
            Err(e) => {
                warn!(error = %e, "cannot read access token expiry; treating as expired");
                false
            }
        }
    }

    /// Take the access token from a refresh grant. The refresh token is kept.
    pub fn apply_refresh(&mut self, refreshed: RefreshedAccess) {
        self.access_token = refreshed.access_token;
    }
}

/// Read the `exp` claim of a JWT without verifying its signature.
pub fn access_token_expiry(token: &str) -> ApiResult<i64> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::MalformedToken("expected three dot-separated parts".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ApiError::MalformedToken(e.to_string()))?;
    let claims: Value =
        serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedToken(e.to_string()))?;
    let exp = claims
        .get("exp")
        .ok_or_else(|| ApiError::MalformedToken("no exp claim".into()))?;
    exp.as_i64()
        .or_else(|| exp.as_f64().map(|f| f as i64))
        .ok_or_else(|| ApiError::MalformedToken("exp is not a number".into()))
}

/// JSON file holding the token pair.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the saved tokens. A missing file is `Ok(None)`; a file without
    /// both tokens is an error.
    pub fn load(&self) -> ApiResult<Option<Tokens>> {
        Ok(read_json(&self.path)?)
    }

    pub fn save(&self, tokens: &Tokens) -> ApiResult<()> {
        write_json(&self.path, tokens, JsonStyle::Compact)?;
        info!(path = %self.path.display(), "tokens saved");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn jwt_with_claims(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let body = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{body}.sig")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expiry_is_read_from_payload() {
        let token = jwt_with_claims(&json!({"exp": 2_000_000_000, "sub": "x"}));
        assert_eq!(access_token_expiry(&token).unwrap(), 2_000_000_000);
    }

    #[test]
    fn padded_payload_is_accepted() {
        let token = jwt_with_claims(&json!({"exp": 5}));
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1].push_str("==");
        assert_eq!(access_token_expiry(&parts.join(".")).unwrap(), 5);
    }

    #[test]
    fn malformed_tokens() {
        assert!(matches!(access_token_expiry("opaque"), Err(ApiError::MalformedToken(_))));
        assert!(matches!(access_token_expiry("a.!!!.c"), Err(ApiError::MalformedToken(_))));
        let no_exp = jwt_with_claims(&json!({"sub": "x"}));
        assert!(matches!(access_token_expiry(&no_exp), Err(ApiError::MalformedToken(_))));
    }

    #[test]
    fn validity_against_clock() {
        let tokens = Tokens::new(jwt_with_claims(&json!({"exp": 1000})), "refresh");
        assert!(tokens.is_valid_at(999));
        assert!(!tokens.is_valid_at(1000));
        assert!(!Tokens::new("garbage", "r").is_valid_at(0));
    }

    #[test]
    fn refresh_replaces_only_access_token() {
        let mut tokens = Tokens::new("old", "keep");
        tokens.apply_refresh(RefreshedAccess { access_token: "new".into() });
        assert_eq!(tokens.access_token, "new");
        assert_eq!(tokens.refresh_token, "keep");
    }

    #[test]
    fn token_file_round_trip_keeps_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"));
        assert!(store.load().unwrap().is_none());

        let tokens: Tokens = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "id_token": "i",
            "expires_in": 28800
        }))
        .unwrap();
        store.save(&tokens).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, tokens);
        assert_eq!(loaded.extra.get("expires_in"), Some(&json!(28800)));
    }

    #[test]
    fn token_file_missing_field_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, r#"{"access_token": "a"}"#).unwrap();
        assert!(matches!(TokenStore::new(path).load(), Err(ApiError::Store(_))));
    }
}
