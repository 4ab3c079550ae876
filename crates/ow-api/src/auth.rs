//! Browser login helpers: PKCE parameters, the authorize URL, and the token
//! endpoint calls.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

use crate::endpoint::{Endpoints, CLIENT_ID, CODE_CHALLENGE_METHOD, REDIRECT_URI, SCOPE};
use crate::error::{ApiError, ApiResult};
use crate::token::Tokens;

/// PKCE verifier/challenge pair plus the anti-forgery `state` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PkceSession {
    pub verifier: String,
    pub challenge: String,
    pub state: String,
}

impl PkceSession {
    /// Fresh random session: 32-byte verifier, 16-byte hex state.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut verifier = [0u8; 32];
        rng.fill_bytes(&mut verifier);
        let mut state = [0u8; 16];
        rng.fill_bytes(&mut state);
        Self::from_parts(URL_SAFE_NO_PAD.encode(verifier), hex::encode(state))
    }

    /// Session with a known verifier and state.
    pub fn from_parts(verifier: String, state: String) -> Self {
        let challenge = code_challenge(&verifier);
        Self {
            verifier,
            challenge,
            state,
        }
    }

    /// URL the user opens to log in.
    pub fn authorize_url(&self, endpoints: &Endpoints) -> ApiResult<Url> {
        let url = Url::parse_with_params(
            &endpoints.authorize,
            &[
                ("client_id", CLIENT_ID),
                ("redirect_uri", REDIRECT_URI),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("state", self.state.as_str()),
                ("code_challenge", self.challenge.as_str()),
                ("code_challenge_method", CODE_CHALLENGE_METHOD),
            ],
        )?;
        Ok(url)
    }

    /// Pull the authorization code out of the URL the browser was redirected
    /// to. A `state` parameter, when present, must match this session.
    pub fn extract_code(&self, redirected_url: &str) -> ApiResult<String> {
        let url = Url::parse(redirected_url.trim())?;
        let mut code = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" if value != self.state => return Err(ApiError::StateMismatch),
                _ => {}
            }
        }
        code.filter(|c| !c.is_empty()).ok_or(ApiError::MissingAuthCode)
    }
}

/// S256 code challenge: unpadded base64url of the verifier's SHA-256.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Access token returned by a refresh grant.
#[derive(Clone, Debug, Deserialize)]
pub struct RefreshedAccess {
    pub access_token: String,
}

/// Client for the token endpoint.
#[derive(Clone, Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// Trade an authorization code for a token pair.
    pub async fn exchange_code(&self, session: &PkceSession, code: &str) -> ApiResult<Tokens> {
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", CLIENT_ID),
            ("code", code),
            ("redirect_uri", REDIRECT_URI),
            ("code_verifier", session.verifier.as_str()),
        ];
        debug!(url = %self.endpoints.token, "exchanging authorization code");
        let tokens = self
            .http
            .post(&self.endpoints.token)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json::<Tokens>()
            .await?;
        Ok(tokens)
    }

    /// Obtain a new access token from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<RefreshedAccess> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", CLIENT_ID),
            ("refresh_token", refresh_token),
        ];
        debug!(url = %self.endpoints.token, "refreshing access token");
        let refreshed = self
            .http
            .post(&self.endpoints.token)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json::<RefreshedAccess>()
            .await?;
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_matches_rfc7636_vector() {
        assert_eq!(
            code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn generated_sessions_are_well_formed() {
        let a = PkceSession::generate();
        let b = PkceSession::generate();
        assert_eq!(a.verifier.len(), 43);
        assert_eq!(a.state.len(), 32);
        assert!(!a.verifier.contains('='));
        assert_eq!(a.challenge, code_challenge(&a.verifier));
        assert_ne!(a.verifier, b.verifier);
    }

    #[test]
    fn authorize_url_has_pkce_parameters() {
        let session = PkceSession::from_parts("verifier".into(), "abc".into());
        let url = session.authorize_url(&Endpoints::default()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "ownerapi".into())));
        assert!(pairs.contains(&("state".into(), "abc".into())));
        assert!(pairs.contains(&("code_challenge_method".into(), "S256".into())));
        assert!(pairs.contains(&("code_challenge".into(), session.challenge.clone())));
        assert!(pairs.contains(&("scope".into(), SCOPE.into())));
    }

    #[test]
    fn extract_code_from_redirect() {
        let session = PkceSession::from_parts("v".into(), "s1".into());
        let code = session
            .extract_code("https://auth.tesla.com/void/callback?code=XYZ&state=s1&issuer=x\n")
            .unwrap();
        assert_eq!(code, "XYZ");
    }

    #[test]
    fn extract_code_without_state_is_accepted() {
        let session = PkceSession::from_parts("v".into(), "s1".into());
        assert_eq!(session.extract_code("https://x/cb?code=C").unwrap(), "C");
    }

    #[test]
    fn extract_code_failures() {
        let session = PkceSession::from_parts("v".into(), "s1".into());
        assert!(matches!(
            session.extract_code("https://x/cb?state=s1"),
            Err(ApiError::MissingAuthCode)
        ));
        assert!(matches!(
            session.extract_code("https://x/cb?code=C&state=other"),
            Err(ApiError::StateMismatch)
        ));
        assert!(matches!(session.extract_code("not a url"), Err(ApiError::Url(_))));
    }
}
