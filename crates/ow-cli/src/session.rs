//! Access-token acquisition for commands that talk to the vendor API.

use anyhow::{bail, Context};
use chrono::Utc;
use colored::Colorize;
use ow_api::{AuthClient, Endpoints, PkceSession, TokenStore, Tokens};
use tracing::warn;

use crate::config::WatchConfig;
use crate::output::Output;
use crate::prompt;

/// Saved tokens, refreshed when expired, or a fresh interactive login.
pub async fn access_token(
    config: &WatchConfig,
    http: &reqwest::Client,
    out: Output,
    interactive: bool,
) -> anyhow::Result<String> {
    let store = TokenStore::new(config.token_path());
    let auth = AuthClient::new(http.clone(), Endpoints::default());

    match store.load() {
        Ok(Some(mut tokens)) => {
            if !tokens.is_valid_at(Utc::now().timestamp()) {
                out.note("> Access token is not valid. Refreshing tokens...".yellow());
                let refreshed = auth
                    .refresh(&tokens.refresh_token)
                    .await
                    .context("refreshing access token")?;
                tokens.apply_refresh(refreshed);
                store.save(&tokens).context("saving refreshed tokens")?;
            }
            return Ok(tokens.access_token);
        }
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, path = %store.path().display(), "saved tokens unreadable");
            out.note("> Error loading tokens from file. Re-authenticating...".yellow());
            if !interactive {
                bail!("saved tokens are unreadable ({e}); run `orderwatch login` in a terminal");
            }
            let tokens = login(&auth, out).await?;
            store.save(&tokens).context("saving tokens")?;
            return Ok(tokens.access_token);
        }
    }

    if !interactive {
        bail!("no saved tokens and no terminal to log in; run `orderwatch login` first");
    }
    let tokens = login(&auth, out).await?;
    if prompt::confirm("Save the tokens for future requests?")? {
        store.save(&tokens).context("saving tokens")?;
    }
    Ok(tokens.access_token)
}

/// Interactive login: open the authorize URL, read back the redirect.
pub async fn login(auth: &AuthClient, out: Output) -> anyhow::Result<Tokens> {
    let session = PkceSession::generate();
    let url = session.authorize_url(&Endpoints::default())?;
    if let Err(e) = webbrowser::open(url.as_str()) {
        warn!(error = %e, "could not open a browser");
    }
    out.note("> Log in through the browser. If it did not open, use this URL:".blue());
    out.note(&url);
    out.note(
        "After logging in the browser shows a 'Page Not Found' page. Copy the full URL from the address bar."
            .dimmed(),
    );
    let redirected = prompt::input("Redirected URL")?;
    let code = session
        .extract_code(&redirected)
        .context("reading the authorization code from the redirected URL")?;
    let tokens = auth
        .exchange_code(&session, &code)
        .await
        .context("exchanging the authorization code")?;
    Ok(tokens)
}

/// `orderwatch login`: always log in and save.
pub async fn run_login(config: &WatchConfig, http: &reqwest::Client, out: Output) -> anyhow::Result<()> {
    if !prompt::is_interactive() {
        bail!("login needs a terminal");
    }
    let auth = AuthClient::new(http.clone(), Endpoints::default());
    let tokens = login(&auth, out).await?;
    let store = TokenStore::new(config.token_path());
    store.save(&tokens).context("saving tokens")?;
    out.note(format!("{} Tokens saved to {}", "✓".green().bold(), store.path().display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn config_in(dir: &tempfile::TempDir) -> WatchConfig {
        WatchConfig { data_dir: dir.path().to_path_buf(), ..Default::default() }
    }

    fn token_expiring_at(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let body = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        format!("{header}.{body}.sig")
    }

    async fn non_interactive(config: &WatchConfig) -> anyhow::Result<String> {
        access_token(config, &reqwest::Client::new(), Output::new(OutputFormat::Text), false).await
    }

    #[tokio::test]
    async fn missing_tokens_need_a_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let err = non_interactive(&config_in(&dir)).await.unwrap_err();
        assert!(err.to_string().contains("orderwatch login"));
    }

    #[tokio::test]
    async fn unreadable_tokens_need_a_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        std::fs::write(config.token_path(), "not json").unwrap();
        let err = non_interactive(&config).await.unwrap_err();
        assert!(err.to_string().contains("unreadable"));
    }

    #[tokio::test]
    async fn valid_saved_token_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let access = token_expiring_at(Utc::now().timestamp() + 3600);
        TokenStore::new(config.token_path())
            .save(&Tokens::new(access.clone(), "refresh"))
            .unwrap();
        assert_eq!(non_interactive(&config).await.unwrap(), access);
    }
}
