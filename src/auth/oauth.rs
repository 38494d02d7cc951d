use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::auth::session::{now_unix, StoredToken};
use crate::APP_USER_AGENT;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth provider configuration, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: SecretString,
    pub(crate) auth_url: Url,
    pub(crate) token_url: Url,
    pub(crate) redirect_url: Url,
    pub(crate) scopes: Vec<String>,
}

impl OAuthConfig {
    /// Create a configuration against the Google endpoints.
    ///
    /// `redirect_url` is the full external callback URL, i.e. the configured
    /// base URL with the fixed callback path appended.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: SecretString,
        redirect_url: Url,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            auth_url: GOOGLE_AUTH_URL.parse().expect("valid default URL"),
            token_url: GOOGLE_TOKEN_URL.parse().expect("valid default URL"),
            redirect_url,
            scopes: vec!["email".to_string()],
        }
    }

    /// Override the authorization endpoint (test servers).
    #[must_use]
    pub fn with_auth_url(mut self, url: Url) -> Self {
        self.auth_url = url;
        self
    }

    /// Override the token endpoint (test servers).
    #[must_use]
    pub fn with_token_url(mut self, url: Url) -> Self {
        self.token_url = url;
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }
}

/// Wire shape of the provider token endpoint response.
///
/// `id_token` is typed as an optional string rather than fished out of a raw
/// extra-field map: an absent or non-string value is simply `None`, and the
/// callback turns that into its own explicit failure.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

impl TokenResponse {
    /// Token expiry as unix seconds, when the provider reported a lifetime.
    #[must_use]
    pub fn expiry(&self) -> Option<i64> {
        self.expires_in
            .map(|secs| now_unix() + i64::try_from(secs).unwrap_or(0))
    }

    /// The credential record persisted into the session cookie.
    #[must_use]
    pub fn stored(&self) -> StoredToken {
        StoredToken {
            access_token: self.access_token.clone(),
            token_type: self.token_type.clone(),
            refresh_token: self.refresh_token.clone(),
            expiry: self.expiry(),
        }
    }
}

/// Authorization-code flow client.
pub struct OAuthClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl OAuthClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Error creating reqwest client")?;

        Ok(Self { config, http })
    }

    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Provider authorization URL carrying the anti-forgery `state`.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.redirect_url.as_str())
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state);
        url.into()
    }

    /// Exchange an authorization code for a provider token.
    ///
    /// Bounded by the caller's cancellation: dropping the request future
    /// aborts the in-flight call. No retries; a failure surfaces the
    /// provider's error text verbatim.
    ///
    /// # Errors
    /// Returns an error on network failure or a non-2xx provider response.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret()),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await
            .context("token endpoint unreachable")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("token endpoint returned {status}: {body}"));
        }

        response
            .json::<TokenResponse>()
            .await
            .context("token endpoint returned an unparsable body")
    }
}
