//! Cookie-based authentication gateway.
//!
//! Wraps the inner router as an axum middleware layer. Per request:
//! a decodable cookie with an unexpired session passes straight through;
//! anything else is redirected to the provider's authorization endpoint with
//! a fresh anti-forgery `state` stashed in the cookie, together with the
//! original URL to return to. The callback route completes the round:
//! state check, code exchange, identity extraction, domain check, and the
//! session rewrite that actually grants access.
//!
//! A cookie that fails to decode is treated as no cookie at all. That
//! degrades a tampered or stale cookie to "please log in again", never to a
//! hard failure and never to access.

pub mod codec;
pub mod error;
pub mod identity;
pub mod oauth;
pub mod session;
pub mod state;

pub use codec::SessionCodec;
pub use error::AuthError;
pub use oauth::{OAuthClient, OAuthConfig};
pub use session::Session;
pub use state::StateGenerator;

use anyhow::Result;
use axum::{
    extract::{Query, Request},
    http::{header::LOCATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Session cookie name. Deliberately meaningless; the value is opaque anyway.
pub const COOKIE_NAME: &str = "fw";

/// Fixed OAuth callback path, appended to the external base URL.
pub const CALLBACK_PATH: &str = "/oauth/callback";

const COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Shared gateway state, injected via `Extension`.
pub struct AuthGateway {
    codec: SessionCodec,
    client: OAuthClient,
    states: StateGenerator,
    email_domain: String,
    secure_cookies: bool,
}

impl AuthGateway {
    /// # Errors
    /// Returns an error if the provider HTTP client cannot be built.
    pub fn new(config: OAuthConfig, email_domain: impl Into<String>) -> Result<Self> {
        let codec = SessionCodec::new(
            config.client_id(),
            config.client_secret().expose_secret(),
            COOKIE_NAME,
        );
        // Cookies are marked Secure exactly when the externally visible URL
        // scheme is https; the service itself always listens on plain HTTP.
        let secure_cookies = config.redirect_url.scheme() == "https";
        let client = OAuthClient::new(config)?;

        Ok(Self {
            codec,
            client,
            states: StateGenerator::new(),
            email_domain: email_domain.into(),
            secure_cookies,
        })
    }

    #[must_use]
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Decode the session from the cookie jar; absent or unverifiable
    /// cookies yield an empty session.
    #[must_use]
    pub fn session(&self, jar: &CookieJar) -> Session {
        let Some(cookie) = jar.get(COOKIE_NAME) else {
            return Session::default();
        };
        match self.codec.decode(cookie.value()) {
            Ok(session) => session,
            Err(e) => {
                debug!("rejecting session cookie: {e}");
                Session::default()
            }
        }
    }

    fn session_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
            .build()
    }

    fn email_allowed(&self, email: &str) -> bool {
        email.ends_with(&format!("@{}", self.email_domain))
    }
}

/// Middleware gating every wrapped route behind a valid session.
pub async fn require_login(
    Extension(gateway): Extension<Arc<AuthGateway>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let mut session = gateway.session(&jar);
    if session.is_active(session::now_unix()) {
        // Authenticated path: dispatch unchanged, no cookie mutation.
        return next.run(request).await;
    }

    let state = gateway.states.next_state();
    let original = request
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str())
        .to_string();

    session.state = Some(state.clone());
    session.redirect = Some(original);

    let encoded = match gateway.codec.encode(&session) {
        Ok(encoded) => encoded,
        Err(e) => {
            return AuthError::Codec(e.to_string()).into_response();
        }
    };

    let authorize_url = gateway.client.authorize_url(&state);
    (
        jar.add(gateway.session_cookie(encoded)),
        Redirect::temporary(&authorize_url),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    state: String,
    #[serde(default)]
    code: String,
}

/// OAuth callback: validate state, exchange the code, establish the session.
///
/// Every failure leaves the session unescalated; the next request simply
/// starts a fresh authentication round.
pub async fn callback(
    Extension(gateway): Extension<Arc<AuthGateway>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AuthError> {
    let mut session = gateway.session(&jar);

    // Also rejects callbacks with no pending state at all.
    if session.state.as_deref() != Some(params.state.as_str()) {
        warn!("callback state mismatch");
        return Err(AuthError::StateMismatch);
    }

    let token = gateway
        .client
        .exchange_code(&params.code)
        .await
        .map_err(|e| AuthError::Exchange(e.to_string()))?;

    let id_token = token.id_token.as_deref().ok_or(AuthError::MissingIdToken)?;
    let email = identity::email_from_id_token(id_token)?;

    if !gateway.email_allowed(&email) {
        warn!(email = %email, "login rejected: email outside allowed domain");
        return Err(AuthError::EmailDomain(email));
    }

    session.state = None;
    session.email = Some(email.clone());
    session.expire = token.expiry();
    session.token = Some(token.stored());
    let redirect = session.take_redirect();

    let encoded = gateway
        .codec
        .encode(&session)
        .map_err(|e| AuthError::Codec(e.to_string()))?;

    info!(email = %email, "login successful");

    let location =
        HeaderValue::from_str(&redirect).unwrap_or_else(|_| HeaderValue::from_static("/"));
    Ok((
        StatusCode::FOUND,
        jar.add(gateway.session_cookie(encoded)),
        [(LOCATION, location)],
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn gateway() -> AuthGateway {
        let config = OAuthConfig::new(
            "client-id",
            SecretString::from("client-secret".to_string()),
            "https://wall.example.com/oauth/callback".parse().unwrap(),
        );
        AuthGateway::new(config, "example.com").unwrap()
    }

    #[test]
    fn test_email_domain_check() {
        let gateway = gateway();
        assert!(gateway.email_allowed("alice@example.com"));
        assert!(!gateway.email_allowed("bob@other.com"));
        // Suffix match must include the separator.
        assert!(!gateway.email_allowed("carol@notexample.com"));
        assert!(!gateway.email_allowed("example.com"));
    }

    #[test]
    fn test_secure_cookie_follows_external_scheme() {
        let https = gateway();
        assert!(https.secure_cookies);

        let config = OAuthConfig::new(
            "client-id",
            SecretString::from("client-secret".to_string()),
            "http://localhost:4001/oauth/callback".parse().unwrap(),
        );
        let http = AuthGateway::new(config, "example.com").unwrap();
        assert!(!http.secure_cookies);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = gateway().session_cookie("opaque".to_string());
        assert_eq!(cookie.name(), COOKIE_NAME);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
    }

    #[test]
    fn test_missing_cookie_yields_empty_session() {
        let gateway = gateway();
        let jar = CookieJar::new();
        assert_eq!(gateway.session(&jar), Session::default());
    }

    #[test]
    fn test_garbage_cookie_yields_empty_session() {
        let gateway = gateway();
        let jar = CookieJar::new().add(Cookie::new(COOKIE_NAME, "tampered"));
        assert_eq!(gateway.session(&jar), Session::default());
    }
}
