use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::auth::identity::IdentityError;

/// Failures on the login paths, mapped onto plain-text HTTP responses.
///
/// Protocol violations and rejected identities are the caller's fault (400);
/// upstream and codec failures are ours or the provider's (500). None of
/// these ever escalate the session — a failed callback leaves the visitor
/// exactly where a fresh one starts.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Callback `state` does not match the cookie, or no state was pending.
    #[error("bad state")]
    StateMismatch,
    /// Token exchange failed; carries the provider's error text.
    #[error("{0}")]
    Exchange(String),
    /// The exchanged credential carried no usable identity token.
    #[error("no identity token")]
    MissingIdToken,
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// Verified email is outside the allowed domain.
    #[error("unknown email domain: {0}")]
    EmailDomain(String),
    /// The updated session could not be encoded into a cookie.
    #[error("session cookie error: {0}")]
    Codec(String),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::StateMismatch | Self::EmailDomain(_) => StatusCode::BAD_REQUEST,
            Self::Exchange(_) | Self::MissingIdToken | Self::Identity(_) | Self::Codec(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
