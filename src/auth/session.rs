use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Login state carried in the session cookie.
///
/// The server keeps no session table; this map is the whole of it. All keys
/// are optional: a brand-new visitor has an empty session, a visitor mid-login
/// has `state` + `redirect`, and an authenticated visitor has `email`,
/// `expire`, and `token`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unix seconds. The session is valid while this is strictly in the future.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<StoredToken>,
}

/// Provider credential kept alongside the session.
///
/// Opaque to the rest of the service; stored so the token (and its expiry)
/// survive across requests without a server-side store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix seconds, absent when the provider did not report a lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

impl Session {
    /// Whether the session grants access at `now` (unix seconds).
    ///
    /// A lapsed or absent expiry means the session is treated as empty and a
    /// fresh authentication round begins; expiry is only ever checked lazily
    /// here, on the next request.
    #[must_use]
    pub fn is_active(&self, now: i64) -> bool {
        self.expire.map_or(false, |expire| expire > now)
    }

    /// Pop the post-login redirect target, defaulting to `/`.
    pub fn take_redirect(&mut self) -> String {
        self.redirect.take().unwrap_or_else(|| "/".to_string())
    }
}

/// Current unix time in seconds.
#[must_use]
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
