//! # Facewall
//!
//! `facewall` serves an internal company directory page ("the face wall")
//! behind a Google OAuth login.
//!
//! ## Authentication
//!
//! There is no server-side session table. Login state lives entirely in a
//! single cookie, authenticated and encrypted with a key derived from the
//! OAuth client credentials at startup. Any request without a valid session
//! is bounced to the provider's authorization endpoint; the callback
//! exchanges the authorization code, checks the verified email against the
//! allowed domain, and writes the session back into the cookie.
//!
//! ## Directory
//!
//! `GET /api/employees` returns the BambooHR employee directory. The upstream
//! fetch is slow, so responses are held in a single mutex-guarded cache slot
//! with a one-hour TTL; concurrent misses serialize on the lock instead of
//! each hitting BambooHR.

pub mod api;
pub mod auth;
pub mod cert_cache;
pub mod cli;
pub mod directory;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
