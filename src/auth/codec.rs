use crate::auth::session::Session;
use anyhow::Result;
use base64ct::{Base64UrlUnpadded, Encoding};
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Encrypts the session map into an opaque, URL-safe cookie value and back.
///
/// The key is derived once at startup by hashing the OAuth client id and
/// secret; rotating either credential invalidates every outstanding cookie,
/// which simply sends everyone back through the login flow. The AEAD covers
/// both halves of the job (integrity and confidentiality), with the cookie
/// name bound in as associated data.
pub struct SessionCodec {
    key: Key,
    aad: &'static str,
}

impl SessionCodec {
    #[must_use]
    pub fn new(client_id: &str, client_secret: &str, cookie_name: &'static str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(client_id.as_bytes());
        hasher.update(client_secret.as_bytes());
        let digest = hasher.finalize();

        Self {
            key: Key::clone_from_slice(&digest),
            aad: cookie_name,
        }
    }

    /// Encode a session into a cookie value: `base64url(nonce || ciphertext)`.
    ///
    /// # Errors
    /// Returns an error if serialization or encryption fails.
    pub fn encode(&self, session: &Session) -> Result<String> {
        let plaintext = serde_json::to_vec(session)?;

        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = ChaCha20Poly1305::new(&self.key);
        let ciphertext = cipher
            .encrypt(
                nonce,
                Payload {
                    msg: &plaintext,
                    aad: self.aad.as_bytes(),
                },
            )
            .map_err(|e| anyhow::anyhow!("session encryption failure: {e}"))?;

        let mut sealed = Vec::with_capacity(nonce_bytes.len() + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(Base64UrlUnpadded::encode_string(&sealed))
    }

    /// Decode and verify a cookie value back into a session.
    ///
    /// # Errors
    /// Returns an error on malformed base64, truncated or tampered
    /// ciphertext, or a payload that does not parse back into the session
    /// shape. Request handling treats all of these as "empty session".
    pub fn decode(&self, value: &str) -> Result<Session> {
        let sealed = Base64UrlUnpadded::decode_vec(value)
            .map_err(|e| anyhow::anyhow!("cookie is not valid base64: {e}"))?;
        if sealed.len() < 12 {
            return Err(anyhow::anyhow!("cookie value too short"));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(12);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher = ChaCha20Poly1305::new(&self.key);
        let plaintext = cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad: self.aad.as_bytes(),
                },
            )
            .map_err(|e| anyhow::anyhow!("cookie verification failure: {e}"))?;

        Ok(serde_json::from_slice(&plaintext)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::StoredToken;

    fn codec() -> SessionCodec {
        SessionCodec::new("client-id", "client-secret", "fw")
    }

    fn full_session() -> Session {
        Session {
            state: Some("8674665223082153551".to_string()),
            redirect: Some("/dashboard".to_string()),
            email: Some("alice@example.com".to_string()),
            expire: Some(1_900_000_000),
            token: Some(StoredToken {
                access_token: "ya29.a0".to_string(),
                token_type: "Bearer".to_string(),
                refresh_token: None,
                expiry: Some(1_900_000_000),
            }),
        }
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        for session in [Session::default(), full_session()] {
            let encoded = codec.encode(&session).unwrap();
            let decoded = codec.decode(&encoded).unwrap();
            assert_eq!(decoded, session);
        }
    }

    #[test]
    fn test_cookie_value_is_url_safe() {
        let encoded = codec().encode(&full_session()).unwrap();
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "cookie value must be URL-safe: {encoded}"
        );
    }

    #[test]
    fn test_encodings_are_nondeterministic() {
        // Fresh nonce per encode; identical sessions must not produce
        // identical cookie values.
        let codec = codec();
        let session = full_session();
        assert_ne!(
            codec.encode(&session).unwrap(),
            codec.encode(&session).unwrap()
        );
    }

    #[test]
    fn test_decode_fails_with_different_secret() {
        let encoded = codec().encode(&full_session()).unwrap();
        let other = SessionCodec::new("client-id", "other-secret", "fw");
        assert!(other.decode(&encoded).is_err());
    }

    #[test]
    fn test_decode_fails_on_tampered_value() {
        let codec = codec();
        let mut encoded = codec.encode(&full_session()).unwrap();
        let flipped = if encoded.ends_with('A') { 'B' } else { 'A' };
        encoded.pop();
        encoded.push(flipped);
        assert!(codec.decode(&encoded).is_err());
    }

    #[test]
    fn test_decode_fails_on_garbage() {
        let codec = codec();
        assert!(codec.decode("").is_err());
        assert!(codec.decode("not base64!").is_err());
        assert!(codec.decode("AAAA").is_err());
    }
}
