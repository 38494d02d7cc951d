use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Deserialize;

/// Why an identity token was rejected.
///
/// Each case is distinct so the callback can surface a precise reason; only
/// `NotVerified` and `MissingEmail` reflect a well-formed token.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity token payload is not decodable")]
    Decode,
    #[error("identity token payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing email")]
    MissingEmail,
    #[error("email {0} not listed as verified")]
    NotVerified(String),
}

#[derive(Debug, Deserialize)]
struct IdentityClaims {
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: bool,
}

/// Extract the verified email address from a compact identity token.
///
/// The token is the provider's `header.payload.signature` form; only the
/// payload is consulted. Signature verification is deliberately out of scope:
/// the token arrives directly from the provider over the token-exchange
/// channel, never from the client.
///
/// # Errors
/// Returns an [`IdentityError`] if the payload cannot be decoded or parsed,
/// carries no email, or the email is not flagged as verified.
pub fn email_from_id_token(id_token: &str) -> Result<String, IdentityError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or(IdentityError::Decode)?
        .trim_end_matches('=');

    let bytes = Base64UrlUnpadded::decode_vec(payload).map_err(|_| IdentityError::Decode)?;
    let claims: IdentityClaims = serde_json::from_slice(&bytes)?;

    if claims.email.is_empty() {
        return Err(IdentityError::MissingEmail);
    }
    if !claims.email_verified {
        return Err(IdentityError::NotVerified(claims.email));
    }

    Ok(claims.email)
}
