//! Personal access tokens: `"{id}|{secret}"` handed out, SHA-256 of the secret stored.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SECRET_BYTES: usize = 20;

/// Name recorded on every token issued by register/login.
pub const TOKEN_NAME: &str = "API Token";

/// 40 lowercase hex characters.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

pub fn plain_text(id: i64, secret: &str) -> String {
    format!("{}|{}", id, secret)
}

/// A presented bearer token split into its lookup parts.
#[derive(Debug, PartialEq, Eq)]
pub enum PresentedToken<'a> {
    /// `"{id}|{secret}"`
    WithId { id: i64, secret: &'a str },
    /// Bare secret, looked up by digest.
    Bare(&'a str),
}

/// `None` when an id prefix is present but not numeric.
pub fn parse(token: &str) -> Option<PresentedToken<'_>> {
    match token.split_once('|') {
        Some((id, secret)) => id
            .parse()
            .ok()
            .map(|id| PresentedToken::WithId { id, secret }),
        None => Some(PresentedToken::Bare(token)),
    }
}

/// Constant-time comparison of a secret against a stored digest.
pub fn matches(stored_digest: &str, secret: &str) -> bool {
    let presented = digest(secret);
    presented.as_bytes().ct_eq(stored_digest.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_forty_hex_chars_and_random() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn parse_splits_on_first_pipe() {
        assert_eq!(
            parse("12|abc|def"),
            Some(PresentedToken::WithId { id: 12, secret: "abc|def" })
        );
        assert_eq!(parse("abc"), Some(PresentedToken::Bare("abc")));
        assert_eq!(parse("x|abc"), None);
    }

    #[test]
    fn matches_compares_digest() {
        let secret = generate_secret();
        let stored = digest(&secret);
        assert_eq!(stored.len(), 64);
        assert!(matches(&stored, &secret));
        assert!(!matches(&stored, "other"));
    }

    #[test]
    fn plain_text_joins_id_and_secret() {
        assert_eq!(plain_text(5, "abc"), "5|abc");
    }
}
