//! Codes de vérification à usage unique.
//!
//! Le code (quelques bytes aléatoires en hex) et son expiration absolue sont signés
//! ensemble en HS256 ; le token obtenu est stocké dans `usuario.token`.
//! La colonne est remise à NULL une fois le code consommé.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use super::password::constant_time_eq;

const CODE_BYTES: usize = 3;
pub const CODE_TTL_HOURS: i64 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct VerificationClaims {
    code: String,
    /// Expiration en millisecondes depuis epoch
    expires_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    Valid,
    Invalid,
    Expired,
}

/// Code court en hex (6 caractères)
pub fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Signe le code avec son expiration (now + 1h)
pub fn issue_token(code: &str, now: DateTime<Utc>, secret: &str) -> Result<String, String> {
    let claims = VerificationClaims {
        code: code.to_string(),
        expires_at: (now + Duration::hours(CODE_TTL_HOURS)).timestamp_millis(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| format!("Failed to sign verification code: {}", e))
}

/// Ordre des contrôles: token absent / signature / code / expiration.
/// Expiré seulement si `now` est strictement après l'expiration.
pub fn check_code(
    stored_token: Option<&str>,
    submitted_code: &str,
    now: DateTime<Utc>,
    secret: &str,
) -> CodeCheck {
    let Some(token) = stored_token.filter(|t| !t.is_empty()) else {
        return CodeCheck::Invalid;
    };

    // L'expiration est portée par `expires_at`, pas par `exp`
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let claims = match decode::<VerificationClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    ) {
        Ok(data) => data.claims,
        Err(_) => return CodeCheck::Invalid,
    };

    if !constant_time_eq(claims.code.as_bytes(), submitted_code.trim().as_bytes()) {
        return CodeCheck::Invalid;
    }

    if now.timestamp_millis() > claims.expires_at {
        return CodeCheck::Expired;
    }

    CodeCheck::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_code_format() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_BYTES * 2);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_issue_then_check() {
        let now = Utc::now();
        let token = issue_token("a1b2c3", now, SECRET).unwrap();

        assert_eq!(check_code(Some(&token), "a1b2c3", now, SECRET), CodeCheck::Valid);
        assert_eq!(check_code(Some(&token), "ffffff", now, SECRET), CodeCheck::Invalid);
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let token = issue_token("a1b2c3", now, SECRET).unwrap();
        let expiry = now + Duration::hours(CODE_TTL_HOURS);

        let just_before = expiry - Duration::milliseconds(1);
        let just_after = expiry + Duration::milliseconds(1);

        assert_eq!(check_code(Some(&token), "a1b2c3", just_before, SECRET), CodeCheck::Valid);
        assert_eq!(check_code(Some(&token), "a1b2c3", just_after, SECRET), CodeCheck::Expired);
    }

    #[test]
    fn test_wrong_code_after_expiry_is_invalid() {
        let now = Utc::now();
        let token = issue_token("a1b2c3", now, SECRET).unwrap();
        let later = now + Duration::hours(3);

        assert_eq!(check_code(Some(&token), "000000", later, SECRET), CodeCheck::Invalid);
    }

    #[test]
    fn test_bad_signature() {
        let now = Utc::now();
        let token = issue_token("a1b2c3", now, "another-secret").unwrap();
        assert_eq!(check_code(Some(&token), "a1b2c3", now, SECRET), CodeCheck::Invalid);
        assert_eq!(check_code(Some("garbage"), "a1b2c3", now, SECRET), CodeCheck::Invalid);
    }

    #[test]
    fn test_no_pending_code() {
        assert_eq!(check_code(None, "a1b2c3", Utc::now(), SECRET), CodeCheck::Invalid);
        assert_eq!(check_code(Some(""), "a1b2c3", Utc::now(), SECRET), CodeCheck::Invalid);
    }
}
