use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

use crate::models::users::Rol;

/// Durée de validité d'un token de session
pub const SESSION_TTL_HOURS: i64 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub rol: Rol,
    pub estado: bool,
    pub exp: i64,        // expiration timestamp
}

/// Génère un JWT de session pour un utilisateur (valide 1 heure)
pub fn generate_token(
    user_id: i32,
    rol: Rol,
    estado: bool,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<String, String> {
    let expiration = now
        .checked_add_signed(Duration::hours(SESSION_TTL_HOURS))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        rol,
        estado,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT de session (signature + expiration)
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}
