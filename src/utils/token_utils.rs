use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::models::token_models::Claims;

pub fn generate_jwt(user_id: &str, secret: &[u8]) -> String {
    let expiration = Utc::now() + Duration::hours(720); // 30 days
    let claims = Claims {
        sub: user_id.to_owned(),
        exp: expiration.timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
}

pub fn verify_jwt(token: &str, secret: &[u8]) -> Option<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret), &Validation::default())
        .ok()
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_subject() {
        let secret = b"unit-test-secret";
        let token = generate_jwt("user-123", secret);
        let claims = verify_jwt(&token, secret).expect("token should verify");
        assert_eq!(claims.sub, "user-123");
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = generate_jwt("user-123", b"secret-a");
        assert!(verify_jwt(&token, b"secret-b").is_none());
    }

    #[test]
    fn rejects_garbage_token() {
        assert!(verify_jwt("not-a-jwt", b"secret").is_none());
    }
}
