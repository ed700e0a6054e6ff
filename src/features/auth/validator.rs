use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::time::Duration;
use uuid::Uuid;

use super::model::Claims;
use crate::core::error::AppError;

/// Verifies HS256 access tokens issued by the registration service
pub struct JwtValidator {
    decoding_key: DecodingKey,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway: leeway.as_secs(),
        }
    }

    /// Validate a token and return the user id it was issued for
    pub fn validate_token(&self, token: &str) -> Result<Uuid, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| AppError::Auth("Invalid subject in token".to_string()))
    }
}
