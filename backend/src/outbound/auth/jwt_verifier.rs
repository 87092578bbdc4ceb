//! HS256 token verifier.
//!
//! Tokens are signed with a shared secret and must name the configured
//! audience. `exp` is enforced when present. The `sub` claim is the username.

use std::collections::HashSet;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::config::JwtSettings;
use crate::domain::ports::{TokenVerifier, TokenVerifierError};
use crate::domain::{BearerCredential, Username};

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
}

/// Verifies tokens issued by the authentication service.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.required_spec_claims = HashSet::from(["aud".to_owned()]);
        Self {
            key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
        }
    }

    fn username_from(&self, token: &str) -> Result<Username, TokenVerifierError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|err| TokenVerifierError::invalid(err.to_string()))?;
        data.claims
            .sub
            .as_deref()
            .and_then(|sub| Username::new(sub).ok())
            .ok_or_else(TokenVerifierError::missing_subject)
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, credential: &BearerCredential) -> Result<Username, TokenVerifierError> {
        self.username_from(credential.expose())
    }
}
