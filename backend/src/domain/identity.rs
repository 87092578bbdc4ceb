//! Caller identity: the bearer credential, the principal it names, and the
//! verifier that resolves one into the other.
//!
//! Verification is two steps. The token must carry a valid signature and a
//! `sub` claim, and the subject must exist in the user registry. Both failures
//! surface as [`ErrorCode::Unauthorized`](super::ErrorCode::Unauthorized).

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::Error;
use super::ports::{TokenVerifier, TokenVerifierError, UserRegistry, UserRegistryError};

/// Validation errors for identity primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    #[error("bearer credential must not be empty")]
    EmptyCredential,
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Opaque bearer token carried by the caller.
///
/// The raw token is forwarded verbatim to the balance service, so it is kept
/// as-is (no trimming) and wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential(Zeroizing<String>);

impl BearerCredential {
    pub fn new(token: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(IdentityValidationError::EmptyCredential);
        }
        Ok(Self(token))
    }

    /// Raw token text.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerCredential(<redacted>)")
    }
}

/// Registry username, taken verbatim from the token subject.
///
/// Registry lookups are exact, so surrounding whitespace is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let value = value.as_ref();
        if value.trim().is_empty() {
            return Err(IdentityValidationError::EmptyUsername);
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: i32,
    username: Username,
}

impl Principal {
    pub fn new(id: i32, username: Username) -> Self {
        Self { id, username }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Resolves a bearer credential to a registered principal.
#[derive(Clone)]
pub struct IdentityVerifier {
    tokens: Arc<dyn TokenVerifier>,
    registry: Arc<dyn UserRegistry>,
}

impl IdentityVerifier {
    pub fn new(tokens: Arc<dyn TokenVerifier>, registry: Arc<dyn UserRegistry>) -> Self {
        Self { tokens, registry }
    }

    /// Verify the credential and load the principal it names.
    pub async fn verify(&self, credential: &BearerCredential) -> Result<Principal, Error> {
        let username = self
            .tokens
            .verify(credential)
            .await
            .map_err(map_token_error)?;

        match self.registry.find_by_username(&username).await {
            Ok(Some(principal)) => {
                debug!(
                    user_id = principal.id(),
                    username = %principal.username(),
                    "credential verified"
                );
                Ok(principal)
            }
            Ok(None) => {
                warn!(%username, "token subject not registered");
                Err(Error::unauthorized("user not found"))
            }
            Err(error) => Err(map_registry_error(error)),
        }
    }
}

fn map_token_error(error: TokenVerifierError) -> Error {
    warn!(%error, "credential rejected");
    Error::unauthorized(format!("invalid token: {error}"))
}

pub(crate) fn map_registry_error(error: UserRegistryError) -> Error {
    match error {
        UserRegistryError::Connection { message } => {
            Error::service_unavailable(format!("user registry unavailable: {message}"))
        }
        UserRegistryError::Query { message } => {
            Error::internal(format!("user registry query failed: {message}"))
        }
    }
}
