//! Port for bearer token verification.
use async_trait::async_trait;

use crate::domain::{BearerCredential, Username};

use super::define_port_error;

define_port_error! {
    /// Reasons a bearer token is not accepted.
    pub enum TokenVerifierError {
        /// Signature, expiry or audience check failed.
        Invalid { message: String } => "{message}",
        /// The token carries no usable subject.
        MissingSubject => "token has no subject",
    }
}

/// Verifies a bearer token and returns the subject it was issued to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, credential: &BearerCredential) -> Result<Username, TokenVerifierError>;
}
