//! Bearer token verification.

mod jwt_verifier;

pub use jwt_verifier::JwtTokenVerifier;
