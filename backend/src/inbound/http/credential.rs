//! Cookie credential extraction.
//!
//! Handlers take a [`CallerCredential`] argument; extraction fails with
//! `401 Unauthorized` when the `jwt-token` cookie is missing or blank, so the
//! domain never sees an absent credential.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{BearerCredential, Error};

/// Cookie carrying the bearer token issued by the auth service.
pub const CREDENTIAL_COOKIE: &str = "jwt-token";

/// Bearer credential lifted from the request cookie.
#[derive(Debug, Clone)]
pub struct CallerCredential(BearerCredential);

impl CallerCredential {
    pub fn into_inner(self) -> BearerCredential {
        self.0
    }

    pub fn as_credential(&self) -> &BearerCredential {
        &self.0
    }
}

impl FromRequest for CallerCredential {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req
            .cookie(CREDENTIAL_COOKIE)
            .ok_or_else(|| Error::unauthorized("missing jwt-token cookie"))
            .and_then(|cookie| {
                BearerCredential::new(cookie.value())
                    .map_err(|err| Error::unauthorized(err.to_string()))
            })
            .map(CallerCredential);
        ready(result)
    }
}
