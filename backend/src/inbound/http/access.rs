//! Caller identity and role gate.
//!
//! An authenticating proxy in front of the service sets `x-user-id`. The
//! [`Actor`] extractor resolves that id to an account; handlers then call
//! [`Actor::require`] for role-restricted endpoints.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::ports::AccountRepositoryError;
use crate::domain::{Account, Error, Role, UserId};
use crate::inbound::http::state::HttpState;

/// Header carrying the authenticated account id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Actor(Account);

impl Actor {
    /// The caller's identifier.
    pub const fn id(&self) -> UserId {
        self.0.id
    }

    /// The caller's stored account.
    pub const fn account(&self) -> &Account {
        &self.0
    }

    /// Refuse unless the caller holds exactly `role`.
    pub fn require(&self, role: Role) -> Result<&Self, Error> {
        if self.0.role == role {
            Ok(self)
        } else {
            debug!(user_id = %self.0.id, held = self.0.role.as_str(), required = role.as_str(), "role check failed");
            Err(Error::forbidden("Access denied."))
        }
    }
}

fn header_user_id(req: &HttpRequest) -> Result<UserId, Error> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| Error::unauthorized("Authentication required."))?;
    raw.to_str()
        .ok()
        .and_then(|value| UserId::new(value).ok())
        .ok_or_else(|| Error::unauthorized("Authentication required."))
}

fn map_lookup_error(error: &AccountRepositoryError) -> Error {
    warn!(kind = error.kind(), error = %error, "account lookup failed");
    match error {
        AccountRepositoryError::Connection { .. } => {
            Error::service_unavailable("account store unavailable")
        }
        _ => Error::internal(error.to_string()),
    }
}

impl FromRequest for Actor {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = header_user_id(req);
        let accounts = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| state.accounts.clone());
        Box::pin(async move {
            let user_id = user_id?;
            let accounts =
                accounts.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let account = accounts
                .find_by_id(&user_id)
                .await
                .map_err(|err| map_lookup_error(&err))?
                .ok_or_else(|| Error::unauthorized("Authentication required."))?;
            Ok(Self(account))
        })
    }
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
