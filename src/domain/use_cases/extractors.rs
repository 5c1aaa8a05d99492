use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{entities::user::User, errors::AuthError, AppState};

/// Extractor for the signed-in user.
/// Returns 401 when no session is active.
/// Usage: Add `user: CurrentUser` as a parameter to your handler function.
#[derive(Debug)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(session_user(req).map(CurrentUser).map_err(Into::into))
    }
}

/// Extractor for a signed-in manager.
/// Returns 403 for employees and 401 without a session.
#[derive(Debug)]
pub struct ManagerUser(pub User);

impl FromRequest for ManagerUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match session_user(req) {
            Ok(user) if user.is_manager() => Ok(ManagerUser(user)),
            Ok(user) => {
                tracing::warn!(user_id = %user.id, path = req.path(), "Manager access required");
                Err(AuthError::Forbidden("Manager role required".into()))
            }
            Err(e) => Err(e),
        };
        ready(result.map_err(Into::into))
    }
}

fn session_user(req: &HttpRequest) -> Result<User, AuthError> {
    req.app_data::<web::Data<AppState>>()
        .and_then(|state| state.session.current_user())
        .ok_or(AuthError::MissingSession)
}
