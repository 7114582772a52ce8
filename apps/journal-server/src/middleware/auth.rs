//! Identity and route authorization extractors.
//!
//! The identity token travels in the `auth_tkt` cookie set at login; a
//! `Bearer` token in the `Authorization` header is accepted as well.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::{Method, header};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};

use journal_core::permissions::{self, Action, Denied, Route};
use journal_core::ports::{AuthError, TokenClaims, TokenService};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Name of the identity cookie.
pub const AUTH_COOKIE: &str = "auth_tkt";

/// The logged-in user, as asserted by a valid identity token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn identify(req: &HttpRequest, tokens: &dyn TokenService) -> Result<Identity, AuthError> {
    let token = req
        .cookie(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| bearer_token(req))
        .ok_or(AuthError::MissingAuth)?;

    tokens.validate_token(&token).map(Identity::from)
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("Server configuration error".to_string())
    })
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match app_state(req) {
            Ok(state) => state,
            Err(e) => return ready(Err(e)),
        };

        let identity = match identify(req, state.tokens.as_ref()) {
            Ok(identity) => Some(identity),
            Err(AuthError::MissingAuth) => None,
            Err(e) => {
                tracing::info!("Ignoring identity token: {}", e);
                None
            }
        };

        ready(Ok(OptionalIdentity(identity)))
    }
}

/// Proof that the caller may reach the matched route.
///
/// The route is looked up by its resource name and the action by the HTTP
/// method, then checked against the ACL before the handler body runs.
/// Anonymous callers get 403 on permission-gated routes and 401 on routes
/// that only need a login.
#[derive(Debug)]
pub struct Authorized {
    identity: Option<Identity>,
}

impl Authorized {
    pub fn require_identity(&self) -> Result<&Identity, AppError> {
        self.identity.as_ref().ok_or(AppError::Unauthorized)
    }
}

fn action(method: &Method) -> Action {
    if method == Method::GET || method == Method::HEAD {
        Action::View
    } else {
        Action::Submit
    }
}

impl FromRequest for Authorized {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let Some(route) = req.match_name().and_then(Route::from_name) else {
            tracing::error!(path = req.path(), "No permission entry for route");
            return ready(Err(AppError::Internal(
                "Server configuration error".to_string(),
            )));
        };

        let identity = match OptionalIdentity::from_request(req, payload).into_inner() {
            Ok(OptionalIdentity(identity)) => identity,
            Err(e) => return ready(Err(e)),
        };

        let requirement = permissions::requirement(route, action(req.method()));
        let result = match permissions::check(requirement, identity.is_some()) {
            Ok(()) => Ok(Authorized { identity }),
            Err(Denied::NotAuthenticated) => {
                tracing::info!(route = route.name(), "Login required");
                Err(AppError::Unauthorized)
            }
            Err(Denied::Forbidden(permission)) => {
                tracing::info!(route = route.name(), ?permission, "Permission denied");
                Err(AppError::Forbidden)
            }
        };

        ready(result)
    }
}

/// Cookie carrying a freshly issued identity token.
pub fn remember(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Cookie that clears the identity.
pub fn forget() -> Cookie<'static> {
    let mut cookie = Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}
