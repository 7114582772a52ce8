//! CSRF protection for the create-post, login and register forms.
//!
//! Double-submit: rendering a form hands out a token in the `csrf_token`
//! cookie and in the view model; the submitted form must carry the same
//! value back.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, HttpResponseBuilder, dev::Payload};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::future::{Ready, ready};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::middleware::error::AppError;

/// Name of the CSRF cookie and form field.
pub const CSRF_COOKIE: &str = "csrf_token";

/// The visitor's CSRF token.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    value: String,
    /// No cookie came with the request; the token was generated just now.
    fresh: bool,
}

impl CsrfToken {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Start a response, setting the cookie if the token is new.
    pub fn respond(&self, status: StatusCode, secure: bool) -> HttpResponseBuilder {
        let mut builder = HttpResponse::build(status);
        if self.fresh {
            builder.cookie(
                Cookie::build(CSRF_COOKIE, self.value.clone())
                    .path("/")
                    .http_only(true)
                    .secure(secure)
                    .same_site(SameSite::Strict)
                    .finish(),
            );
        }
        builder
    }

    /// Check a submitted token against the cookie.
    pub fn verify(&self, submitted: &str) -> Result<(), AppError> {
        let matches: bool = submitted.as_bytes().ct_eq(self.value.as_bytes()).into();
        if self.fresh || submitted.is_empty() || !matches {
            tracing::warn!("Rejected form submission with a bad CSRF token");
            return Err(AppError::BadRequest(
                "CSRF token missing or invalid".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromRequest for CsrfToken {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = match req.cookie(CSRF_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => CsrfToken {
                value: cookie.value().to_string(),
                fresh: false,
            },
            _ => {
                tracing::debug!("Generating new CSRF token");
                CsrfToken {
                    value: Uuid::new_v4().to_string(),
                    fresh: true,
                }
            }
        };
        ready(Ok(token))
    }
}

/// Form data wrapper that carries the CSRF token next to the fields.
#[derive(Debug, Deserialize, Serialize)]
pub struct CsrfProtectedForm<T> {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> CsrfProtectedForm<T> {
    /// The form fields, if the token matches.
    pub fn verify(self, csrf: &CsrfToken) -> Result<T, AppError> {
        csrf.verify(&self.csrf_token)?;
        Ok(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn extract(req: &HttpRequest) -> CsrfToken {
        CsrfToken::from_request(req, &mut Payload::None)
            .into_inner()
            .unwrap()
    }

    #[test]
    fn test_token_from_cookie_verifies_matching_submission() {
        let req = TestRequest::default()
            .cookie(Cookie::new(CSRF_COOKIE, "abc"))
            .to_http_request();
        let token = extract(&req);

        assert_eq!(token.value(), "abc");
        assert!(token.verify("abc").is_ok());
        assert!(token.verify("abd").is_err());
        assert!(token.verify("").is_err());
    }

    #[test]
    fn test_token_rejects_prefix_and_extension() {
        let req = TestRequest::default()
            .cookie(Cookie::new(CSRF_COOKIE, "abcdef"))
            .to_http_request();
        let token = extract(&req);

        assert!(token.verify("abc").is_err());
        assert!(token.verify("abcdefg").is_err());
        assert!(token.verify("abcdef").is_ok());
    }

    #[test]
    fn test_fresh_token_rejects_any_submission() {
        let req = TestRequest::default().to_http_request();
        let token = extract(&req);

        assert!(token.fresh);
        let value = token.value().to_string();
        assert!(token.verify(&value).is_err());
    }

    #[test]
    fn test_fresh_token_sets_cookie() {
        let req = TestRequest::default().to_http_request();
        let token = extract(&req);

        let response = token.respond(StatusCode::OK, false).finish();
        let cookie = response
            .cookies()
            .find(|c| c.name() == CSRF_COOKIE)
            .unwrap();
        assert_eq!(cookie.value(), token.value());
    }
}
