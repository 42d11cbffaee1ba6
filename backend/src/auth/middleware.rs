//! Middleware for protecting authenticated routes and handling authorization.
//!
//! This module contains the [`CurrentSession`] extractor, which finds the
//! session token on a request and validates it. The token is read from
//! `Authorization: Bearer` first, then from the session cookie. It never
//! rejects a request: a missing or invalid token just means "no session",
//! and the gate in `auth::gate` decides what that allows.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tracing::debug;

use super::models::Session;
use crate::state::AppState;

pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let Some(token) = token_from_headers(&parts.headers, &state.config.cookie_name) else {
            return Ok(Self(None));
        };
        match state.auth.project(token) {
            Ok(session) => Ok(Self(Some(session))),
            Err(err) => {
                debug!(error = %err, "treating request as anonymous");
                Ok(Self(None))
            }
        }
    }
}

/// Finds the session token in a bearer header or the named cookie.
pub fn token_from_headers<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_static("Bearer abc.def.ghi");
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(COOKIE, HeaderValue::from_static("sid=zzz"));
        assert_eq!(token_from_headers(&headers, "sid"), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        let cookies = HeaderValue::from_static("lang=en; sid=tok.en.sig; other=1");
        headers.append(COOKIE, cookies);
        assert_eq!(token_from_headers(&headers, "sid"), Some("tok.en.sig"));
    }

    #[test]
    fn absent_or_empty_tokens_yield_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers, "sid"), None);

        let basic = HeaderValue::from_static("Basic dXNlcjpwYXNz");
        headers.insert(AUTHORIZATION, basic);
        headers.insert(COOKIE, HeaderValue::from_static("sid=; sidx=nope"));
        assert_eq!(token_from_headers(&headers, "sid"), None);
    }
}
