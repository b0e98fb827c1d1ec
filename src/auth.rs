use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    directory::UserDirectoryState,
    models::SessionProfile,
};

/// Header accepted as a stand-in for a token while running in `Env::Local`.
pub const LOCAL_BYPASS_HEADER: &str = "x-user-id";

/// Claims
///
/// Payload expected inside a session JWT. Tokens are minted by the identity provider
/// and signed with the shared secret in `AppConfig::jwt_secret`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id in the directory.
    pub sub: Uuid,
    /// Expiration time (seconds since the epoch). Always validated.
    pub exp: usize,
    /// Issued at.
    pub iat: usize,
}

/// Session
///
/// The authenticated projection of a request. Its presence is the shell's
/// "is authenticated" predicate; the layout reads `email` for the sidebar footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

impl From<Session> for SessionProfile {
    fn from(session: Session) -> Self {
        SessionProfile {
            id: session.user_id,
            email: session.email,
            role: session.role,
        }
    }
}

/// Reasons a presented token was not accepted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("session token has expired")]
    Expired,
    #[error("session token is invalid")]
    Invalid,
    #[error("session subject is not a known user")]
    UnknownUser,
}

/// validate_token
///
/// Decodes `token` with the configured secret (expiry always enforced) and confirms
/// the subject against the user directory.
pub async fn validate_token(
    token: &str,
    config: &AppConfig,
    users: &UserDirectoryState,
) -> Result<Session, TokenError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    })?;

    let user = users
        .get_user(token_data.claims.sub)
        .await
        .ok_or(TokenError::UnknownUser)?;

    Ok(Session {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

/// resolve_session
///
/// The auth context's single decision point. Sources are tried in order:
/// 1. a session already resolved earlier in this request (stored by the gate);
/// 2. the `x-user-id` bypass header, in `Env::Local` only;
/// 3. an `Authorization: Bearer` token;
/// 4. the session cookie.
///
/// Any failure yields `None`; the caller decides between redirect and 401.
pub async fn resolve_session(
    parts: &Parts,
    config: &AppConfig,
    users: &UserDirectoryState,
) -> Option<Session> {
    if let Some(session) = parts.extensions.get::<Session>() {
        return Some(session.clone());
    }

    if config.env == Env::Local {
        let bypass_id = parts
            .headers
            .get(LOCAL_BYPASS_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok());

        if let Some(user_id) = bypass_id {
            if let Some(user) = users.get_user(user_id).await {
                tracing::debug!(%user_id, "session resolved through local bypass header");
                return Some(Session {
                    user_id: user.id,
                    email: user.email,
                    role: user.role,
                });
            }
        }
    }

    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned);

    let token = match bearer {
        Some(token) => token,
        None => CookieJar::from_headers(&parts.headers)
            .get(&config.session_cookie)
            .map(|cookie| cookie.value().to_owned())?,
    };

    match validate_token(&token, config, users).await {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::debug!(reason = %e, "rejecting session token");
            None
        }
    }
}

/// MaybeSession Extractor
///
/// Never rejects: carries `Some(session)` for authenticated requests and `None`
/// otherwise. Used by the gate and by pages that render for everyone.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
    UserDirectoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let users = UserDirectoryState::from_ref(state);
        let config = AppConfig::from_ref(state);
        Ok(MaybeSession(resolve_session(parts, &config, &users).await))
    }
}

/// Session Extractor
///
/// For JSON endpoints: rejects unauthenticated requests with 401 instead of redirecting.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    UserDirectoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeSession(session) = match MaybeSession::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };
        session.ok_or(StatusCode::UNAUTHORIZED)
    }
}
