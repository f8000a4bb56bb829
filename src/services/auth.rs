//! Token authentication and request user resolution.

use crate::{
    config::AuthConfig,
    models::{
        context::RequestCache,
        payload::RequestPayload,
        user::{AuthenticatedUser, RequestUser},
    },
};
use actix_web::{HttpMessage, HttpRequest, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;
use uuid::Uuid;

/// Payload field carrying a refresh token
pub const REFRESH_FIELD: &str = "refresh";

/// Kind of token, checked on decode so refresh tokens cannot act as access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims for access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub token_type: TokenType,
    pub user_id: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Errors raised while authenticating a request
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Authorization header must use Bearer token format")]
    InvalidHeader,

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Expected {expected:?} token, got {actual:?}")]
    WrongTokenType {
        expected: TokenType,
        actual: TokenType,
    },

    #[error("User {0} not found or inactive")]
    UserNotFound(String),
}

/// Issues and verifies HS256 tokens
#[derive(Clone)]
pub struct JwtAuthenticator {
    config: AuthConfig,
}

impl JwtAuthenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issue a signed token for a user
    pub fn issue_token(&self, user_id: &str, token_type: TokenType) -> Result<String, AuthError> {
        let secret = self.secret()?;
        let ttl = match token_type {
            TokenType::Access => self.config.access_token_ttl_seconds,
            TokenType::Refresh => self.config.refresh_token_ttl_seconds,
        };
        let now = Utc::now().timestamp();

        let claims = TokenClaims {
            token_type,
            user_id: user_id.to_string(),
            exp: now + ttl,
            iat: now,
            jti: Uuid::new_v4().simple().to_string(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?)
    }

    /// Verify signature and expiry and check the token kind
    pub fn decode_token(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AuthError> {
        let secret = self.secret()?;
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?
        .claims;

        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType {
                expected,
                actual: claims.token_type,
            });
        }

        Ok(claims)
    }

    fn secret(&self) -> Result<&str, AuthError> {
        if self.config.jwt_secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }
        Ok(&self.config.jwt_secret)
    }
}

/// Lookup of users referenced by token claims
pub trait UserStore: Send + Sync {
    fn get_user(&self, user_id: &str) -> Option<AuthenticatedUser>;
}

/// User store backed by a map, for fixtures and the demo server
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, AuthenticatedUser>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: AuthenticatedUser) -> Self {
        self.insert(user);
        self
    }

    pub fn insert(&mut self, user: AuthenticatedUser) {
        self.users.insert(user.id.clone(), user);
    }
}

impl UserStore for InMemoryUserStore {
    fn get_user(&self, user_id: &str) -> Option<AuthenticatedUser> {
        self.users.get(user_id).cloned()
    }
}

/// Resolves the user behind a request through a chain of strategies
#[derive(Clone)]
pub struct UserResolver {
    authenticator: JwtAuthenticator,
    store: Arc<dyn UserStore>,
}

impl UserResolver {
    pub fn new(authenticator: JwtAuthenticator, store: Arc<dyn UserStore>) -> Self {
        Self {
            authenticator,
            store,
        }
    }

    pub fn authenticator(&self) -> &JwtAuthenticator {
        &self.authenticator
    }

    /// Resolve the request user, falling back to [`RequestUser::Anonymous`]
    ///
    /// Tries, in order: a user already authenticated by upstream
    /// middleware, the bearer access token, then a refresh token in the
    /// request payload.
    pub fn resolve(&self, req: &HttpRequest, payload: Option<&RequestPayload>) -> RequestUser {
        if let Some(user) = authenticated_in_extensions(req) {
            return user.into();
        }

        match self.authenticate_header(req) {
            Ok(user) => return user.into(),
            Err(e) => debug!(error = %e, "Access token authentication failed"),
        }

        match self.authenticate_refresh(req, payload) {
            Ok(Some(user)) => user.into(),
            Ok(None) => RequestUser::Anonymous,
            Err(e) => {
                debug!(error = %e, "Refresh token authentication failed");
                RequestUser::Anonymous
            }
        }
    }

    fn authenticate_header(&self, req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
        let token = extract_bearer_token(req)?;
        let claims = self.authenticator.decode_token(&token, TokenType::Access)?;
        self.load_user(&claims)
    }

    fn authenticate_refresh(
        &self,
        req: &HttpRequest,
        payload: Option<&RequestPayload>,
    ) -> Result<Option<AuthenticatedUser>, AuthError> {
        let refresh = match payload {
            Some(payload) => payload.get_str(REFRESH_FIELD).map(str::to_string),
            None => req.extensions().get::<RequestCache>().and_then(|cache| {
                cache
                    .cached_payload()
                    .and_then(|p| p.get_str(REFRESH_FIELD))
                    .map(str::to_string)
            }),
        };

        let Some(token) = refresh.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let claims = self.authenticator.decode_token(&token, TokenType::Refresh)?;
        self.load_user(&claims).map(Some)
    }

    fn load_user(&self, claims: &TokenClaims) -> Result<AuthenticatedUser, AuthError> {
        self.store
            .get_user(&claims.user_id)
            .filter(|user| user.is_active)
            .ok_or_else(|| AuthError::UserNotFound(claims.user_id.clone()))
    }
}

/// Resolve the request user with the resolver registered as app data
///
/// Without a registered [`UserResolver`] only users authenticated by
/// upstream middleware are recognised.
pub fn get_request_user(req: &HttpRequest, payload: Option<&RequestPayload>) -> RequestUser {
    match req.app_data::<web::Data<UserResolver>>() {
        Some(resolver) => resolver.resolve(req, payload),
        None => authenticated_in_extensions(req)
            .map(RequestUser::from)
            .unwrap_or_default(),
    }
}

fn authenticated_in_extensions(req: &HttpRequest) -> Option<AuthenticatedUser> {
    req.extensions().get::<AuthenticatedUser>().cloned()
}

/// Extract the token from an `Authorization: Bearer` header
fn extract_bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::InvalidHeader),
    }
}
