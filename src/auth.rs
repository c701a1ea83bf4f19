use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CUSTOMER: &str = "customer";

/// Signing configuration shared with every worker via `app_data`.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// Claims carried by the HS256 session token issued at login.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID) as the subject.
    pub sub: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub exp: i64,
}

/// Caller identity resolved from a bearer token. Extractable in any handler;
/// extraction fails with `Unauthorized` when the token is missing or invalid.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Privileged endpoints call this after extraction: a valid token with the
    /// wrong role is `Forbidden`, not `Unauthorized`.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Sign a session token for the given identity. The auth service owns login;
/// this lives here so integration tests can mint tokens against the same
/// claims layout the gate verifies.
pub fn issue_token(
    user_id: Uuid,
    email: &str,
    username: &str,
    role: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        username: username.to_string(),
        role: role.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: Option<&str>) -> Result<&str, AppError> {
    header_value
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}

/// Verify the token signature and expiry and resolve the caller identity.
pub fn user_from_token(token: &str, secret: &str) -> Result<AuthenticatedUser, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::Unauthorized)?;

    Ok(AuthenticatedUser {
        user_id,
        email: data.claims.email,
        username: data.claims.username,
        role: data.claims.role,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = (|| {
            let config = req
                .app_data::<web::Data<JwtConfig>>()
                .ok_or_else(|| AppError::Internal("JWT configuration not registered".to_string()))?;
            let header_value = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());
            let token = bearer_token(header_value)?;
            user_from_token(token, &config.secret)
        })();
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn sample_token(role: &str) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = issue_token(
            user_id,
            "reader@example.com",
            "reader",
            role,
            SECRET,
            Duration::hours(1),
        )
        .unwrap();
        (user_id, token)
    }

    #[test]
    fn token_round_trip_resolves_identity() {
        let (user_id, token) = sample_token(ROLE_CUSTOMER);
        let user = user_from_token(&token, SECRET).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "reader@example.com");
        assert_eq!(user.username, "reader");
        assert!(!user.is_admin());
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let (_, token) = sample_token(ROLE_CUSTOMER);
        let err = user_from_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let token = issue_token(
            Uuid::new_v4(),
            "reader@example.com",
            "reader",
            ROLE_CUSTOMER,
            SECRET,
            Duration::hours(-2),
        )
        .unwrap();
        let err = user_from_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert!(matches!(bearer_token(None), Err(AppError::Unauthorized)));
    }

    #[test]
    fn non_bearer_header_is_unauthorized() {
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwYXNz")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn bearer_header_yields_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn admin_role_passes_require_admin() {
        let (_, token) = sample_token(ROLE_ADMIN);
        let user = user_from_token(&token, SECRET).unwrap();
        assert!(user.require_admin().is_ok());
    }

    #[test]
    fn customer_role_is_forbidden_for_admin_endpoints() {
        let (_, token) = sample_token(ROLE_CUSTOMER);
        let user = user_from_token(&token, SECRET).unwrap();
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden)));
    }
}
