//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: register, login, and token verification.
//!
//! Tokens are stateless HS256 JWTs carrying the account email, the admin
//! flag, and a 168-hour expiry. There is no server-side session record and
//! no revocation; validity is purely a function of signature and expiry.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use pdf_shala_core::domain::{NewUser, User};
use pdf_shala_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::AppState;

/// Token lifetime: 168 hours from issuance.
const TOKEN_TTL_HOURS: i64 = 168;

//=========================================================================================
// Token Claims
//=========================================================================================

/// Claims embedded in every token issued by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Standard JWT subject - set to the account email.
    pub sub: String,
    /// Whether this user has admin privileges. A promoted/demoted user must
    /// log in again for this field to update.
    pub is_admin: bool,
    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: usize,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: usize,
}

/// Signs a fresh token for the given user.
pub fn issue_token(secret: &str, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.email.clone(),
        is_admin: user.is_admin,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validates signature and expiry, returning the embedded claims.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub mobile_number: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            last_name: user.last_name,
            email: user.email,
            mobile_number: user.mobile_number,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new account and issue a token
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing required field"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "username, email and password are required".to_string(),
        ));
    }

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to hash password".to_string(),
            )
        })?
        .to_string();

    // 2. Create user in database
    let user = state
        .db
        .create_user(
            NewUser {
                username: req.username,
                last_name: req.last_name,
                email: req.email,
                mobile_number: req.mobile_number,
            },
            &password_hash,
        )
        .await
        .map_err(|e| {
            error!("Failed to create user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create user".to_string(),
            )
        })?;

    // 3. Issue the signed token
    let token = issue_token(&state.config.jwt_secret, &user).map_err(|e| {
        error!("Failed to sign token: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to sign token".to_string(),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "No account with that email"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Get user by email
    let creds = state.db.get_user_by_email(&req.email).await.map_err(|e| {
        match e {
            PortError::NotFound(_) => (StatusCode::NOT_FOUND, "User not found".to_string()),
            other => {
                error!("Failed to get user: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication error".to_string(),
                )
            }
        }
    })?;

    // 2. Verify password against the stored hash
    let parsed_hash = PasswordHash::new(&creds.password_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Authentication error".to_string(),
        )
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
    }

    // 3. Issue the signed token
    let token = issue_token(&state.config.jwt_secret, &creds.user).map_err(|e| {
        error!("Failed to sign token: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to sign token".to_string(),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            user: creds.user.into(),
            token,
        }),
    ))
}

/// POST /auth/verify - Validate a presented token and return the account
#[utoipa::path(
    post,
    path = "/auth/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Token valid", body = UserResponse),
        (status = 401, description = "Invalid or expired token"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Validate signature and expiry
    let claims = decode_token(&state.config.jwt_secret, &req.token)
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token".to_string()))?;

    // 2. Re-fetch the user; the token is only as good as the current record
    let creds = state.db.get_user_by_email(&claims.sub).await.map_err(|e| {
        match e {
            PortError::NotFound(_) => (StatusCode::NOT_FOUND, "User not found".to_string()),
            other => {
                error!("Failed to get user: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication error".to_string(),
                )
            }
        }
    })?;

    Ok((StatusCode::OK, Json(UserResponse::from(creds.user))))
}
