use crate::{
    api::extract::ApiJson,
    auth::jwt::{AuthService, TokenSubject},
    db::{NewUser, User},
    types::{AppError, AuthResponse, ErrorResponse, LoginRequest, RegisterRequest, Result},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

/// Same message for unknown users and wrong passwords.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input or username/email taken", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;

    let digest = state.auth_service.hash_password(&payload.password)?;

    let user = state
        .store
        .create_user(NewUser {
            username: payload.username.trim(),
            email: payload.email.trim(),
            first_name: non_blank(payload.first_name.as_deref()),
            last_name: non_blank(payload.last_name.as_deref()),
            password_hash: &digest.hash,
            password_salt: &digest.salt,
        })
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    let response = auth_response(&state.auth_service, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username (or email) and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    let user = state
        .store
        .find_user_for_login(payload.username.trim())
        .await?;

    // Hash even when the user is unknown so both failures cost the same
    let verified = state.auth_service.verify_password(
        &payload.password,
        user.as_ref()
            .map(|u| (u.password_salt.as_slice(), u.password_hash.as_slice())),
    )?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::warn!(login = %payload.username.trim(), "login failed");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }
    };

    state
        .store
        .record_login(&user.id, Utc::now())
        .await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(auth_response(&state.auth_service, &user)?))
}

fn auth_response(auth: &AuthService, user: &User) -> Result<AuthResponse> {
    let issued = auth.issue_token(TokenSubject {
        user_id: &user.id,
        username: &user.username,
        email: &user.email,
    })?;

    Ok(AuthResponse {
        token: issued.token,
        id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        expiration: issued.expires_at,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
