use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use validator::Validate;

use crate::dto::auth_dto::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenResponse,
    UserResponse,
};
use crate::middleware::auth::Claims;
use crate::models::user::User;
use crate::services::user_service::UserService;
use crate::AppState;

fn issue_jwt(user: &User) -> crate::error::Result<String> {
    let config = crate::config::get_config();
    let claims = Claims {
        sub: user.id.to_string(),
        exp: (Utc::now() + Duration::hours(config.jwt_ttl_hours)).timestamp() as usize,
        email: user.email.clone(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| crate::error::Error::Internal(format!("Failed to sign token: {}", e)))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let svc = UserService::new(state.pool.clone());
    let user = svc.register(&req.email, &req.name, &req.password).await?;
    let token = issue_jwt(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            user: user.into(),
        }),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let svc = UserService::new(state.pool.clone());
    let user = svc.authenticate(&req.email, &req.password).await?;
    let token = issue_jwt(&user)?;
    Ok(Json(TokenResponse {
        token,
        user: user.into(),
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = UserService::new(state.pool.clone());
    let user = svc.get_user(user_id).await?;
    Ok(Json(UserResponse::from(user)).into_response())
}

#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let svc = UserService::new(state.pool.clone());

    // Always 202: a failed lookup must look the same as a sent email.
    if let Some((user, token)) = svc.create_reset_token(&req.email).await? {
        let config = crate::config::get_config();
        let reset_link = format!("{}/reset-password?token={}", config.webapp_url, token);
        if let Err(e) = state
            .email_service
            .send_password_reset(&user.email, &reset_link)
            .await
        {
            tracing::error!(error = ?e, "Failed to deliver password reset email");
        }
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "message": "If that account exists, a reset email is on its way"
        })),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let svc = UserService::new(state.pool.clone());
    svc.reset_password(&req.token, &req.new_password).await?;
    Ok(Json(json!({ "message": "Password updated" })).into_response())
}
