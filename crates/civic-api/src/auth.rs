use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::error;
use validator::Validate;

use civic_store::{ComplaintStore, StoreError, UserDirectory};
use civic_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest};
use civic_types::models::User;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub complaints: ComplaintStore,
    pub users: UserDirectory,
    pub jwt_secret: String,
}

/// Run a blocking store call off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let st = state.clone();
    let user = blocking(move || {
        st.users.register(req.name.trim(), req.email.trim(), &req.password)
    })
    .await?;

    let token = issue_token(&state.jwt_secret, &user)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let st = state.clone();
    let user = blocking(move || st.users.login(req.email.trim(), &req.password)).await?;

    let token = issue_token(&state.jwt_secret, &user)?;

    Ok(Json(AuthResponse { user, token }))
}

pub(crate) fn issue_token(secret: &str, user: &User) -> ApiResult<String> {
    create_token(secret, user).map_err(|e| {
        error!("Failed to sign token for {}: {}", user.id, e);
        ApiError::Internal
    })
}

pub fn create_token(secret: &str, user: &User) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        department: user.department.clone(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
