use axum::{Extension, Json, extract::State, response::IntoResponse};
use validator::Validate;

use civic_types::api::{AuthResponse, Claims, UserUpdate};

use crate::auth::{AppState, blocking, issue_token};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users
        .get(&claims.sub)?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {}", claims.sub)))?;

    Ok(Json(user))
}

/// PATCH /me: returns the updated user with a fresh token, since the old
/// one still carries the previous name and email.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(changes): ApiJson<UserUpdate>,
) -> ApiResult<impl IntoResponse> {
    changes.validate()?;

    let st = state.clone();
    let user = blocking(move || st.users.update_user(&claims.sub, changes)).await?;
    let token = issue_token(&state.jwt_secret, &user)?;

    Ok(Json(AuthResponse { user, token }))
}
