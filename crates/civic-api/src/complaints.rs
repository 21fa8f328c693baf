use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::info;
use validator::Validate;

use civic_store::{ComplaintFilter, catalog};
use civic_types::api::{
    AddResponseRequest, CatalogResponse, ComplaintQuery, ComplaintUpdate, NewComplaint,
    NewResponse,
};

use crate::auth::{AppState, blocking};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::bearer_claims;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn get_catalog() -> impl IntoResponse {
    Json(CatalogResponse {
        categories: catalog::CATEGORIES.iter().map(|s| s.to_string()).collect(),
        departments: catalog::DEPARTMENTS.iter().map(|s| s.to_string()).collect(),
    })
}

fn parse_filter(query: &ComplaintQuery) -> ApiResult<ComplaintFilter> {
    ComplaintFilter::from_query(query).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// POST /complaints: anyone may file a complaint.
pub async fn submit_complaint(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewComplaint>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    if !catalog::is_category(&req.category) {
        return Err(ApiError::field("category", "Please select a category"));
    }

    let st = state.clone();
    let complaint = blocking(move || st.complaints.add(req)).await?;

    Ok((StatusCode::CREATED, Json(complaint)))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let complaint = state
        .complaints
        .get_by_id(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("complaint not found: {}", id)))?;

    Ok(Json(complaint))
}

/// GET /complaints?email=…: a citizen's own complaints, optionally narrowed
/// by status and search text.
pub async fn lookup_complaints(
    State(state): State<AppState>,
    Query(query): Query<ComplaintQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = parse_filter(&query)?;
    let Some(email) = filter.citizen_email.as_deref() else {
        return Err(ApiError::BadRequest("email is required".into()));
    };

    let own = state.complaints.get_by_email(email)?;
    Ok(Json(filter.apply(&own)))
}

/// POST /complaints/{id}/responses
///
/// Authorship comes from the bearer token: an admin token produces an admin
/// response, anything else a citizen response.
pub async fn add_response(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<AddResponseRequest>,
) -> ApiResult<impl IntoResponse> {
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::field("text", "Response text cannot be empty"));
    }

    let claims = bearer_claims(&headers, &state.jwt_secret)?;

    let complaint = state
        .complaints
        .get_by_id(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("complaint not found: {}", id)))?;

    let response = match claims {
        Some(claims) if claims.is_admin() => NewResponse {
            text,
            is_admin: true,
            user_name: claims
                .department
                .map(|d| format!("{} Dept", d))
                .unwrap_or(claims.name),
        },
        Some(claims) => NewResponse {
            text,
            is_admin: false,
            user_name: claims.name,
        },
        None => NewResponse {
            text,
            is_admin: false,
            user_name: req
                .user_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or(complaint.citizen_name),
        },
    };

    let st = state.clone();
    let created = blocking(move || st.complaints.add_response(&id, response)).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// -- Admin --

pub async fn admin_list(
    State(state): State<AppState>,
    Query(query): Query<ComplaintQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = parse_filter(&query)?;
    Ok(Json(state.complaints.query(&filter)?))
}

pub async fn admin_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<ComplaintUpdate>,
) -> ApiResult<impl IntoResponse> {
    if let Some(category) = &changes.category {
        if !catalog::is_category(category) {
            return Err(ApiError::field("category", "Unknown category"));
        }
    }
    if let Some(department) = &changes.department_assigned {
        if !catalog::is_department(department) {
            return Err(ApiError::field("departmentAssigned", "Unknown department"));
        }
    }

    let st = state.clone();
    let complaint_id = id.clone();
    let updated = blocking(move || st.complaints.update(&complaint_id, changes))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("complaint not found: {}", id)))?;

    info!("Complaint {} now {}", updated.id, updated.status);
    Ok(Json(updated))
}

pub async fn admin_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.complaints.stats()?))
}
