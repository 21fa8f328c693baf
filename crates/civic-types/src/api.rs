use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Role, StatusType, User};

// -- JWT Claims --

/// Session claims carried by the bearer token. The role here is the only
/// source of admin authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// -- Auth --

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Partial profile update. The role is deliberately absent.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    pub department: Option<String>,
}

// -- Complaints --

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewComplaint {
    #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
    pub title: String,
    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "Please select a category"))]
    pub category: String,
    #[validate(length(min = 5, message = "Location must be at least 5 characters"))]
    pub location: String,
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub citizen_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub citizen_email: String,
    #[serde(default)]
    pub citizen_phone: Option<String>,
}

/// Fields merged into an existing complaint. Absent fields are left alone.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComplaintUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub citizen_name: Option<String>,
    pub citizen_email: Option<String>,
    pub citizen_phone: Option<String>,
    pub status: Option<StatusType>,
    pub department_assigned: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResponse {
    pub text: String,
    pub is_admin: bool,
    pub user_name: String,
}

/// Body of `POST /complaints/{id}/responses`. Authorship is decided by the
/// caller's token, so only the text and a display name are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddResponseRequest {
    pub text: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Query string for complaint listings. `"all"` disables a criterion.
#[derive(Debug, Default, Deserialize)]
pub struct ComplaintQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: usize,
    pub new: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
    pub assigned: usize,
    pub pending: usize,
}

impl ComplaintStats {
    pub fn record(&mut self, status: StatusType) {
        self.total += 1;
        let slot = match status {
            StatusType::New => &mut self.new,
            StatusType::InProgress => &mut self.in_progress,
            StatusType::Resolved => &mut self.resolved,
            StatusType::Closed => &mut self.closed,
            StatusType::Assigned => &mut self.assigned,
            StatusType::Pending => &mut self.pending,
        };
        *slot += 1;
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub categories: Vec<String>,
    pub departments: Vec<String>,
}

// -- Errors --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub errors: Vec<FieldError>,
}
