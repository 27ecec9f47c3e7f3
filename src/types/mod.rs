use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= Authentication Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Login payload. `username` may hold either the username or the email.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Instant after which `token` is rejected
    pub expiration: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub unique_name: String,
    pub email: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

// ============= Book Types =============

/// Fields shared by book creation and update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    pub published_date: DateTime<Utc>,
    pub isbn: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub published_date: DateTime<Utc>,
    pub isbn: String,
    pub cover_image_url: Option<String>,
    pub added_by_user_id: String,
    pub added_by_username: String,
    pub created_at: DateTime<Utc>,
    /// Unset until the first update
    pub updated_at: Option<DateTime<Utc>>,
}

// ============= Quote Types =============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub text: String,
    pub author: String,
    pub book_id: String,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDto {
    pub id: String,
    pub text: String,
    pub author: String,
    pub book_id: String,
    pub book_title: String,
    pub user_id: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ============= Favorite Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub book_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDto {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub added_at: DateTime<Utc>,
}

// ============= Error Types =============

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// One of `validation`, `invalid_input`, `conflict`, `unauthorized`,
    /// `forbidden`, `not_found`, `internal`
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// A uniqueness rule was violated; `fields` names the offending inputs.
    #[error("Conflict: {message}")]
    Conflict { message: String, fields: Vec<String> },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn conflict(message: impl Into<String>, field: &str) -> Self {
        AppError::Conflict {
            message: message.into(),
            fields: vec![field.to_string()],
        }
    }

    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::Validation(_) | AppError::Conflict { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn to_body(&self) -> ErrorResponse {
        let (error, code, fields) = match self {
            AppError::Database(_) | AppError::Internal(_) => {
                ("Internal server error".to_string(), "internal", Vec::new())
            }
            AppError::Auth(msg) => (msg.clone(), "unauthorized", Vec::new()),
            AppError::Forbidden(msg) => (msg.clone(), "forbidden", Vec::new()),
            AppError::NotFound(msg) => (msg.clone(), "not_found", Vec::new()),
            AppError::InvalidInput(msg) => (msg.clone(), "invalid_input", Vec::new()),
            AppError::Validation(errors) => {
                ("Validation failed".to_string(), "validation", errors.clone())
            }
            AppError::Conflict { message, fields } => (
                message.clone(),
                "conflict",
                fields
                    .iter()
                    .map(|field| FieldError {
                        field: field.clone(),
                        message: message.clone(),
                    })
                    .collect(),
            ),
        };

        ErrorResponse {
            error,
            code: code.to_string(),
            fields,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, axum::Json(self.to_body())).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// ============= Input Validation =============

/// Collects field-level problems and turns them into one `AppError::Validation`.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Required, trimmed-non-empty, at most `max` characters.
    pub fn required(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", field));
        } else if value.chars().count() > max {
            self.add(field, format!("{} must be at most {} characters", field, max));
        }
    }

    pub fn optional(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.add(field, format!("{} must be at most {} characters", field, max));
            }
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();

        errors.required("username", &self.username, 50);
        errors.required("email", &self.email, 100);
        if !self.email.trim().is_empty() && !looks_like_email(self.email.trim()) {
            errors.add("email", "email must be a valid email address");
        }
        errors.optional("firstName", self.first_name.as_deref(), 50);
        errors.optional("lastName", self.last_name.as_deref(), 50);

        let password_len = self.password.chars().count();
        if !(6..=100).contains(&password_len) {
            errors.add("password", "password must be between 6 and 100 characters");
        }
        if self.password != self.confirm_password {
            errors.add("confirmPassword", "passwords do not match");
        }

        errors.into_result()
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", "username is required");
        }
        if self.password.is_empty() {
            errors.add("password", "password is required");
        }
        errors.into_result()
    }
}

impl BookRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.required("title", &self.title, 100);
        errors.required("author", &self.author, 100);
        errors.optional("description", self.description.as_deref(), 500);
        errors.required("isbn", &self.isbn, 50);
        // Stored verbatim, and it is the unique key
        if !self.isbn.trim().is_empty() && self.isbn.trim() != self.isbn {
            errors.add("isbn", "isbn must not start or end with whitespace");
        }
        if !(1..=9999).contains(&self.published_date.year()) {
            errors.add("publishedDate", "publishedDate must fall between years 1 and 9999");
        }
        errors.into_result()
    }
}

impl QuoteRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.text.trim().is_empty() {
            errors.add("text", "text is required");
        }
        errors.required("author", &self.author, 100);
        if self.book_id.trim().is_empty() {
            errors.add("bookId", "bookId is required");
        }
        errors.into_result()
    }
}
