use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use hrdesk_core::validation::FieldErrors;

/// Admin service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    #[error("the given data was invalid")]
    Validation(FieldErrors),
    #[error("malformed request")]
    MalformedRequest,
    #[error("forbidden")]
    Forbidden,
    #[error("you cannot delete your own account")]
    SelfDeletionForbidden,
    #[error("you cannot modify your own account here")]
    SelfModificationForbidden,
    #[error("employee not found")]
    EmployeeNotFound,
    #[error("business unit not found")]
    BusinessUnitNotFound,
    #[error("template not found")]
    TemplateNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AdminServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::Forbidden => "FORBIDDEN",
            Self::SelfDeletionForbidden => "SELF_DELETION_FORBIDDEN",
            Self::SelfModificationForbidden => "SELF_MODIFICATION_FORBIDDEN",
            Self::EmployeeNotFound => "EMPLOYEE_NOT_FOUND",
            Self::BusinessUnitNotFound => "BUSINESS_UNIT_NOT_FOUND",
            Self::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Shorthand for a validation failure on one field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for AdminServiceError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for AdminServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedRequest => StatusCode::BAD_REQUEST,
            Self::Forbidden | Self::SelfDeletionForbidden | Self::SelfModificationForbidden => {
                StatusCode::FORBIDDEN
            }
            Self::EmployeeNotFound
            | Self::BusinessUnitNotFound
            | Self::TemplateNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(ref errors) = self {
            body["errors"] = serde_json::json!(errors);
        }
        (status, axum::Json(body)).into_response()
    }
}
