use actix_web::HttpResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required.")]
    Unauthorized,

    #[error("Insufficient privileges.")]
    Forbidden,

    #[error("Checkout is disabled by admin.")]
    CheckoutDisabled,

    #[error("{0}")]
    Validation(String),

    #[error("Cart is empty.")]
    EmptyCart,

    #[error("Not found.")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<diesel::result::Error> for AppError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => AppError::NotFound,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
                "message": self.to_string()
            })),
            AppError::Forbidden | AppError::CheckoutDisabled => {
                HttpResponse::Forbidden().json(serde_json::json!({
                    "message": self.to_string()
                }))
            }
            AppError::Validation(_) | AppError::EmptyCart => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "message": self.to_string()
                }))
            }
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "message": self.to_string()
            })),
            AppError::Internal(detail) => {
                log::error!("internal error: {}", detail);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Internal server error."
                }))
            }
        }
    }
}
