//! Error handling for the agronomic decision engine
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External service errors
    #[error("Weather service unavailable")]
    WeatherServiceUnavailable,

    #[error("Weather provider error: {0}")]
    WeatherProvider(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Validation failure on a named field
    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_pt: format!("Valor inválido para {}: {}", field, message),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_default();
        AppError::Validation {
            message: errors.to_string(),
            message_pt: format!("Dados inválidos: {}", field),
            field,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_pt,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_pt: format!("{} não encontrado", resource),
                    field: None,
                },
            ),
            AppError::WeatherServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "WEATHER_SERVICE_UNAVAILABLE".to_string(),
                    message_en: "Weather service is temporarily unavailable".to_string(),
                    message_pt: "Serviço de clima temporariamente indisponível".to_string(),
                    field: None,
                },
            ),
            AppError::WeatherProvider(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "WEATHER_PROVIDER_ERROR".to_string(),
                    message_en: format!("Weather provider error: {}", msg),
                    message_pt: format!("Erro no provedor de clima: {}", msg),
                    field: None,
                },
            ),
            AppError::KnowledgeBase(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "KNOWLEDGE_BASE_ERROR".to_string(),
                    message_en: format!("Knowledge base error: {}", msg),
                    message_pt: format!("Erro na base de conhecimento: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_pt: format!("Erro de configuração: {}", msg),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_pt: "Ocorreu um erro interno no servidor".to_string(),
                    field: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
