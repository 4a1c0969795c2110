//! Unified error handling for the credential service.
//!
//! Provides a single error type carrying the credential error taxonomy,
//! convertible to Tonic gRPC status codes at the transport boundary.

use domain::DomainError;
use thiserror::Error;
use tonic::Status;

/// Boxed cause carried by internal failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application error kinds.
///
/// `InvalidCredentials` deliberately covers both an unknown email and a
/// wrong password.
#[derive(Error, Debug)]
pub enum AppError {
    // Credential outcomes
    #[error("user already exists")]
    UserAlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid app id")]
    InvalidAppId,

    #[error("user not found")]
    UserNotFound,

    // Boundary validation
    #[error("{0}")]
    Validation(String),

    // External library errors
    #[cfg(feature = "jwt")]
    #[error("token signing failed")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("{op}: internal error")]
    Internal {
        op: &'static str,
        #[source]
        source: BoxError,
    },
}

impl AppError {
    /// Get error code for logs and clients
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidAppId => "INVALID_APP_ID",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "TOKEN_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// gRPC status code for this error kind
    pub fn grpc_code(&self) -> tonic::Code {
        match self {
            AppError::UserAlreadyExists => tonic::Code::AlreadyExists,
            AppError::InvalidCredentials | AppError::InvalidAppId => tonic::Code::InvalidArgument,
            AppError::Validation(_) => tonic::Code::InvalidArgument,
            AppError::UserNotFound => tonic::Code::NotFound,
            _ => tonic::Code::Internal,
        }
    }

    /// Get user-facing message (hides internal details)
    ///
    /// Credential failures use the wire messages existing clients match on:
    /// a failed sign-in reads as an unknown user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "user not found".to_string(),
            AppError::InvalidAppId => "app not found".to_string(),
            AppError::Validation(msg) => msg.clone(),

            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::error!("Token signing error: {:?}", e);
                "internal error".to_string()
            }
            AppError::Internal { op, source } => {
                tracing::error!(op = *op, error = %source, "Internal error");
                "internal error".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Whether this error is a catch-all internal failure
    pub fn is_internal(&self) -> bool {
        self.grpc_code() == tonic::Code::Internal
    }
}

// =============================================================================
// gRPC Status (Tonic)
// =============================================================================

impl From<AppError> for Status {
    fn from(err: AppError) -> Self {
        tracing::debug!(code = err.code(), "request failed");
        Status::new(err.grpc_code(), err.user_message())
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Password(_) => AppError::internal("password", err),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(op: &'static str, source: impl Into<BoxError>) -> Self {
        AppError::Internal {
            op,
            source: source.into(),
        }
    }
}
