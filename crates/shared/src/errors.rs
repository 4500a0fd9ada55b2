use domain::{TodoError, UserError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// API の入口で扱うエラー。すべて HTTP レスポンスに変換できる
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // リクエストエラー
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // システムエラー
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// エラーの分類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// クライアントエラー（4xx相当）
    Client,
    /// サーバーエラー（5xx相当）
    Server,
}

/// エラーの重要度
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
}

impl AppError {
    pub fn metadata(&self) -> ErrorMetadata {
        let (code, category, severity) = match self {
            AppError::MissingField(_) => ("MISSING_FIELD", ErrorCategory::Client, ErrorSeverity::Info),
            AppError::InvalidBody(_) => ("INVALID_BODY", ErrorCategory::Client, ErrorSeverity::Info),
            AppError::Validation(_) => {
                ("VALIDATION_ERROR", ErrorCategory::Client, ErrorSeverity::Info)
            }
            AppError::NotFound(_) => ("NOT_FOUND", ErrorCategory::Client, ErrorSeverity::Info),
            AppError::Storage(_) => ("STORAGE_ERROR", ErrorCategory::Server, ErrorSeverity::Error),
            AppError::Configuration(_) => (
                "CONFIGURATION_ERROR",
                ErrorCategory::Server,
                ErrorSeverity::Critical,
            ),
            AppError::Internal(_) => {
                ("INTERNAL_ERROR", ErrorCategory::Server, ErrorSeverity::Critical)
            }
        };

        ErrorMetadata {
            code,
            category,
            severity,
        }
    }

    /// HTTPステータスコードを取得
    pub fn http_status_code(&self) -> u16 {
        match self.metadata().category {
            ErrorCategory::Client => match self {
                AppError::NotFound(_) => 404,
                _ => 400,
            },
            ErrorCategory::Server => 500,
        }
    }

    /// ユーザー向けメッセージを取得
    ///
    /// クライアントエラーは原因をそのまま返し、サーバーエラーは内部情報を伏せる。
    pub fn user_message(&self) -> String {
        match self.metadata().category {
            ErrorCategory::Client => self.to_string(),
            ErrorCategory::Server => "An unexpected error occurred".to_string(),
        }
    }

    /// 重要度に応じたレベルでエラーを記録する
    pub fn log(&self, request_id: &str) {
        let metadata = self.metadata();
        match metadata.severity {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::error!(
                error = %self,
                code = metadata.code,
                request_id = request_id,
                "Request failed"
            ),
            ErrorSeverity::Warning => tracing::warn!(
                error = %self,
                code = metadata.code,
                request_id = request_id,
                "Request failed"
            ),
            ErrorSeverity::Info => tracing::info!(
                error = %self,
                code = metadata.code,
                request_id = request_id,
                "Request rejected"
            ),
        }
    }
}

impl From<TodoError> for AppError {
    fn from(error: TodoError) -> Self {
        match error {
            TodoError::NotFound(_) => AppError::NotFound(error.to_string()),
            TodoError::Validation(msg) => AppError::Validation(msg),
            TodoError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound(_) => AppError::NotFound(error.to_string()),
            UserError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::InvalidBody(error.to_string())
    }
}

/// 標準化されたエラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    /// 詳細情報（開発ビルドのみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub request_id: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn from_app_error(error: &AppError, request_id: String, include_details: bool) -> Self {
        Self {
            code: error.metadata().code.to_string(),
            message: error.user_message(),
            details: include_details.then(|| error.to_string()),
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            context: HashMap::new(),
        }
    }

    /// 追加コンテキストを付与する
    pub fn with_context(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(|e| AppError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::StorageError;

    #[test]
    fn test_error_metadata() {
        let error = AppError::NotFound("test".to_string());
        let metadata = error.metadata();

        assert_eq!(metadata.code, "NOT_FOUND");
        assert_eq!(metadata.category, ErrorCategory::Client);
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(AppError::MissingField("title".to_string()).http_status_code(), 400);
        assert_eq!(AppError::InvalidBody("eof".to_string()).http_status_code(), 400);
        assert_eq!(AppError::Validation("test".to_string()).http_status_code(), 400);
        assert_eq!(AppError::NotFound("test".to_string()).http_status_code(), 404);
        assert_eq!(AppError::Storage("test".to_string()).http_status_code(), 500);
        assert_eq!(AppError::Configuration("test".to_string()).http_status_code(), 500);
        assert_eq!(AppError::Internal("test".to_string()).http_status_code(), 500);
    }

    #[test]
    fn test_todo_not_found_maps_to_404() {
        let error = AppError::from(TodoError::NotFound("abc".to_string()));

        assert_eq!(error.http_status_code(), 404);
        assert!(error.to_string().contains("Todo not found: abc"));
    }

    #[test]
    fn test_storage_failure_hides_details_from_users() {
        let error = AppError::from(TodoError::Storage(StorageError::Backend(
            "ThrottlingException".to_string(),
        )));

        assert_eq!(error.http_status_code(), 500);
        assert!(!error.user_message().contains("ThrottlingException"));
    }

    #[test]
    fn test_user_not_found_maps_to_404() {
        let error = AppError::from(UserError::NotFound("u-1".to_string()));
        assert_eq!(error.http_status_code(), 404);
    }

    #[test]
    fn test_error_response_creation() {
        let error = AppError::MissingField("title".to_string());
        let response = ErrorResponse::from_app_error(&error, "req-123".to_string(), false);

        assert_eq!(response.code, "MISSING_FIELD");
        assert_eq!(response.message, "Missing required field: title");
        assert_eq!(response.request_id, "req-123");
        assert!(response.details.is_none());

        let json = response.to_json().unwrap();
        assert!(json.contains("\"requestId\":\"req-123\""));
        assert!(!json.contains("context"));
    }

    #[test]
    fn test_error_response_with_details_and_context() {
        let error = AppError::Storage("ResourceNotFoundException".to_string());
        let response = ErrorResponse::from_app_error(&error, "req-9".to_string(), true)
            .with_context("path", "/todos/1");

        assert_eq!(response.message, "An unexpected error occurred");
        assert!(response.details.unwrap().contains("ResourceNotFoundException"));
        assert_eq!(response.context.get("path").map(String::as_str), Some("/todos/1"));
    }
}
