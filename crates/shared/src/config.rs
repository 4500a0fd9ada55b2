use std::env;
use std::str::FromStr;

use crate::errors::AppError;

/// 使用するストレージアダプター
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StorageBackend::DynamoDb),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "unknown STORAGE_BACKEND: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub todo_table: String,
    pub user_table: String,
    pub environment: String,
    pub aws_region: String,
    /// DynamoDB Local などのエンドポイント上書き
    pub dynamodb_endpoint: Option<String>,
    pub storage_backend: StorageBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の取得関数から設定を組み立てる。未設定の項目は既定値になる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::DynamoDb,
        };

        Ok(Config {
            todo_table: lookup("TODO_TABLE").unwrap_or_else(|| "todos".to_string()),
            user_table: lookup("USER_TABLE").unwrap_or_else(|| "users".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "ap-northeast-1".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|s| !s.trim().is_empty()),
            storage_backend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.todo_table, "todos");
        assert_eq!(config.user_table, "users");
        assert_eq!(config.environment, "dev");
        assert_eq!(config.aws_region, "ap-northeast-1");
        assert!(config.dynamodb_endpoint.is_none());
        assert_eq!(config.storage_backend, StorageBackend::DynamoDb);
    }

    #[test]
    fn test_values_from_environment() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODO_TABLE", "todo-prod"),
            ("USER_TABLE", "user-prod"),
            ("ENVIRONMENT", "prod"),
            ("AWS_REGION", "us-east-1"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("STORAGE_BACKEND", "Memory"),
        ]))
        .unwrap();

        assert_eq!(config.todo_table, "todo-prod");
        assert_eq!(config.user_table, "user-prod");
        assert_eq!(config.environment, "prod");
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(
            config.dynamodb_endpoint.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.storage_backend, StorageBackend::Memory);
    }

    #[test]
    fn test_blank_endpoint_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("DYNAMODB_ENDPOINT", "  ")])).unwrap();
        assert!(config.dynamodb_endpoint.is_none());
    }

    #[test]
    fn test_unknown_backend_is_configuration_error() {
        let result = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "redis")]));

        match result {
            Err(AppError::Configuration(msg)) => assert!(msg.contains("redis")),
            other => panic!("Expected configuration error, got {other:?}"),
        }
    }
}
