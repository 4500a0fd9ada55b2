use domain::{TodoRepository, TodoService, UserRepository, UserService};
use infrastructure::{
    DynamoDbClient, DynamoDbTodoRepository, DynamoDbUserRepository, InMemoryTodoRepository,
    InMemoryUserRepository,
};
use shared::{Config, StorageBackend};
use std::sync::Arc;
use tracing::info;

use crate::controller::{TodoController, UserController};
use crate::router::Router;

/// 実行環境ごとに一度だけ組み立てるサービス群
#[derive(Clone)]
pub struct AppContainer {
    pub todo_service: TodoService,
    pub user_service: UserService,
}

impl AppContainer {
    /// 設定されたストレージバックエンドでサービスを組み立てる
    pub async fn from_config(config: &Config) -> Self {
        match config.storage_backend {
            StorageBackend::Memory => {
                info!(environment = %config.environment, "Using in-memory storage");
                Self::in_memory()
            }
            StorageBackend::DynamoDb => {
                info!(
                    environment = %config.environment,
                    todo_table = %config.todo_table,
                    user_table = %config.user_table,
                    "Using DynamoDB storage"
                );
                let todo_db = DynamoDbClient::new(config, &config.todo_table).await;
                // SDK クライアントは両テーブルで共有する
                let user_db = DynamoDbClient::with_client(todo_db.client().clone(), &config.user_table);

                Self::with_repositories(
                    Arc::new(DynamoDbTodoRepository::new(todo_db)),
                    Arc::new(DynamoDbUserRepository::new(user_db)),
                )
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::with_repositories(
            Arc::new(InMemoryTodoRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }

    pub fn with_repositories(
        todos: Arc<dyn TodoRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            todo_service: TodoService::new(todos),
            user_service: UserService::new(users),
        }
    }

    pub fn router(&self) -> Router {
        Router::new(
            TodoController::new(self.todo_service.clone()),
            UserController::new(self.user_service.clone()),
        )
    }
}
