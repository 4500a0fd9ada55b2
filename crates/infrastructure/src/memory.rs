//! プロセス内メモリに保持するストレージアダプター
//!
//! ローカル実行とテスト用。Lambda の実行環境が破棄されると内容も消える。

use async_trait::async_trait;
use domain::{StorageError, Todo, TodoId, TodoPatch, TodoRepository, User, UserId, UserRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<HashMap<TodoId, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StorageError> {
        Ok(self.todos.read().await.get(id).cloned())
    }

    async fn save(&self, todo: Todo) -> Result<Todo, StorageError> {
        debug!(todo_id = %todo.id, "Storing todo in memory");
        self.todos.write().await.insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, StorageError> {
        let mut todos = self.todos.write().await;
        Ok(todos.get_mut(id).map(|todo| {
            todo.apply(patch);
            todo.clone()
        }))
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, StorageError> {
        Ok(self.todos.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// ユーザーを登録する。ユーザーの作成は API の範囲外なので、初期データ投入用
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}
