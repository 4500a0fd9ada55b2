use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    Todo, TodoError, TodoId, TodoPatch, TodoRepository, User, UserError, UserId, UserRepository,
};

/// ToDo のビジネスルール
///
/// 更新と削除は必ず事前に存在確認を行い、その後ストレージへ変更を依頼する。
/// 確認と書き込みの間に削除された場合は、二度目の呼び出しが NotFound を返す。
#[derive(Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, title: String, description: Option<String>) -> Result<Todo, TodoError> {
        validate_title(&title)?;

        let todo = Todo::new(title, description.unwrap_or_default(), Utc::now());
        debug!(todo_id = %todo.id, "Saving new todo");

        let saved = self.repository.save(todo).await?;
        info!(todo_id = %saved.id, "Todo created");
        Ok(saved)
    }

    pub async fn get(&self, id: &TodoId) -> Result<Todo, TodoError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    pub async fn update(
        &self,
        id: &TodoId,
        title: String,
        description: String,
        completed: bool,
    ) -> Result<Todo, TodoError> {
        validate_title(&title)?;

        // 存在確認のみ。取得結果は使わない
        self.get(id).await?;

        let patch = TodoPatch {
            title,
            description,
            completed,
            updated_at: Utc::now(),
        };

        match self.repository.update(id, patch).await? {
            Some(updated) => {
                info!(todo_id = %id, "Todo updated");
                Ok(updated)
            }
            None => {
                warn!(todo_id = %id, "Todo disappeared before update");
                Err(TodoError::NotFound(id.to_string()))
            }
        }
    }

    pub async fn delete(&self, id: &TodoId) -> Result<(), TodoError> {
        self.get(id).await?;

        if self.repository.delete(id).await? {
            info!(todo_id = %id, "Todo deleted");
            Ok(())
        } else {
            warn!(todo_id = %id, "Todo disappeared before delete");
            Err(TodoError::NotFound(id.to_string()))
        }
    }
}

fn validate_title(title: &str) -> Result<(), TodoError> {
    if title.trim().is_empty() {
        return Err(TodoError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

/// ユーザーの参照専用サービス
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}
