//! ストレージポート
//!
//! サービス層が依存する永続化の契約。具体的なバックエンドは
//! `infrastructure` クレートのアダプターが提供する。

use async_trait::async_trait;

use crate::{StorageError, Todo, TodoId, TodoPatch, User, UserId};

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StorageError>;

    /// 保存したレコードを返す。呼び出し側は戻り値を正とする
    async fn save(&self, todo: Todo) -> Result<Todo, StorageError>;

    /// 存在しない ID の場合は `None`
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, StorageError>;

    /// 存在しない ID の場合は `false`
    async fn delete(&self, id: &TodoId) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError>;
}
