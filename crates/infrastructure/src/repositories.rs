use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::ReturnValue;
use domain::{StorageError, Todo, TodoId, TodoPatch, TodoRepository, User, UserId, UserRepository};
use shared::telemetry::trace_storage_operation;
use tracing::debug;

use crate::models::{item_to_todo, item_to_user, key_for, patch_update_expression, todo_to_item};
use crate::DynamoDbClient;

/// SDK エラーを原因の連鎖ごと文字列化してストレージエラーに包む
fn backend_error(error: impl std::error::Error) -> StorageError {
    StorageError::Backend(DisplayErrorContext(&error).to_string())
}

/// DynamoDB に ToDo を保存するリポジトリ
#[derive(Clone)]
pub struct DynamoDbTodoRepository {
    db: DynamoDbClient,
}

impl DynamoDbTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for DynamoDbTodoRepository {
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StorageError> {
        let (key_name, key_value) = key_for(id.as_str());

        let output = trace_storage_operation(self.db.table_name(), "GetItem", async {
            self.db
                .client()
                .get_item()
                .table_name(self.db.table_name())
                .key(key_name, key_value)
                .send()
                .await
                .map_err(backend_error)
        })
        .await?;

        output.item().map(item_to_todo).transpose()
    }

    async fn save(&self, todo: Todo) -> Result<Todo, StorageError> {
        let item = todo_to_item(&todo);

        trace_storage_operation(self.db.table_name(), "PutItem", async {
            self.db
                .client()
                .put_item()
                .table_name(self.db.table_name())
                .set_item(Some(item))
                .send()
                .await
                .map_err(backend_error)
        })
        .await?;

        debug!(todo_id = %todo.id, "Todo item written");
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, StorageError> {
        let (key_name, key_value) = key_for(id.as_str());
        let (expression, values) = patch_update_expression(&patch);

        let result = trace_storage_operation(self.db.table_name(), "UpdateItem", async {
            let outcome = self
                .db
                .client()
                .update_item()
                .table_name(self.db.table_name())
                .key(key_name, key_value)
                .update_expression(expression)
                .set_expression_attribute_values(Some(values))
                .condition_expression("attribute_exists(id)")
                .return_values(ReturnValue::AllNew)
                .send()
                .await;

            match outcome {
                Ok(output) => Ok(Some(output)),
                // 条件不成立 = 対象アイテムが存在しない
                Err(e)
                    if e.as_service_error()
                        .map(|se| se.is_conditional_check_failed_exception())
                        .unwrap_or(false) =>
                {
                    Ok(None)
                }
                Err(e) => Err(backend_error(e)),
            }
        })
        .await?;

        match result {
            Some(output) => match output.attributes() {
                Some(attributes) => item_to_todo(attributes).map(Some),
                None => Err(StorageError::Corrupt(
                    "UpdateItem returned no attributes".to_string(),
                )),
            },
            None => {
                debug!(todo_id = %id, "UpdateItem condition failed, todo missing");
                Ok(None)
            }
        }
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, StorageError> {
        let (key_name, key_value) = key_for(id.as_str());

        let output = trace_storage_operation(self.db.table_name(), "DeleteItem", async {
            self.db
                .client()
                .delete_item()
                .table_name(self.db.table_name())
                .key(key_name, key_value)
                .return_values(ReturnValue::AllOld)
                .send()
                .await
                .map_err(backend_error)
        })
        .await?;

        // 削除前の属性が返らなければ、もともと存在しなかった
        Ok(output.attributes().is_some())
    }
}

/// DynamoDB からユーザーを読み出すリポジトリ
#[derive(Clone)]
pub struct DynamoDbUserRepository {
    db: DynamoDbClient,
}

impl DynamoDbUserRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for DynamoDbUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let (key_name, key_value) = key_for(id.as_str());

        let output = trace_storage_operation(self.db.table_name(), "GetItem", async {
            self.db
                .client()
                .get_item()
                .table_name(self.db.table_name())
                .key(key_name, key_value)
                .send()
                .await
                .map_err(backend_error)
        })
        .await?;

        output.item().map(item_to_user).transpose()
    }
}
