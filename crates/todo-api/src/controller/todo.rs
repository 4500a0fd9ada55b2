use domain::{TodoId, TodoService};
use serde::Deserialize;
use shared::AppError;
use tracing::info;

use crate::request::{to_body, ApiGatewayProxyRequest, ControllerResponse};

pub const TODO_COLLECTION_PATH: &str = "/todos";
pub const TODO_ITEM_PREFIX: &str = "/todos/";

/// ToDo作成リクエスト
#[derive(Debug, Deserialize)]
struct CreateTodoRequest {
    title: Option<String>,
    description: Option<String>,
}

/// ToDo更新リクエスト。省略された項目は既定値で上書きする
#[derive(Debug, Deserialize)]
struct UpdateTodoRequest {
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
}

#[derive(Clone)]
pub struct TodoController {
    service: TodoService,
}

impl TodoController {
    pub fn new(service: TodoService) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        request: &ApiGatewayProxyRequest,
    ) -> Result<ControllerResponse, AppError> {
        let body: CreateTodoRequest = request.json_body()?;
        let title = body
            .title
            .ok_or_else(|| AppError::MissingField("title".to_string()))?;

        let todo = self.service.create(title, body.description).await?;
        info!(todo_id = %todo.id, "Create todo handled");

        Ok(ControllerResponse::created(to_body(&todo)?))
    }

    pub async fn get(&self, request: &ApiGatewayProxyRequest) -> Result<ControllerResponse, AppError> {
        let id = todo_id(request)?;
        let todo = self.service.get(&id).await?;

        Ok(ControllerResponse::ok(to_body(&todo)?))
    }

    pub async fn update(
        &self,
        request: &ApiGatewayProxyRequest,
    ) -> Result<ControllerResponse, AppError> {
        let id = todo_id(request)?;
        let body: UpdateTodoRequest = request.json_body()?;
        let title = body
            .title
            .ok_or_else(|| AppError::MissingField("title".to_string()))?;

        let todo = self
            .service
            .update(
                &id,
                title,
                body.description.unwrap_or_default(),
                body.completed.unwrap_or(false),
            )
            .await?;

        Ok(ControllerResponse::ok(to_body(&todo)?))
    }

    pub async fn delete(
        &self,
        request: &ApiGatewayProxyRequest,
    ) -> Result<ControllerResponse, AppError> {
        let id = todo_id(request)?;
        self.service.delete(&id).await?;

        Ok(ControllerResponse::no_content())
    }
}

fn todo_id(request: &ApiGatewayProxyRequest) -> Result<TodoId, AppError> {
    request
        .resource_id("todoId", TODO_ITEM_PREFIX)
        .map(TodoId::from_string)
}
