use serde_json::json;
use shared::telemetry::trace_http_request;
use shared::{AppError, ErrorResponse};
use std::time::Instant;

use crate::controller::{
    TodoController, UserController, TODO_COLLECTION_PATH, TODO_ITEM_PREFIX, USER_ITEM_PREFIX,
};
use crate::request::{ApiGatewayProxyRequest, ApiGatewayProxyResponse, ControllerResponse};

/// メソッドとパスでコントローラーへ振り分ける
///
/// コレクションは完全一致、個別リソースは前方一致で判定し、最初に一致した
/// ものを使う。どれにも一致しなければ 404。
#[derive(Clone)]
pub struct Router {
    todos: TodoController,
    users: UserController,
}

impl Router {
    pub fn new(todos: TodoController, users: UserController) -> Self {
        Self { todos, users }
    }

    pub async fn handle(
        &self,
        request: &ApiGatewayProxyRequest,
        request_id: &str,
    ) -> ApiGatewayProxyResponse {
        let started = Instant::now();

        let response = match self.dispatch(request).await {
            Some(Ok(response)) => response.into_proxy_response(),
            Some(Err(error)) => error_response(&error, request, request_id),
            None => not_found(),
        };

        trace_http_request(
            &request.http_method,
            &request.path,
            response.status_code,
            started.elapsed().as_millis(),
        );
        response
    }

    async fn dispatch(
        &self,
        request: &ApiGatewayProxyRequest,
    ) -> Option<Result<ControllerResponse, AppError>> {
        let result = match (request.http_method.as_str(), request.path.as_str()) {
            ("POST", TODO_COLLECTION_PATH) => self.todos.create(request).await,
            ("GET", path) if path.starts_with(TODO_ITEM_PREFIX) => self.todos.get(request).await,
            ("PUT", path) if path.starts_with(TODO_ITEM_PREFIX) => {
                self.todos.update(request).await
            }
            ("DELETE", path) if path.starts_with(TODO_ITEM_PREFIX) => {
                self.todos.delete(request).await
            }
            ("GET", path) if path.starts_with(USER_ITEM_PREFIX) => {
                self.users.get_user(request).await
            }
            _ => return None,
        };
        Some(result)
    }
}

fn not_found() -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse::new(404, Some(&json!({"message": "Not Found"})))
}

fn error_response(
    error: &AppError,
    request: &ApiGatewayProxyRequest,
    request_id: &str,
) -> ApiGatewayProxyResponse {
    error.log(request_id);

    let body = ErrorResponse::from_app_error(error, request_id.to_string(), cfg!(debug_assertions))
        .with_context("method", request.http_method.as_str())
        .with_context("path", request.path.as_str());

    let mut response = ApiGatewayProxyResponse::new(error.http_status_code(), None);
    response.body = body.to_json().unwrap_or_else(|_| {
        json!({"code": error.metadata().code, "message": error.user_message()}).to_string()
    });
    response
}
