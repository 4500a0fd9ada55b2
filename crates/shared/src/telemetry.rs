use lambda_runtime::Context;
use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use tracing::{error, info, warn};

/// Lambda 関数のトレーシング情報
#[derive(Debug, Clone)]
pub struct LambdaTraceContext {
    pub function_name: String,
    pub function_version: String,
    pub request_id: String,
    pub trace_id: Option<String>,
}

impl LambdaTraceContext {
    /// Lambda Context からトレーシング情報を抽出
    pub fn from_lambda_context(context: &Context) -> Self {
        Self {
            function_name: context.env_config.function_name.clone(),
            function_version: context.env_config.version.clone(),
            request_id: context.request_id.clone(),
            trace_id: context
                .xray_trace_id
                .clone()
                .or_else(|| std::env::var("_X_AMZN_TRACE_ID").ok()),
        }
    }
}

/// Lambda 呼び出し 1 回分のスパンを作成
pub fn create_lambda_span(handler_name: &str, trace_context: &LambdaTraceContext) -> tracing::Span {
    tracing::info_span!(
        "lambda_handler",
        handler = handler_name,
        function_name = %trace_context.function_name,
        function_version = %trace_context.function_version,
        request_id = %trace_context.request_id,
        trace_id = %trace_context.trace_id.as_deref().unwrap_or("none")
    )
}

/// HTTP リクエストの結果を記録する。4xx/5xx は warn
pub fn trace_http_request(method: &str, path: &str, status_code: u16, duration_ms: u128) {
    if status_code >= 400 {
        warn!(
            method = method,
            path = path,
            status_code = status_code,
            duration_ms = duration_ms,
            "HTTP request failed"
        );
    } else {
        info!(
            method = method,
            path = path,
            status_code = status_code,
            duration_ms = duration_ms,
            "HTTP request completed"
        );
    }
}

/// ストレージ操作の所要時間と結果を記録する
pub async fn trace_storage_operation<T, E, Fut>(
    table_name: &str,
    operation_name: &str,
    operation: Fut,
) -> Result<T, E>
where
    E: Display,
    Fut: Future<Output = Result<T, E>>,
{
    let start_time = Instant::now();
    let result = operation.await;
    let duration = start_time.elapsed();

    match &result {
        Ok(_) => {
            info!(
                table = table_name,
                operation = operation_name,
                duration_ms = duration.as_millis(),
                "Storage operation completed"
            );
        }
        Err(e) => {
            error!(
                table = table_name,
                operation = operation_name,
                duration_ms = duration.as_millis(),
                error = %e,
                "Storage operation failed"
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trace_storage_operation_passes_result_through() {
        let ok: Result<u32, String> =
            trace_storage_operation("todos", "GetItem", async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> =
            trace_storage_operation("todos", "GetItem", async { Err("boom".to_string()) }).await;
        assert_eq!(err, Err("boom".to_string()));
    }

    #[test]
    fn test_create_lambda_span_without_trace_id() {
        let trace_context = LambdaTraceContext {
            function_name: "todo-api".to_string(),
            function_version: "$LATEST".to_string(),
            request_id: "req-1".to_string(),
            trace_id: None,
        };

        // サブスクライバー未登録でもスパン生成は失敗しない
        let span = create_lambda_span("todo-api", &trace_context);
        let _guard = span.enter();
        trace_http_request("GET", "/todos/1", 404, 3);
    }
}
