use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use shared::telemetry::{create_lambda_span, LambdaTraceContext};
use shared::{init_tracing, Config};
use std::sync::Arc;
use todo_api::{ApiGatewayProxyRequest, ApiGatewayProxyResponse, AppContainer, Router};
use tracing::{error, info, Instrument};

async fn function_handler(
    router: &Router,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (request, context) = event.into_parts();
    let trace_context = LambdaTraceContext::from_lambda_context(&context);
    let span = create_lambda_span("todo-api", &trace_context);

    // ローカル実行ではリクエスト ID が空のことがある
    let request_id = if context.request_id.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        context.request_id.clone()
    };

    let response = router.handle(&request, &request_id).instrument(span).await;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    if let Err(e) = init_tracing("info") {
        eprintln!("トレーシング初期化エラー: {e}");
    }

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    let container = AppContainer::from_config(&config).await;
    let router = Arc::new(container.router());
    info!(environment = %config.environment, "todo-api started");

    run(service_fn(move |event: LambdaEvent<ApiGatewayProxyRequest>| {
        let router = Arc::clone(&router);
        async move { function_handler(&router, event).await }
    }))
    .await
}
