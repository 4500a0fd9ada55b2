use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// JSON 形式の構造化ログを CloudWatch Logs へ出力するサブスクライバーを登録する
///
/// `RUST_LOG` が未設定または不正な場合は `default_directive` を使う。
/// X-Ray のトレース ID は Lambda ランタイムが環境変数で渡す。
pub fn init_tracing(default_directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .json()
                .with_current_span(true),
        )
        .with(filter)
        .try_init()?;

    Ok(())
}
