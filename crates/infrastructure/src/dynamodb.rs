use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use shared::Config;
use tracing::info;

/// DynamoDB クライアントとテーブル名の組
///
/// `Client` は内部で接続プールを共有するため、複製は安価。
#[derive(Clone, Debug)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    /// 設定からSDK共通設定を読み込み、`table_name` 用のクライアントを作る
    pub async fn new(config: &Config, table_name: &str) -> Self {
        let client = build_client(config).await;
        Self::with_client(client, table_name)
    }

    /// 既存の SDK クライアントを別テーブル向けに再利用する
    pub fn with_client(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// `DYNAMODB_ENDPOINT` が設定されていればそのエンドポイントへ向ける
pub async fn build_client(config: &Config) -> Client {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await;

    match &config.dynamodb_endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Using DynamoDB endpoint override");
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamo_config)
        }
        None => Client::new(&sdk_config),
    }
}
