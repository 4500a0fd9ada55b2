use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::AppError;
use std::collections::HashMap;

/// API Gateway プロキシリクエスト
///
/// ルーティングに必要な項目だけを読み、それ以外のフィールドは無視する。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyRequest {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiGatewayProxyRequest {
    pub fn new(http_method: &str, path: &str) -> Self {
        Self {
            http_method: http_method.to_string(),
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_path_parameter(mut self, name: &str, value: &str) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    /// 資源 ID を取り出す
    ///
    /// `pathParameters.id`、次に `alias`（`todoId` など）、最後にパスの
    /// `prefix` 以降を使う。どれも空なら `MissingField("id")`。
    pub fn resource_id(&self, alias: &str, prefix: &str) -> Result<String, AppError> {
        let from_parameters = self.path_parameters.as_ref().and_then(|params| {
            params
                .get("id")
                .or_else(|| params.get(alias))
                .filter(|value| !value.is_empty())
                .cloned()
        });

        let id = from_parameters.or_else(|| {
            self.path
                .strip_prefix(prefix)
                .map(|rest| rest.trim_end_matches('/').to_string())
                .filter(|rest| !rest.is_empty())
        });

        id.ok_or_else(|| AppError::MissingField("id".to_string()))
    }

    /// ボディを JSON として読む。ボディが無い、または空白のみなら `MissingField("body")`
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        let body = self
            .body
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .ok_or_else(|| AppError::MissingField("body".to_string()))?;

        Ok(serde_json::from_str(body)?)
    }
}

/// API Gateway プロキシレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ApiGatewayProxyResponse {
    /// JSON ボディ付きのレスポンス。ボディが無ければ空文字列
    pub fn new(status_code: u16, body: Option<&Value>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type".to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            "GET,POST,PUT,DELETE,OPTIONS".to_string(),
        );

        Self {
            status_code,
            headers,
            body: body.map(Value::to_string).unwrap_or_default(),
        }
    }
}

/// コントローラーが返す結果。ステータスと任意の JSON ボディ
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerResponse {
    pub status_code: u16,
    pub body: Option<Value>,
}

impl ControllerResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status_code: 200,
            body: Some(body),
        }
    }

    pub fn created(body: Value) -> Self {
        Self {
            status_code: 201,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status_code: 204,
            body: None,
        }
    }

    pub fn into_proxy_response(self) -> ApiGatewayProxyResponse {
        ApiGatewayProxyResponse::new(self.status_code, self.body.as_ref())
    }
}

/// レスポンス用に値を JSON 化する。失敗はサーバー側の問題として扱う
pub fn to_body<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct TitleOnly {
        title: Option<String>,
    }

    #[test]
    fn test_deserialize_proxy_event_ignores_unknown_fields() {
        let event = json!({
            "httpMethod": "GET",
            "path": "/todos/01ABC",
            "pathParameters": {"id": "01ABC"},
            "headers": {"Accept": "application/json"},
            "requestContext": {"stage": "prod"},
            "body": null
        });

        let request: ApiGatewayProxyRequest = serde_json::from_value(event).unwrap();

        assert_eq!(request.http_method, "GET");
        assert_eq!(request.path, "/todos/01ABC");
        assert!(request.body.is_none());
        assert_eq!(request.resource_id("todoId", "/todos/").unwrap(), "01ABC");
    }

    #[test]
    fn test_resource_id_prefers_path_parameters() {
        let request = ApiGatewayProxyRequest::new("GET", "/todos/from-path")
            .with_path_parameter("todoId", "from-alias");

        assert_eq!(request.resource_id("todoId", "/todos/").unwrap(), "from-alias");
    }

    #[test]
    fn test_resource_id_falls_back_to_path_suffix() {
        let request = ApiGatewayProxyRequest::new("DELETE", "/todos/abc/");

        assert_eq!(request.resource_id("todoId", "/todos/").unwrap(), "abc");
    }

    #[test]
    fn test_empty_resource_id_is_missing_field() {
        let request = ApiGatewayProxyRequest::new("GET", "/todos/").with_path_parameter("id", "");

        match request.resource_id("todoId", "/todos/") {
            Err(AppError::MissingField(field)) => assert_eq!(field, "id"),
            other => panic!("Expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_json_body_errors() {
        let missing = ApiGatewayProxyRequest::new("POST", "/todos");
        assert!(matches!(
            missing.json_body::<TitleOnly>(),
            Err(AppError::MissingField(_))
        ));

        let blank = ApiGatewayProxyRequest::new("POST", "/todos").with_body("   ");
        assert!(matches!(
            blank.json_body::<TitleOnly>(),
            Err(AppError::MissingField(_))
        ));

        let malformed = ApiGatewayProxyRequest::new("POST", "/todos").with_body("{\"title\":");
        assert!(matches!(
            malformed.json_body::<TitleOnly>(),
            Err(AppError::InvalidBody(_))
        ));

        let ok = ApiGatewayProxyRequest::new("POST", "/todos").with_body(r#"{"title":"x"}"#);
        assert_eq!(ok.json_body::<TitleOnly>().unwrap().title.as_deref(), Some("x"));
    }

    #[test]
    fn test_proxy_response_headers_and_empty_body() {
        let response = ControllerResponse::no_content().into_proxy_response();

        assert_eq!(response.status_code, 204);
        assert_eq!(response.body, "");
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            response.headers.get("Access-Control-Allow-Origin").map(String::as_str),
            Some("*")
        );

        let serialized = serde_json::to_value(&response).unwrap();
        assert_eq!(serialized["statusCode"], 204);
    }
}
