use domain::{UserId, UserService};
use shared::AppError;

use crate::request::{to_body, ApiGatewayProxyRequest, ControllerResponse};

pub const USER_ITEM_PREFIX: &str = "/users/";

/// ユーザー参照用コントローラー
#[derive(Clone)]
pub struct UserController {
    service: UserService,
}

impl UserController {
    pub fn new(service: UserService) -> Self {
        Self { service }
    }

    pub async fn get_user(
        &self,
        request: &ApiGatewayProxyRequest,
    ) -> Result<ControllerResponse, AppError> {
        let id = UserId::from_string(request.resource_id("userId", USER_ITEM_PREFIX)?);
        let user = self.service.get(&id).await?;

        Ok(ControllerResponse::ok(to_body(&user)?))
    }
}
