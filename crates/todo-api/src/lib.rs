pub mod container;
pub mod controller;
pub mod request;
pub mod router;

pub use container::AppContainer;
pub use request::{ApiGatewayProxyRequest, ApiGatewayProxyResponse, ControllerResponse};
pub use router::Router;
