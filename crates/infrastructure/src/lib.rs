pub mod dynamodb;
pub mod memory;
pub mod models;
pub mod repositories;

pub use dynamodb::*;
pub use memory::*;
pub use repositories::*;
