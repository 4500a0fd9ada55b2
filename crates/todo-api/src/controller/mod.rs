mod todo;
mod user;

pub use todo::{TodoController, TODO_COLLECTION_PATH, TODO_ITEM_PREFIX};
pub use user::{UserController, USER_ITEM_PREFIX};
