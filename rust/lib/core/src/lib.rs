pub mod error;
pub mod html;
pub mod module;
pub mod types;

pub use error::ServiceError;
pub use module::Module;
pub use types::{ListParams, ListResult, new_id, now_rfc3339};
