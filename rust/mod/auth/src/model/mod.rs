mod credential;
mod session;

pub use credential::*;
pub use session::*;
