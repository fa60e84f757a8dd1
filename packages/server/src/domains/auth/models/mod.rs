pub mod user_account;
pub mod user_session;

pub use user_account::*;
pub use user_session::*;
