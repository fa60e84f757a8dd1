// Auth domain - accounts, bcrypt passwords and cookie sessions
//
// Sessions are opaque random tokens. The cookie carries the token, the
// database keeps its SHA-256 so a leaked table cannot be replayed.

pub mod actions;
pub mod models;
pub mod password;
pub mod session;

pub use actions::{UserProfile, INVALID_CREDENTIALS};
pub use models::*;
pub use session::{clear_session_cookie, parse_cookie, session_cookie, SESSION_COOKIE};
