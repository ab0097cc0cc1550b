pub mod session;

pub use session::{SessionCookie, SESSION_COOKIE};
