pub(crate) mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
mod session;
mod user;

pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{SessionState, auth_guard};
pub use password::PasswordHash;
pub use register::{RegistrationState, get_register_page, post_register};
pub use session::{
    SessionId, SessionStore, begin_session, create_session_table, end_session,
};
pub use user::{
    User, UserID, create_user, create_user_table, get_cash, get_user_by_id, get_user_by_username,
};
