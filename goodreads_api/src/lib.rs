mod client;
mod errors;
mod user_agent;
pub use self::client::{Client, DEFAULT_BASE_URL};
pub use self::errors::Error;
pub use self::user_agent::get_user_agent;
