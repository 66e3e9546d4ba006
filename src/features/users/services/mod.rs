pub mod role_cache;
pub mod user_service;

pub use role_cache::{CachedIdentity, RoleCache};
pub use user_service::UserService;
