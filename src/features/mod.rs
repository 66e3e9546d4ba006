pub mod auth;
pub mod committees;
pub mod notifications;
pub mod tickets;
pub mod users;
