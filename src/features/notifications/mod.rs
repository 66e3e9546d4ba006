pub mod clients;
pub mod models;
pub mod services;
pub mod workers;

pub use clients::{ChatClient, EmailClient};
pub use services::NotificationService;
pub use workers::OutboxWorker;
