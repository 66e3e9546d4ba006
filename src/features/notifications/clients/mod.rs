mod chat_client;
mod email_client;

pub use chat_client::ChatClient;
pub use email_client::EmailClient;
