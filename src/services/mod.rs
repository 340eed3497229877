pub mod health_monitor;
pub mod history;
pub mod inference_client;
pub mod media;
pub mod settings;
pub mod store;
pub mod theme;
