pub mod dashboard_remote_write;
pub mod envelope;
pub mod models;
pub mod server;
