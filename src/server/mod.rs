//! WebSocket broadcast server
//!
//! Accepts observer connections, greets them, forwards their control
//! messages to the coordinator and streams broadcast payloads back.

pub mod config;
pub mod connection;
pub mod listener;

pub use config::ServerConfig;
pub use listener::AquariumServer;
