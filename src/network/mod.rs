//! Transport: TCP accept, WebSocket upgrade, and the per-connection loop.

pub mod connection;
pub mod gateway;

pub use gateway::Gateway;
