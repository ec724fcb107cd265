/// Adapters - concrete implementations of the port traits
pub mod auth;
pub mod services;
pub mod storage;
