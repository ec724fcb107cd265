/// Shared utilities
pub mod keychain;
