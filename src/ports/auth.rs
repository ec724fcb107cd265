/// Authentication port trait
///
/// Exposes the current authenticated identity and change notifications.
/// The identity is an opaque stable id; how the user signed in is out of
/// scope. Implementation: adapters/auth.rs
use tokio::sync::watch;

/// Port trait for the authentication provider
pub trait AuthPort: Send + Sync {
    /// The current authenticated identity, or None when signed out.
    fn current_identity(&self) -> Option<String>;

    /// Subscribes to identity changes. The receiver yields the new value
    /// (Some on sign-in, None on sign-out) whenever it changes.
    fn subscribe(&self) -> watch::Receiver<Option<String>>;
}
