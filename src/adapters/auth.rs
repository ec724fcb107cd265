/// Watch-channel backed authentication provider
///
/// Implements AuthPort over a tokio watch channel. The host shell (or a
/// test) drives sign_in/sign_out; the controllers observe the identity and
/// its transitions.
use crate::ports::auth::AuthPort;
use tokio::sync::watch;

pub struct WatchAuth {
    identity: watch::Sender<Option<String>>,
}

impl WatchAuth {
    /// Starts signed out.
    pub fn new() -> Self {
        Self {
            identity: watch::channel(None).0,
        }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        log::info!("signed in as {}", user_id);
        let _ = self.identity.send(Some(user_id));
    }

    pub fn sign_out(&self) {
        log::info!("signed out");
        let _ = self.identity.send(None);
    }
}

impl Default for WatchAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthPort for WatchAuth {
    fn current_identity(&self) -> Option<String> {
        self.identity.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.identity.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let auth = WatchAuth::new();
        assert_eq!(auth.current_identity(), None);

        auth.sign_in("u1");
        assert_eq!(auth.current_identity(), Some("u1".to_string()));

        auth.sign_out();
        assert_eq!(auth.current_identity(), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let auth = WatchAuth::new();
        let mut rx = auth.subscribe();

        auth.sign_in("u1");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some("u1".to_string()));
    }
}
