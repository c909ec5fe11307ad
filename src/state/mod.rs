//! Server-wide state: clients, channels, and the registries tying them
//! together under the nick/channel namespaces.

pub mod channel;
pub mod client;
pub mod registry;

pub use channel::Channel;
pub use client::{Client, ClientId};
pub use registry::Registry;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use uuid::Uuid;

    fn client(id: ClientId) -> Arc<RwLock<Client>> {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        Arc::new(RwLock::new(Client::new(id, "127.0.0.1".to_string(), tx)))
    }

    #[tokio::test]
    async fn reserve_nick_rejects_second_claimant() {
        let reg = Registry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(reg.reserve_nick("alice", a));
        assert!(!reg.reserve_nick("alice", b));
        assert!(reg.reserve_nick("alice", a)); // re-claiming your own nick is fine
    }

    #[tokio::test]
    async fn nick_lookup_is_case_insensitive() {
        let reg = Registry::new();
        let a = Uuid::new_v4();
        reg.insert_client_with_id(a, client(a));
        reg.reserve_nick("Alice", a);
        assert!(reg.client_by_nick("ALICE").is_some());
    }

    #[tokio::test]
    async fn get_or_create_channel_is_idempotent() {
        let reg = Registry::new();
        let c1 = reg.get_or_create_channel("#chat");
        let c2 = reg.get_or_create_channel("#CHAT");
        assert!(Arc::ptr_eq(&c1, &c2));
        assert_eq!(reg.channel_count(), 1);
    }

    #[tokio::test]
    async fn remove_client_frees_the_nick() {
        let reg = Registry::new();
        let a = Uuid::new_v4();
        reg.insert_client_with_id(a, client(a));
        reg.reserve_nick("alice", a);
        reg.remove_client(a, "alice");
        assert!(!reg.nick_taken("alice"));
        assert!(reg.client_by_id(a).is_none());
    }

    /// A channel round-trips to nonexistence once its last member parts,
    /// mirroring the JOIN/PART handlers' `add_member`/`remove_member` +
    /// `remove_channel`-on-empty sequence.
    #[tokio::test]
    async fn channel_is_removed_when_last_member_parts() {
        let reg = Registry::new();
        let a = Uuid::new_v4();

        let chan = reg.get_or_create_channel("#chat");
        {
            let mut ch = chan.write().await;
            ch.add_member("alice".to_string(), a, true);
        }
        assert_eq!(reg.channel_count(), 1);

        {
            let mut ch = chan.write().await;
            ch.remove_member("alice");
            if ch.is_empty() {
                drop(ch);
                reg.remove_channel("#chat");
            }
        }

        assert_eq!(reg.channel_count(), 0);
        assert!(reg.channel("#chat").is_none());

        // Re-joining recreates a fresh, empty channel under the same name.
        let rejoined = reg.get_or_create_channel("#CHAT");
        assert!(rejoined.read().await.is_empty());
        assert_eq!(reg.channel_count(), 1);
    }
}
