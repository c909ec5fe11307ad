//! Process-wide concurrent state: the nick and channel namespaces.
//!
//! # Lock order
//!
//! 1. `DashMap` shard lock (acquired during `.get()`/`.iter()`)
//! 2. Channel `RwLock`
//! 3. Client `RwLock`
//!
//! Never acquire in reverse order. A handler needing both a channel and a
//! client locks the channel first, copies what it needs out, and releases
//! before touching the client lock (lock-copy-release).

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use irc_proto::irc_to_lower;

use crate::state::channel::Channel;
use crate::state::client::{Client, ClientId};

#[derive(Default)]
pub struct Registry {
    /// Casefolded nick -> client id.
    nicks: DashMap<String, ClientId>,
    /// Client id -> client state.
    clients: DashMap<ClientId, Arc<RwLock<Client>>>,
    /// Casefolded channel name -> channel state.
    channels: DashMap<String, Arc<RwLock<Channel>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nick_taken(&self, nick: &str) -> bool {
        self.nicks.contains_key(&irc_to_lower(nick))
    }

    pub fn client_by_nick(&self, nick: &str) -> Option<Arc<RwLock<Client>>> {
        let id = *self.nicks.get(&irc_to_lower(nick))?;
        self.clients.get(&id).map(|e| e.clone())
    }

    pub fn client_by_id(&self, id: ClientId) -> Option<Arc<RwLock<Client>>> {
        self.clients.get(&id).map(|e| e.clone())
    }

    /// Insert a newly accepted client keyed by its id (no nick reserved yet).
    pub fn insert_client_with_id(&self, id: ClientId, client: Arc<RwLock<Client>>) {
        self.clients.insert(id, client);
    }

    /// Reserve `nick` for `id`, failing if already taken by a different id.
    pub fn reserve_nick(&self, nick: &str, id: ClientId) -> bool {
        let key = irc_to_lower(nick);
        match self.nicks.get(&key) {
            Some(existing) if *existing != id => false,
            _ => {
                self.nicks.insert(key, id);
                true
            }
        }
    }

    pub fn release_nick(&self, nick: &str) {
        self.nicks.remove(&irc_to_lower(nick));
    }

    pub fn remove_client(&self, id: ClientId, nick: &str) {
        self.clients.remove(&id);
        self.release_nick(nick);
    }

    pub fn channel(&self, name: &str) -> Option<Arc<RwLock<Channel>>> {
        self.channels.get(&irc_to_lower(name)).map(|e| e.clone())
    }

    /// Get the channel for `name`, creating it (empty, no members) if absent.
    pub fn get_or_create_channel(&self, name: &str) -> Arc<RwLock<Channel>> {
        self.channels
            .entry(irc_to_lower(name))
            .or_insert_with(|| Arc::new(RwLock::new(Channel::new(name.to_string()))))
            .clone()
    }

    pub fn remove_channel(&self, name: &str) {
        self.channels.remove(&irc_to_lower(name));
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Snapshot of every live client id, for broadcast/iteration use. Copied
    /// out rather than iterated in place so the `DashMap` shard lock is not
    /// held across any subsequent `.await`.
    pub fn all_client_ids(&self) -> Vec<ClientId> {
        self.clients.iter().map(|e| *e.key()).collect()
    }

    /// Snapshot of every existing channel's display name, for `NAMES`/`LIST`
    /// with no arguments. Collects the `Arc`s first so no channel lock is
    /// held across the `DashMap` iteration.
    pub async fn channel_names(&self) -> Vec<String> {
        let handles: Vec<_> = self.channels.iter().map(|e| e.value().clone()).collect();
        let mut names = Vec::with_capacity(handles.len());
        for channel in handles {
            names.push(channel.read().await.name.clone());
        }
        names
    }
}
