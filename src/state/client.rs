//! Per-connection client state.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Opaque identifier naming a connection in the registry, stable across nick
/// changes. Never sent on the wire.
pub type ClientId = Uuid;

/// User mode flags recognized by this server.
pub mod user_mode {
    pub const INVISIBLE: char = 'i';
    pub const OPER: char = 'o';
}

#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    pub nick: String,
    pub user: String,
    pub realname: String,
    pub host: String,
    nick_set: bool,
    user_set: bool,
    pub channels: HashSet<String>,
    pub modes: HashSet<char>,
    pub away_msg: Option<String>,
    pub signon: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub outbox: UnboundedSender<String>,
}

impl Client {
    pub fn new(id: ClientId, host: String, outbox: UnboundedSender<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            nick: "*".to_string(),
            user: String::new(),
            realname: String::new(),
            host,
            nick_set: false,
            user_set: false,
            channels: HashSet::new(),
            modes: HashSet::new(),
            away_msg: None,
            signon: now,
            last_activity: now,
            outbox,
        }
    }

    pub fn registered(&self) -> bool {
        self.nick_set && self.user_set
    }

    pub fn mark_nick_set(&mut self) {
        self.nick_set = true;
    }

    pub fn mark_user_set(&mut self, user: String, realname: String) {
        self.user = user.chars().take(10).collect();
        self.realname = realname;
        self.user_set = true;
    }

    pub fn is_away(&self) -> bool {
        self.away_msg.is_some()
    }

    pub fn is_oper(&self) -> bool {
        self.modes.contains(&user_mode::OPER)
    }

    /// `nick!user@host`, used as the origin prefix on broadcast lines.
    pub fn mask(&self) -> String {
        format!("{}!{}@{}", self.nick, self.user, self.host)
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Enqueue a pre-rendered line for this client's writer task. A send
    /// failure means the writer task (and therefore the connection) is gone.
    pub fn send_line(&self, line: String) -> Result<(), String> {
        self.outbox.send(line).map_err(|_| "peer gone".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_client() -> (Client, tokio::sync::mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Client::new(Uuid::new_v4(), "127.0.0.1".to_string(), tx), rx)
    }

    #[test]
    fn not_registered_until_both_halves_set() {
        let (mut c, _rx) = dummy_client();
        assert!(!c.registered());
        c.mark_nick_set();
        assert!(!c.registered());
        c.mark_user_set("alice".to_string(), "Alice A".to_string());
        assert!(c.registered());
    }

    #[test]
    fn user_is_truncated_to_ten_chars() {
        let (mut c, _rx) = dummy_client();
        c.mark_user_set("a".repeat(20), "x".to_string());
        assert_eq!(c.user.len(), 10);
    }

    #[test]
    fn mask_format() {
        let (mut c, _rx) = dummy_client();
        c.nick = "alice".to_string();
        c.mark_user_set("al".to_string(), "Alice".to_string());
        assert_eq!(c.mask(), "alice!al@127.0.0.1");
    }
}
