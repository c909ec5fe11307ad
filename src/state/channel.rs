//! Per-channel state: membership, modes, topic, bans, invites.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::state::client::ClientId;

/// Channel mode flags recognized by this server.
pub mod chan_mode {
    pub const INVITE_ONLY: char = 'i';
    pub const MODERATED: char = 'm';
    pub const NO_EXTERNAL: char = 'n';
    pub const PRIVATE: char = 'p';
    pub const SECRET: char = 's';
    pub const TOPIC_LOCK: char = 't';
    pub const KEY: char = 'k';
    pub const LIMIT: char = 'l';
    pub const BAN: char = 'b';
}

#[derive(Debug)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub topic_setter: String,
    pub topic_time: i64,
    pub members: HashMap<String, ClientId>,
    pub ops: HashSet<String>,
    pub voices: HashSet<String>,
    pub modes: HashSet<char>,
    pub key: Option<String>,
    pub limit: Option<usize>,
    pub invites: HashSet<String>,
    pub bans: Vec<String>,
    pub created: DateTime<Utc>,
}

impl Channel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            topic: String::new(),
            topic_setter: String::new(),
            topic_time: 0,
            members: HashMap::new(),
            ops: HashSet::new(),
            voices: HashSet::new(),
            modes: HashSet::new(),
            key: None,
            limit: None,
            invites: HashSet::new(),
            bans: Vec::new(),
            created: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn has_member(&self, nick: &str) -> bool {
        self.members.contains_key(nick)
    }

    pub fn is_op(&self, nick: &str) -> bool {
        self.ops.contains(nick)
    }

    pub fn is_voiced(&self, nick: &str) -> bool {
        self.voices.contains(nick)
    }

    /// Add `nick` as a member, optionally promoting it to op (the channel's
    /// first joiner is made an op by the `JOIN` handler).
    pub fn add_member(&mut self, nick: String, id: ClientId, op: bool) {
        self.invites.remove(&nick);
        if op {
            self.ops.insert(nick.clone());
        }
        self.members.insert(nick, id);
    }

    /// Remove `nick` from membership, ops, and voices.
    pub fn remove_member(&mut self, nick: &str) {
        self.members.remove(nick);
        self.ops.remove(nick);
        self.voices.remove(nick);
    }

    /// Rekey a member from `old` to `new`, preserving op/voice status.
    pub fn rename_member(&mut self, old: &str, new: &str) {
        if let Some(id) = self.members.remove(old) {
            self.members.insert(new.to_string(), id);
            if self.ops.remove(old) {
                self.ops.insert(new.to_string());
            }
            if self.voices.remove(old) {
                self.voices.insert(new.to_string());
            }
        }
    }

    /// The mode-letter prefix shown before a nick in `NAMES`/`WHO` output:
    /// `@` for op, `+` for voice, empty otherwise.
    pub fn member_prefix(&self, nick: &str) -> &'static str {
        if self.is_op(nick) {
            "@"
        } else if self.is_voiced(nick) {
            "+"
        } else {
            ""
        }
    }

    pub fn set_topic(&mut self, topic: String, setter: String) {
        self.topic = topic;
        self.topic_setter = setter;
        self.topic_time = Utc::now().timestamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn rename_member_preserves_op_status() {
        let mut ch = Channel::new("#chan".to_string());
        let id = Uuid::new_v4();
        ch.add_member("alice".to_string(), id, true);
        ch.rename_member("alice", "alice2");
        assert!(ch.has_member("alice2"));
        assert!(!ch.has_member("alice"));
        assert!(ch.is_op("alice2"));
        assert!(!ch.is_op("alice"));
    }

    #[test]
    fn remove_member_clears_roles() {
        let mut ch = Channel::new("#chan".to_string());
        let id = Uuid::new_v4();
        ch.add_member("alice".to_string(), id, true);
        ch.remove_member("alice");
        assert!(ch.is_empty());
        assert!(!ch.is_op("alice"));
    }

    #[test]
    fn member_prefix_precedence() {
        let mut ch = Channel::new("#chan".to_string());
        let id = Uuid::new_v4();
        ch.add_member("alice".to_string(), id, true);
        ch.voices.insert("alice".to_string());
        assert_eq!(ch.member_prefix("alice"), "@");
    }
}
