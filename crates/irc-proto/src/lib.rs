//! # irc-proto
//!
//! The classical IRC line protocol, distilled: tokenizing a raw line into a
//! command and its parameters, rendering replies back onto the wire, ASCII
//! casemapping for the nick/channel namespace, and the grammar checks
//! (`valid_nick`, `valid_channel`, ban-mask glob matching) the rest of the
//! daemon builds on.
//!
//! This crate carries no transport or server-state code: it is pure line-in,
//! line-out protocol logic, kept separate so it can be unit-tested without a
//! running server.

mod casemap;
mod message;
mod numeric;
mod reply;
mod validate;

pub use casemap::irc_to_lower;
pub use message::{ParsedLine, parse_line};
pub use numeric::Numeric;
pub use reply::{numeric_reply, peer_line};
pub use validate::{glob_to_regex, is_banned, valid_channel, valid_nick};
