//! Error handling for command processing.
//!
//! [`HandlerError`] distinguishes protocol-level failures, which map to a
//! numeric reply sent back to the offending client, from connection-level
//! failures ([`HandlerError::Quit`], [`HandlerError::Send`]), which the
//! connection loop handles by tearing down the session instead of replying.

use irc_proto::Numeric;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("already registered")]
    AlreadyRegistered,

    #[error("no such nick/channel: {0}")]
    NoSuchNick(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("cannot send to channel: {0}")]
    CannotSendToChan(String),

    #[error("not on channel: {0}")]
    NotOnChannel(String),

    #[error("user not in channel: {0} {1}")]
    UserNotInChannel(String, String),

    #[error("user already on channel: {0}")]
    UserOnChannel(String),

    #[error("channel op privileges needed: {0}")]
    ChanOPrivsNeeded(String),

    #[error("invite only channel: {0}")]
    InviteOnlyChan(String),

    #[error("banned from channel: {0}")]
    BannedFromChan(String),

    #[error("bad channel key: {0}")]
    BadChannelKey(String),

    #[error("channel is full: {0}")]
    ChannelIsFull(String),

    #[error("no privileges")]
    NoPrivileges,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown mode flag")]
    UModeUnknownFlag,

    #[error("doesn't match")]
    UsersDontMatch,

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<String>),

    #[error("client quit: {0:?}")]
    Quit(Option<String>),
}

impl HandlerError {
    /// Convert to a numeric reply to send back to `nick`, or `None` for
    /// errors the connection loop handles by itself (quit, send failure).
    pub fn to_numeric(&self, nick: &str) -> Option<(Numeric, Vec<String>)> {
        let nick = nick.to_string();
        Some(match self {
            Self::NeedMoreParams => {
                (Numeric::ERR_NEEDMOREPARAMS, vec![nick, "Not enough parameters".into()])
            }
            Self::AlreadyRegistered => {
                (Numeric::ERR_ALREADYREGISTRED, vec![nick, "You may not reregister".into()])
            }
            Self::NoSuchNick(target) => (
                Numeric::ERR_NOSUCHNICK,
                vec![nick, target.clone(), "No such nick/channel".into()],
            ),
            Self::NoSuchChannel(chan) => (
                Numeric::ERR_NOSUCHCHANNEL,
                vec![nick, chan.clone(), "No such channel".into()],
            ),
            Self::NicknameInUse(bad) => (
                Numeric::ERR_NICKNAMEINUSE,
                vec![nick, bad.clone(), "Nickname is already in use".into()],
            ),
            Self::ErroneousNickname(bad) => (
                Numeric::ERR_ERRONEUSNICKNAME,
                vec![nick, bad.clone(), "Erroneous nickname".into()],
            ),
            Self::CannotSendToChan(chan) => (
                Numeric::ERR_CANNOTSENDTOCHAN,
                vec![nick, chan.clone(), "Cannot send to channel".into()],
            ),
            Self::NotOnChannel(chan) => (
                Numeric::ERR_NOTONCHANNEL,
                vec![nick, chan.clone(), "You're not on that channel".into()],
            ),
            Self::UserNotInChannel(target, chan) => (
                Numeric::ERR_USERNOTINCHANNEL,
                vec![nick, target.clone(), chan.clone(), "They aren't on that channel".into()],
            ),
            Self::UserOnChannel(chan) => (
                Numeric::ERR_USERONCHANNEL,
                vec![nick, chan.clone(), "is already on channel".into()],
            ),
            Self::ChanOPrivsNeeded(chan) => (
                Numeric::ERR_CHANOPRIVSNEEDED,
                vec![nick, chan.clone(), "You're not channel operator".into()],
            ),
            Self::InviteOnlyChan(chan) => (
                Numeric::ERR_INVITEONLYCHAN,
                vec![nick, chan.clone(), "Cannot join channel (+i)".into()],
            ),
            Self::BannedFromChan(chan) => (
                Numeric::ERR_BANNEDFROMCHAN,
                vec![nick, chan.clone(), "Cannot join channel (+b)".into()],
            ),
            Self::BadChannelKey(chan) => (
                Numeric::ERR_BADCHANNELKEY,
                vec![nick, chan.clone(), "Cannot join channel (+k)".into()],
            ),
            Self::ChannelIsFull(chan) => (
                Numeric::ERR_CHANNELISFULL,
                vec![nick, chan.clone(), "Cannot join channel (+l)".into()],
            ),
            Self::NoPrivileges => (
                Numeric::ERR_NOPRIVILEGES,
                vec![nick, "Permission Denied- You're not an IRC operator".into()],
            ),
            Self::UnknownCommand(cmd) => (
                Numeric::ERR_UNKNOWNCOMMAND,
                vec![nick, cmd.clone(), "Unknown command".into()],
            ),
            Self::UModeUnknownFlag => {
                (Numeric::ERR_UMODEUNKNOWNFLAG, vec![nick, "Unknown MODE flag".into()])
            }
            Self::UsersDontMatch => (
                Numeric::ERR_USERSDONTMATCH,
                vec![nick, "Cannot change mode for other users".into()],
            ),
            Self::Send(_) | Self::Quit(_) => return None,
        })
    }
}

pub type HandlerResult = Result<(), HandlerError>;
