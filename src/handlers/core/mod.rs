//! Handler trait, dispatch context, and the command dispatcher itself.

pub mod send;

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::Config;
use crate::error::HandlerResult;
use crate::state::{ClientId, Registry};

/// Everything a handler needs besides the command's own parameters.
pub struct Context<'a> {
    pub id: ClientId,
    pub registry: &'a Registry,
    pub config: &'a Config,
}

/// A single IRC command's server-side behavior.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &Context<'_>, params: &[String]) -> HandlerResult;
}

/// Commands a client may issue before completing registration. Every other
/// command is silently ignored pre-registration rather than erroring, per
/// `spec.md` §4.3.
fn pre_registration_allowed() -> HashSet<&'static str> {
    ["NICK", "USER", "CAP", "PING", "PONG", "QUIT"]
        .into_iter()
        .collect()
}

/// Resolves command tokens to handlers and enforces the registration
/// precondition.
pub struct Dispatcher {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    pre_registration_allowed: HashSet<&'static str>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        use crate::handlers::channel::{
            InviteHandler, JoinHandler, KickHandler, ListHandler, NamesHandler, PartHandler,
            TopicHandler,
        };
        use crate::handlers::connection::{
            CapHandler, NickHandler, PingHandler, PongHandler, QuitHandler, UserHandler,
        };
        use crate::handlers::messaging::{NoticeHandler, PrivmsgHandler};
        use crate::handlers::mode::ModeHandler;
        use crate::handlers::query::{
            AwayHandler, InfoHandler, IsonHandler, LusersHandler, MotdHandler, OperHandler,
            TimeHandler, UserhostHandler, VersionHandler, WhoHandler, WhoisHandler,
        };

        handlers.insert("NICK", Box::new(NickHandler));
        handlers.insert("USER", Box::new(UserHandler));
        handlers.insert("PING", Box::new(PingHandler));
        handlers.insert("PONG", Box::new(PongHandler));
        handlers.insert("QUIT", Box::new(QuitHandler));
        handlers.insert("CAP", Box::new(CapHandler));

        handlers.insert("JOIN", Box::new(JoinHandler));
        handlers.insert("PART", Box::new(PartHandler));
        handlers.insert("TOPIC", Box::new(TopicHandler));
        handlers.insert("NAMES", Box::new(NamesHandler));
        handlers.insert("LIST", Box::new(ListHandler));
        handlers.insert("INVITE", Box::new(InviteHandler));
        handlers.insert("KICK", Box::new(KickHandler));

        handlers.insert("PRIVMSG", Box::new(PrivmsgHandler));
        handlers.insert("NOTICE", Box::new(NoticeHandler));

        handlers.insert("MODE", Box::new(ModeHandler));

        handlers.insert("WHO", Box::new(WhoHandler));
        handlers.insert("WHOIS", Box::new(WhoisHandler));
        handlers.insert("AWAY", Box::new(AwayHandler));
        handlers.insert("ISON", Box::new(IsonHandler));
        handlers.insert("USERHOST", Box::new(UserhostHandler));
        handlers.insert("VERSION", Box::new(VersionHandler));
        handlers.insert("TIME", Box::new(TimeHandler));
        handlers.insert("INFO", Box::new(InfoHandler));
        handlers.insert("LUSERS", Box::new(LusersHandler));
        handlers.insert("MOTD", Box::new(MotdHandler));
        handlers.insert("OPER", Box::new(OperHandler));

        Self {
            handlers,
            pre_registration_allowed: pre_registration_allowed(),
        }
    }

    /// Dispatch one command. `registered` reflects the client's state
    /// *before* this command runs (registration itself completes inside
    /// `NickHandler`/`UserHandler`).
    pub async fn dispatch(
        &self,
        ctx: &Context<'_>,
        registered: bool,
        command: &str,
        params: &[String],
    ) -> HandlerResult {
        tracing::debug!(command, registered, "dispatching command");

        if !registered && !self.pre_registration_allowed.contains(command) {
            return Ok(());
        }

        match self.handlers.get(command) {
            Some(handler) => handler.handle(ctx, params).await,
            None => Err(crate::error::HandlerError::UnknownCommand(
                command.to_string(),
            )),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

pub fn shared_dispatcher() -> Arc<Dispatcher> {
    Arc::new(Dispatcher::new())
}
