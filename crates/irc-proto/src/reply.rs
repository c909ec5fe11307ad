//! Rendering replies back onto the wire.
//!
//! Both numeric replies and peer-originated lines share one join rule: if any
//! parameters are present, the last one is unconditionally prefixed with `:`,
//! regardless of whether it contains a space. This matches the original
//! server's formatter rather than the stricter RFC 1459 recommendation (which
//! only requires the colon when the parameter contains whitespace or starts
//! with `:`).

use crate::numeric::Numeric;

fn join_params(params: &[&str]) -> String {
    match params.split_last() {
        None => String::new(),
        Some((last, head)) => {
            let mut out = String::new();
            for p in head {
                out.push(' ');
                out.push_str(p);
            }
            out.push_str(" :");
            out.push_str(last);
            out
        }
    }
}

/// Render a numeric reply line: `:<server> <code> <target> <params...>`.
pub fn numeric_reply(server: &str, code: Numeric, target: &str, params: &[&str]) -> String {
    format!(
        ":{server} {} {target}{}",
        code.code(),
        join_params(params)
    )
}

/// Render a peer-originated line: `:<origin_mask> <command> <params...>`.
pub fn peer_line(origin_mask: &str, command: &str, params: &[&str]) -> String {
    format!(":{origin_mask} {command}{}", join_params(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_with_no_params() {
        let line = numeric_reply("irc.example", Numeric::RPL_ENDOFMOTD, "alice", &[]);
        assert_eq!(line, ":irc.example 376 alice");
    }

    #[test]
    fn numeric_last_param_always_colon_prefixed() {
        let line = numeric_reply(
            "irc.example",
            Numeric::RPL_TOPIC,
            "alice",
            &["#chan", "no spaces here"],
        );
        assert_eq!(line, ":irc.example 332 alice #chan :no spaces here");
    }

    #[test]
    fn numeric_single_word_last_param_still_colon_prefixed() {
        let line = numeric_reply(
            "irc.example",
            Numeric::ERR_NOSUCHNICK,
            "alice",
            &["bob", "No such nick/channel"],
        );
        assert_eq!(line, ":irc.example 401 alice bob :No such nick/channel");
    }

    #[test]
    fn peer_line_privmsg() {
        let line = peer_line("alice!a@host", "PRIVMSG", &["#chan", "hello"]);
        assert_eq!(line, ":alice!a@host PRIVMSG #chan :hello");
    }

    #[test]
    fn peer_line_join_has_no_trailing_param() {
        let line = peer_line("alice!a@host", "JOIN", &["#chan"]);
        assert_eq!(line, ":alice!a@host JOIN :#chan");
    }
}
